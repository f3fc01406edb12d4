//! Pareto ranking and diversity engine.
//!
//! Direction-aware dominance, fast non-dominated sorting, crowding distance,
//! and NSGA-II environmental selection. The sorting and crowding kernels
//! work on plain objective vectors in minimization space; the
//! solution-level helpers translate each objective's direction first.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use std::cmp::Ordering;

use crate::eval::Solution;
use crate::problem::Problem;

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    pub fronts: Vec<Vec<usize>>,

    /// Number of solutions dominating each solution.
    pub dominated_by_count: Vec<usize>,
}

/// Dominance comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Compares two objective vectors for Pareto dominance (minimization).
pub fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Whether `a` dominates `b`, honouring each objective's direction.
///
/// `a` dominates `b` iff it is at least as good on every objective and
/// strictly better on at least one. Irreflexive and asymmetric.
pub fn dominates(a: &Solution, b: &Solution, problem: &Problem) -> bool {
    let mut strictly_better = false;
    for (obj, (&va, &vb)) in problem
        .objectives()
        .iter()
        .zip(a.objective_values().iter().zip(b.objective_values()))
    {
        if obj.direction.better(vb, va) {
            return false;
        }
        if obj.direction.better(va, vb) {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Objective vectors of `solutions`, negating maximized objectives so that
/// lower is better everywhere.
pub fn minimization_vectors(solutions: &[Solution], problem: &Problem) -> Vec<Vec<f64>> {
    solutions
        .iter()
        .map(|s| {
            problem
                .objectives()
                .iter()
                .zip(s.objective_values())
                .map(|(obj, &v)| obj.direction.to_minimization(v))
                .collect()
        })
        .collect()
}

/// Fast non-dominated sorting.
///
/// Assigns a Pareto rank to each solution based on dominance relationships.
/// All objectives are **minimized**: lower values are better.
///
/// # Algorithm (Deb et al., 2002)
///
/// 1. For each pair of solutions, determine dominance
/// 2. Solutions dominated by no other belong to front 0 (rank 0)
/// 3. Remove front 0, repeat to find subsequent fronts
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use u_optcore::pareto::non_dominated_sort;
///
/// let objectives = vec![
///     vec![1.0, 5.0],  // Solution A
///     vec![3.0, 3.0],  // Solution B
///     vec![5.0, 1.0],  // Solution C
///     vec![4.0, 4.0],  // Solution D: dominated by B
/// ];
///
/// let result = non_dominated_sort(&objectives);
///
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// assert_eq!(result.dominated_by_count[3], 1);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> NondominatedSortResult {
    let n = objectives.len();
    if n == 0 {
        return NondominatedSortResult {
            ranks: Vec::new(),
            fronts: Vec::new(),
            dominated_by_count: Vec::new(),
        };
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance_cmp(&objectives[i], &objectives[j]) {
                Dominance::Left => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }
    }

    let dominated_by_count = domination_count.clone();
    let front_0: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();

    let mut fronts = vec![front_0];
    loop {
        let mut next_front = Vec::new();
        if let Some(current) = fronts.last() {
            for &i in current {
                for &j in &dominated_by[i] {
                    domination_count[j] -= 1;
                    if domination_count[j] == 0 {
                        ranks[j] = fronts.len();
                        next_front.push(j);
                    }
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        next_front.sort_unstable();
        fronts.push(next_front);
    }

    NondominatedSortResult {
        ranks,
        fronts,
        dominated_by_count,
    }
}

/// Crowding distance assignment for diversity preservation.
///
/// Computes the crowding distance of each solution of one front. Boundary
/// solutions of every objective receive `f64::INFINITY`; interior solutions
/// accumulate `(next - prev) / (max - min)` over the objectives, skipping
/// objectives with zero range.
///
/// # Example
///
/// ```
/// use u_optcore::pareto::crowding_distance;
///
/// let distances = crowding_distance(&[
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
/// ]);
///
/// assert!(distances[0].is_infinite());
/// assert!(distances[2].is_infinite());
/// assert!(distances[1].is_finite());
/// ```
pub fn crowding_distance(objectives: &[Vec<f64>]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];

    #[allow(clippy::needless_range_loop)] // obj_idx is a column index into 2D data
    for obj_idx in 0..m {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| {
            objectives[a][obj_idx]
                .partial_cmp(&objectives[b][obj_idx])
                .unwrap_or(Ordering::Equal)
        });

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        let min_val = objectives[indices[0]][obj_idx];
        let max_val = objectives[indices[n - 1]][obj_idx];
        let range = max_val - min_val;

        if range > 0.0 {
            for i in 1..(n - 1) {
                let prev = objectives[indices[i - 1]][obj_idx];
                let next = objectives[indices[i + 1]][obj_idx];
                distances[indices[i]] += (next - prev) / range;
            }
        }
    }

    distances
}

/// Ranks `solutions` in place: Pareto rank, dominance count, and crowding
/// distance within each front.
///
/// Returns the fronts as index lists.
pub fn rank_population(solutions: &mut [Solution], problem: &Problem) -> Vec<Vec<usize>> {
    let vectors = minimization_vectors(solutions, problem);
    let sorted = non_dominated_sort(&vectors);

    for front in &sorted.fronts {
        let front_vectors: Vec<Vec<f64>> = front.iter().map(|&i| vectors[i].clone()).collect();
        let distances = crowding_distance(&front_vectors);
        for (&i, d) in front.iter().zip(distances) {
            let meta = &mut solutions[i].pareto;
            meta.rank = Some(sorted.ranks[i]);
            meta.dominance_count = sorted.dominated_by_count[i];
            meta.crowding_distance = d;
        }
    }

    sorted.fronts
}

/// Crowded-comparison order: lower rank first, then larger crowding
/// distance.
pub fn crowded_cmp(a: &Solution, b: &Solution) -> Ordering {
    let ra = a.pareto.rank.unwrap_or(usize::MAX);
    let rb = b.pareto.rank.unwrap_or(usize::MAX);
    ra.cmp(&rb).then_with(|| {
        b.pareto
            .crowding_distance
            .partial_cmp(&a.pareto.crowding_distance)
            .unwrap_or(Ordering::Equal)
    })
}

/// NSGA-II environmental selection.
///
/// Ranks the combined population, orders it by `(rank asc, crowding desc)`
/// and keeps the first `size` solutions. Boundary solutions carry infinite
/// crowding distance and therefore survive truncation of their front first.
pub fn environmental_select(
    mut combined: Vec<Solution>,
    size: usize,
    problem: &Problem,
) -> Vec<Solution> {
    rank_population(&mut combined, problem);
    combined.sort_by(crowded_cmp);
    combined.truncate(size);
    combined
}

/// Rank-0 members of `solutions`, ranking them first.
pub fn pareto_front(solutions: &[Solution], problem: &Problem) -> Vec<Solution> {
    let mut ranked = solutions.to_vec();
    let fronts = rank_population(&mut ranked, problem);
    match fronts.first() {
        Some(front) => {
            let mut members: Vec<Solution> = front.iter().map(|&i| ranked[i].clone()).collect();
            members.sort_by(crowded_cmp);
            members
        }
        None => Vec::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================
