//! Quality metrics for populations and Pareto fronts.
//!
//! Normalized variances use the mean of squares as denominator, so
//! `var / E[x²]` always lies in `[0, 1]` and the derived "1 − …" scores do
//! too.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::eval::Solution;

/// Metrics over a whole (terminal) population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationMetrics {
    /// 1 − normalized fitness variance.
    pub convergence: f64,
    /// Fraction of distinct assignments.
    pub diversity: f64,
    /// Fraction of feasible solutions.
    pub feasible_ratio: f64,
}

impl PopulationMetrics {
    pub fn of(population: &[Solution]) -> Self {
        let feasible = population.iter().filter(|s| s.is_feasible()).count();
        Self {
            convergence: convergence(population),
            diversity: diversity(population),
            feasible_ratio: ratio(feasible, population.len()),
        }
    }
}

/// Metrics of a Pareto front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontMetrics {
    pub size: usize,
    /// Sum over front members of the product of their objective values.
    ///
    /// An approximation; comparisons across runs need a reference-point
    /// hypervolume.
    pub hypervolume: f64,
    /// Mean pairwise Euclidean distance in variable space.
    pub spread: f64,
    /// 1 − normalized variance of gaps between neighbours along the first
    /// objective.
    pub uniformity: f64,
    /// Convergence of the terminal population.
    pub convergence: f64,
    /// Diversity of the terminal population.
    pub diversity: f64,
}

impl FrontMetrics {
    pub fn of(front: &[Solution], population: &[Solution]) -> Self {
        Self {
            size: front.len(),
            hypervolume: hypervolume(front),
            spread: spread(front),
            uniformity: uniformity(front),
            convergence: convergence(population),
            diversity: diversity(population),
        }
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// `var(x) / E[x²]`; 0 for empty input or all-zero values.
pub fn normalized_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let mean_sq = values.iter().map(|v| v * v).sum::<f64>() / n;
    if mean_sq <= 0.0 {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (var / mean_sq).clamp(0.0, 1.0)
}

/// Approximate hypervolume: Σ over solutions of Π of objective values.
pub fn hypervolume(front: &[Solution]) -> f64 {
    front
        .iter()
        .map(|s| s.objective_values().iter().product::<f64>())
        .sum()
}

/// Mean pairwise Euclidean distance in variable space.
pub fn spread(front: &[Solution]) -> f64 {
    let n = front.len();
    if n < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            total += front[i].assignment().distance(front[j].assignment());
        }
    }
    total / (n * (n - 1) / 2) as f64
}

/// Evenness of a front: 1 − normalized variance of the objective-space gaps
/// between consecutive solutions sorted by the first objective.
pub fn uniformity(front: &[Solution]) -> f64 {
    if front.len() < 3 {
        return 1.0;
    }
    let mut sorted: Vec<&Solution> = front.iter().collect();
    sorted.sort_by(|a, b| {
        let va = a.objective_values().first().copied().unwrap_or(0.0);
        let vb = b.objective_values().first().copied().unwrap_or(0.0);
        va.partial_cmp(&vb).unwrap_or(Ordering::Equal)
    });
    let gaps: Vec<f64> = sorted
        .windows(2)
        .map(|w| {
            w[0].objective_values()
                .iter()
                .zip(w[1].objective_values())
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt()
        })
        .collect();
    1.0 - normalized_variance(&gaps)
}

/// 1 − normalized fitness variance across the population.
pub fn convergence(population: &[Solution]) -> f64 {
    let fitness: Vec<f64> = population.iter().map(Solution::fitness).collect();
    1.0 - normalized_variance(&fitness)
}

/// Fraction of distinct assignments in the population.
pub fn diversity(population: &[Solution]) -> f64 {
    let distinct: HashSet<Vec<u64>> = population.iter().map(|s| s.assignment().key()).collect();
    ratio(distinct.len(), population.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::evaluate;
    use crate::params::OptimizerParameters;
    use crate::problem::{build_problem, Objective, Problem, Variable};

    fn problem() -> Problem {
        build_problem(
            vec![
                Variable::continuous("x", 0.0, 10.0),
                Variable::continuous("y", 0.0, 10.0),
            ],
            vec![
                Objective::minimize("x", |a| a["x"]),
                Objective::maximize("y", |a| a["y"]),
            ],
            vec![],
            OptimizerParameters::default(),
        )
        .unwrap()
    }

    fn solutions(p: &Problem, points: &[(f64, f64)]) -> Vec<Solution> {
        points
            .iter()
            .map(|&(x, y)| evaluate(p.assignment_from_values(vec![x, y]), p).unwrap())
            .collect()
    }

    #[test]
    fn test_normalized_variance_bounds() {
        assert_eq!(normalized_variance(&[]), 0.0);
        assert_eq!(normalized_variance(&[3.0, 3.0, 3.0]), 0.0);
        assert_eq!(normalized_variance(&[0.0, 0.0]), 0.0);
        let v = normalized_variance(&[-5.0, 5.0]);
        assert!((v - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_variance_divides_by_mean_of_squares() {
        // var = 1, E[x²] = 5, mean² = 4.
        let v = normalized_variance(&[1.0, 3.0]);
        assert!((v - 0.2).abs() < 1e-12, "{v}");
        // Large spread relative to the mean stays bounded by 1.
        let v = normalized_variance(&[0.0, 0.0, 0.0, 100.0]);
        assert!((v - 0.75).abs() < 1e-12, "{v}");
    }

    #[test]
    fn test_hypervolume_sum_of_products() {
        let p = problem();
        let front = solutions(&p, &[(1.0, 2.0), (3.0, 4.0)]);
        assert!((hypervolume(&front) - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_spread_mean_pairwise_distance() {
        let p = problem();
        let front = solutions(&p, &[(0.0, 0.0), (3.0, 4.0), (0.0, 0.0)]);
        // distances: 5, 0, 5
        assert!((spread(&front) - 10.0 / 3.0).abs() < 1e-12);
        assert_eq!(spread(&front[..1]), 0.0);
    }

    #[test]
    fn test_uniformity_even_front_is_one() {
        let p = problem();
        let front = solutions(&p, &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert!((uniformity(&front) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_uniformity_uneven_front_lower() {
        let p = problem();
        let front = solutions(&p, &[(0.0, 0.0), (0.1, 0.1), (5.0, 5.0), (5.1, 5.1)]);
        assert!(uniformity(&front) < 0.7);
    }

    #[test]
    fn test_diversity_counts_duplicates() {
        let p = problem();
        let pop = solutions(&p, &[(1.0, 1.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert!((diversity(&pop) - 0.75).abs() < 1e-12);
        assert_eq!(diversity(&[]), 0.0);
    }

    #[test]
    fn test_convergence_identical_population() {
        let p = problem();
        let pop = solutions(&p, &[(2.0, 2.0), (2.0, 2.0)]);
        assert!((convergence(&pop) - 1.0).abs() < 1e-12);
    }
}
