//! Tournament selection.
//!
//! Contestants are drawn uniformly with replacement; higher tournament
//! sizes raise selection pressure.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"
//! - Deb et al. (2002), crowded-comparison operator of NSGA-II

use std::cmp::Ordering;

use rand::Rng;

use super::runner::ObjectiveMode;
use crate::eval::Solution;
use crate::pareto::crowded_cmp;

/// Returns `Ordering::Less` when `a` wins a tournament against `b`.
///
/// Single objective: higher fitness wins. Multi objective: lower rank, then
/// larger crowding distance, then higher fitness.
pub(crate) fn contest(a: &Solution, b: &Solution, mode: ObjectiveMode) -> Ordering {
    let by_fitness = b.fitness().total_cmp(&a.fitness());
    match mode {
        ObjectiveMode::Single => by_fitness,
        ObjectiveMode::Multi => crowded_cmp(a, b).then(by_fitness),
    }
}

/// Picks `k` random members of `population` and returns the index of the
/// winner.
///
/// # Panics
/// Panics if `population` is empty.
pub(crate) fn tournament<R: Rng>(
    population: &[Solution],
    k: usize,
    mode: ObjectiveMode,
    rng: &mut R,
) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k.max(1) {
        let idx = rng.random_range(0..n);
        if contest(&population[idx], &population[best_idx], mode) == Ordering::Less {
            best_idx = idx;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::evaluate;
    use crate::params::OptimizerParameters;
    use crate::pareto::rank_population;
    use crate::problem::{build_problem, Objective, Problem, Variable};
    use crate::random::create_rng;

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

    fn population(p: &Problem, points: &[(f64, f64)]) -> Vec<Solution> {
        points
            .iter()
            .map(|&(x, y)| evaluate(p.assignment_from_values(vec![x, y]), p).unwrap())
            .collect()
    }

    #[test]
    fn test_tournament_single_element() {
        let p = problem();
        let pop = population(&p, &[(5.0, 5.0)]);
        let mut rng = create_rng(42);
        for _ in 0..20 {
            assert_eq!(tournament(&pop, 3, ObjectiveMode::Single, &mut rng), 0);
        }
    }

    #[test]
    fn test_tournament_favours_fitter() {
        let p = problem();
        // Fitness rises with y and falls with x; index 3 is the fittest.
        let pop = population(&p, &[(9.0, 1.0), (6.0, 3.0), (3.0, 6.0), (0.0, 9.0)]);
        let mut rng = create_rng(7);
        let mut counts = [0usize; 4];
        for _ in 0..1000 {
            counts[tournament(&pop, 3, ObjectiveMode::Single, &mut rng)] += 1;
        }
        assert!(counts[3] > counts[0], "{counts:?}");
        assert!(counts[3] > counts[1], "{counts:?}");
    }

    #[test]
    fn test_huge_tournament_always_finds_best() {
        let p = problem();
        let pop = population(&p, &[(9.0, 1.0), (0.0, 9.0), (6.0, 3.0)]);
        let mut rng = create_rng(3);
        for _ in 0..50 {
            assert_eq!(tournament(&pop, 200, ObjectiveMode::Single, &mut rng), 1);
        }
    }

    #[test]
    fn test_multi_mode_prefers_lower_rank() {
        let p = problem();
        let mut pop = population(&p, &[(1.0, 9.0), (5.0, 5.0)]);
        rank_population(&mut pop, &p);
        assert_eq!(contest(&pop[0], &pop[1], ObjectiveMode::Multi), Ordering::Less);
        assert_eq!(contest(&pop[1], &pop[0], ObjectiveMode::Multi), Ordering::Greater);
    }

    #[test]
    fn test_multi_mode_prefers_larger_crowding_within_front() {
        let p = problem();
        // One front of three: the middle point gets a finite crowding distance.
        let mut pop = population(&p, &[(0.0, 0.0), (5.0, 5.0), (10.0, 10.0)]);
        rank_population(&mut pop, &p);
        assert!(pop[1].crowding_distance().is_finite());
        assert_eq!(contest(&pop[0], &pop[1], ObjectiveMode::Multi), Ordering::Less);
    }

    #[test]
    fn test_multi_mode_falls_back_to_fitness() {
        let p = problem();
        // Two boundary points share rank 0 and infinite crowding.
        let mut pop = population(&p, &[(0.0, 0.0), (10.0, 10.0)]);
        rank_population(&mut pop, &p);
        let expected = pop[1].fitness().total_cmp(&pop[0].fitness());
        assert_eq!(contest(&pop[0], &pop[1], ObjectiveMode::Multi), expected);
    }
}
