//! Invariant properties checked with proptest.

use proptest::prelude::*;
use u_optcore::pareto::{
    crowding_distance, dominance_cmp, dominates, non_dominated_sort, Dominance,
};
use u_optcore::random::create_rng;
use u_optcore::sa::acceptance_probability;
use u_optcore::{build_problem, evaluate, Objective, OptimizerParameters, Problem, Variable};

/// One variable of each kind, with awkward but valid domains.
fn mixed_problem(lo: f64, width: f64, step: f64, imin: i64, ispan: i64) -> Problem {
    build_problem(
        vec![
            Variable::continuous("c", lo, lo + width),
            Variable::discrete("d", lo, lo + width, step),
            Variable::binary("b"),
            Variable::integer("i", imin, imin + ispan),
        ],
        vec![Objective::minimize("sum", |a| a.values().iter().sum())],
        vec![],
        OptimizerParameters::default(),
    )
    .unwrap()
}

/// Minimize `x`, maximize `y` over a 10x10 box.
fn min_x_max_y() -> Problem {
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

fn on_grid(value: f64, min: f64, step: f64) -> bool {
    let k = (value - min) / step;
    (k - k.round()).abs() < 1e-6
}

fn objective_vectors() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..4).prop_flat_map(|m| {
        prop::collection::vec(prop::collection::vec(-100.0f64..100.0, m), 0..30)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_values_stay_in_domain(
        lo in -50.0f64..50.0,
        width in 0.5f64..40.0,
        step in 0.1f64..0.5,
        imin in -20i64..20,
        ispan in 0i64..10,
        seed in any::<u64>(),
    ) {
        let problem = mixed_problem(lo, width, step, imin, ispan);
        let mut rng = create_rng(seed);

        let a = problem.random_assignment(&mut rng);
        let b = problem.random_assignment(&mut rng);
        let mut mutated = a.clone();
        problem.mutate(&mut mutated, 1.0, &mut rng);
        let (c1, c2) = problem.crossover(&a, &b, &mut rng);
        let n = problem.neighbor(&a, 2, &mut rng);

        for candidate in [&a, &b, &mutated, &c1, &c2, &n] {
            prop_assert!(problem.is_within_domains(candidate), "{candidate:?}");
            prop_assert!(on_grid(candidate["d"], lo, step), "{candidate:?}");
            prop_assert!(candidate["b"] == 0.0 || candidate["b"] == 1.0);
            prop_assert_eq!(candidate["i"].fract(), 0.0);
        }
    }

    #[test]
    fn crossover_genes_come_from_a_parent(seed in any::<u64>()) {
        let problem = mixed_problem(0.0, 10.0, 0.5, 0, 5);
        let mut rng = create_rng(seed);
        let a = problem.random_assignment(&mut rng);
        let b = problem.random_assignment(&mut rng);
        let (c1, c2) = problem.crossover(&a, &b, &mut rng);
        for i in 0..a.len() {
            let (x, y) = (a.values()[i], b.values()[i]);
            let (u, v) = (c1.values()[i], c2.values()[i]);
            prop_assert!((u == x && v == y) || (u == y && v == x));
        }
    }

    #[test]
    fn dominance_is_irreflexive_and_asymmetric(objs in objective_vectors()) {
        for a in &objs {
            prop_assert_eq!(dominance_cmp(a, a), Dominance::Neither);
            for b in &objs {
                let forward = dominance_cmp(a, b);
                let backward = dominance_cmp(b, a);
                match forward {
                    Dominance::Left => prop_assert_eq!(backward, Dominance::Right),
                    Dominance::Right => prop_assert_eq!(backward, Dominance::Left),
                    Dominance::Neither => prop_assert_eq!(backward, Dominance::Neither),
                }
            }
        }
    }

    #[test]
    fn sorting_partitions_population(objs in objective_vectors()) {
        let sorted = non_dominated_sort(&objs);
        let mut seen = vec![0usize; objs.len()];
        for (rank, front) in sorted.fronts.iter().enumerate() {
            for &i in front {
                seen[i] += 1;
                prop_assert_eq!(sorted.ranks[i], rank);
            }
        }
        prop_assert!(seen.iter().all(|&c| c == 1));

        // Nothing in a front dominates another member of the same front.
        for front in &sorted.fronts {
            for &i in front {
                for &j in front {
                    prop_assert_ne!(dominance_cmp(&objs[i], &objs[j]), Dominance::Left);
                }
            }
        }

        // Every member of a later front is dominated by someone in an earlier one.
        for (rank, front) in sorted.fronts.iter().enumerate().skip(1) {
            for &i in front {
                let covered = sorted.fronts[..rank]
                    .iter()
                    .flatten()
                    .any(|&k| dominance_cmp(&objs[k], &objs[i]) == Dominance::Left);
                prop_assert!(covered, "member {} of front {} is undominated", i, rank);
            }
        }
    }

    #[test]
    fn solution_dominance_follows_directions(
        points in prop::collection::vec((0.0f64..10.0, 0.0f64..10.0), 2..12),
    ) {
        let problem = min_x_max_y();
        let solutions: Vec<_> = points
            .iter()
            .map(|&(x, y)| evaluate(problem.assignment_from_values(vec![x, y]), &problem).unwrap())
            .collect();

        for (a, &(ax, ay)) in solutions.iter().zip(&points) {
            prop_assert!(!dominates(a, a, &problem));
            for (b, &(bx, by)) in solutions.iter().zip(&points) {
                let expected = ax <= bx && ay >= by && (ax < bx || ay > by);
                prop_assert_eq!(dominates(a, b, &problem), expected, "a=({}, {}) b=({}, {})", ax, ay, bx, by);
                prop_assert!(!(dominates(a, b, &problem) && dominates(b, a, &problem)));
            }
        }
    }

    #[test]
    fn crowding_boundaries_infinite_interior_non_negative(objs in objective_vectors()) {
        let sorted = non_dominated_sort(&objs);
        let Some(front) = sorted.fronts.first() else {
            return Ok(());
        };
        let front_vectors: Vec<Vec<f64>> = front.iter().map(|&i| objs[i].clone()).collect();
        let distances = crowding_distance(&front_vectors);
        prop_assert_eq!(distances.len(), front_vectors.len());
        prop_assert!(distances.iter().all(|&d| d >= 0.0));

        if !front_vectors.is_empty() {
            let m = front_vectors[0].len();
            for k in 0..m {
                let (lo, _) = front_vectors
                    .iter()
                    .enumerate()
                    .min_by(|a, b| a.1[k].total_cmp(&b.1[k]))
                    .unwrap();
                let (hi, _) = front_vectors
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1[k].total_cmp(&b.1[k]))
                    .unwrap();
                // Ties may put a different index at the extreme; check by value.
                let lo_value = front_vectors[lo][k];
                let hi_value = front_vectors[hi][k];
                prop_assert!(front_vectors
                    .iter()
                    .zip(&distances)
                    .any(|(v, d)| v[k] == lo_value && d.is_infinite()));
                prop_assert!(front_vectors
                    .iter()
                    .zip(&distances)
                    .any(|(v, d)| v[k] == hi_value && d.is_infinite()));
            }
        }
    }

    #[test]
    fn acceptance_probability_rules(delta in -1e3f64..1e3, t in 1e-6f64..1e4) {
        let p = acceptance_probability(delta, t);
        prop_assert!((0.0..=1.0).contains(&p));
        if delta < 0.0 {
            prop_assert_eq!(p, 1.0);
        } else {
            prop_assert!(p >= acceptance_probability(delta, t / 2.0));
        }
    }
}
