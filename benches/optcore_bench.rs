//! Criterion benchmarks for the u-optcore optimizers.
//!
//! Uses synthetic problems (Sphere function, a two-objective box) to
//! measure algorithm overhead independent of any logistics domain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_optcore::pareto::{crowding_distance, non_dominated_sort};
use u_optcore::{
    build_problem, AnnealingRunner, EvolutionaryRunner, Objective, ObjectiveMode,
    OptimizerParameters, Problem, Variable,
};

// ===========================================================================
// Sphere function: minimize sum(x_i^2)
// ===========================================================================

fn sphere(dim: usize) -> Problem {
    let variables = (0..dim)
        .map(|i| Variable::continuous(format!("x{i}"), -5.0, 5.0))
        .collect();
    build_problem(
        variables,
        vec![Objective::minimize("sphere", |a| {
            a.values().iter().map(|x| x * x).sum()
        })],
        vec![],
        OptimizerParameters::default(),
    )
    .expect("valid sphere problem")
}

// ===========================================================================
// Two objectives over a box: minimize x, maximize y
// ===========================================================================

fn two_objective_box() -> Problem {
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
    .expect("valid box problem")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_evolutionary_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolutionary_sphere");
    group.sample_size(10);

    for (dim, pop, gen) in [(10usize, 50usize, 50usize), (50, 100, 30), (100, 100, 20)] {
        let problem = sphere(dim);
        let params = OptimizerParameters::default()
            .with_population_size(pop)
            .with_max_generations(gen)
            .with_convergence_threshold(0.0)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("d{}_p{}_g{}", dim, pop, gen), dim),
            &(problem, params),
            |b, (p, c)| {
                b.iter(|| {
                    let result = EvolutionaryRunner::run(black_box(p), black_box(c), ObjectiveMode::Single);
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_annealing_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("annealing_sphere");
    group.sample_size(10);

    for &dim in &[10, 50, 100] {
        let problem = sphere(dim);
        let params = OptimizerParameters::default()
            .with_initial_temperature(100.0)
            .with_final_temperature(0.01)
            .with_max_iterations(1000)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(dim), &(problem, params), |b, (p, c)| {
            b.iter(|| {
                let result = AnnealingRunner::run(black_box(p), black_box(c));
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_pareto_box(c: &mut Criterion) {
    let mut group = c.benchmark_group("pareto_box");
    group.sample_size(10);

    for &pop in &[50, 100, 200] {
        let problem = two_objective_box();
        let params = OptimizerParameters::default()
            .with_population_size(pop)
            .with_max_generations(30)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(pop), &(problem, params), |b, (p, c)| {
            b.iter(|| {
                let result = EvolutionaryRunner::run(black_box(p), black_box(c), ObjectiveMode::Multi);
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_non_dominated_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("non_dominated_sort");

    for &n in &[100usize, 500, 1000] {
        // Deterministic scatter: a mix of fronts without an RNG dependency.
        let objectives: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                let a = ((i * 7919) % 1000) as f64;
                let b = ((i * 104_729) % 1000) as f64;
                vec![a, b, (a + b) % 500.0]
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &objectives, |b, objs| {
            b.iter(|| {
                let sorted = non_dominated_sort(black_box(objs));
                let front: Vec<Vec<f64>> = sorted.fronts[0].iter().map(|&i| objs[i].clone()).collect();
                black_box(crowding_distance(&front))
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_evolutionary_sphere,
    bench_annealing_sphere,
    bench_pareto_box,
    bench_non_dominated_sort
);
criterion_main!(benches);
