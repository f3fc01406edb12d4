//! Evolutionary loop execution.
//!
//! [`EvolutionaryRunner`] orchestrates the generational process:
//! seeding → evaluation → tournament selection → crossover → mutation →
//! survivor selection → repeat.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::selection::tournament;
use crate::budget::{RunBudget, TerminationReason};
use crate::error::Result;
use crate::eval::{evaluate_batch, Solution};
use crate::params::OptimizerParameters;
use crate::pareto::{environmental_select, rank_population};
use crate::problem::{Assignment, Problem};
use crate::random::rng_for;
use crate::report::{
    diversity, normalized_variance, ParetoFront, ParetoResult, PopulationMetrics,
    Recommendations, RunStats, SingleObjectiveResult,
};

/// Chance that each variable of a mutated offspring is perturbed.
pub const GENE_MUTATION_RATE: f64 = 0.1;

/// How the population is ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveMode {
    /// Scalar fitness; survivors are the fittest.
    #[default]
    Single,
    /// Pareto ranking with crowding distance (NSGA-II).
    Multi,
}

/// Result of an evolutionary run.
#[derive(Debug, Clone)]
pub enum EvolutionOutcome {
    /// Best solution of a single-objective run.
    Single(SingleObjectiveResult),
    /// Front of a multi-objective run.
    Pareto(ParetoResult),
}

impl EvolutionOutcome {
    /// Highest-fitness solution, from the front for Pareto runs.
    pub fn best(&self) -> &Solution {
        match self {
            EvolutionOutcome::Single(r) => &r.best,
            EvolutionOutcome::Pareto(r) => &r.best,
        }
    }

    pub fn stats(&self) -> &RunStats {
        match self {
            EvolutionOutcome::Single(r) => &r.stats,
            EvolutionOutcome::Pareto(r) => &r.stats,
        }
    }

    pub fn recommendations(&self) -> &Recommendations {
        match self {
            EvolutionOutcome::Single(r) => &r.recommendations,
            EvolutionOutcome::Pareto(r) => &r.recommendations,
        }
    }

    /// The Pareto result, if this was a multi-objective run.
    pub fn into_pareto(self) -> Option<ParetoResult> {
        match self {
            EvolutionOutcome::Pareto(r) => Some(r),
            EvolutionOutcome::Single(_) => None,
        }
    }

    /// The single-objective result, if this was a single-objective run.
    pub fn into_single(self) -> Option<SingleObjectiveResult> {
        match self {
            EvolutionOutcome::Single(r) => Some(r),
            EvolutionOutcome::Pareto(_) => None,
        }
    }
}

/// Executes the evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let params = OptimizerParameters::default().with_seed(42);
/// let outcome = EvolutionaryRunner::run(&problem, &params, ObjectiveMode::Multi)?;
/// if let EvolutionOutcome::Pareto(result) = outcome {
///     println!("front size: {}", result.front.len());
/// }
/// ```
pub struct EvolutionaryRunner;

impl EvolutionaryRunner {
    /// Runs the evolutionary optimizer to termination.
    pub fn run(
        problem: &Problem,
        params: &OptimizerParameters,
        mode: ObjectiveMode,
    ) -> Result<EvolutionOutcome> {
        Self::run_with_cancel(problem, params, mode, None)
    }

    /// Runs the evolutionary optimizer with an optional cancellation flag.
    ///
    /// If `cancel` is `Some` and the flag is raised, the run stops at the
    /// top of the next generation and reports the current population.
    pub fn run_with_cancel(
        problem: &Problem,
        params: &OptimizerParameters,
        mode: ObjectiveMode,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EvolutionOutcome> {
        params.validate()?;

        let (mut rng, seed) = rng_for(params.seed);
        let budget = RunBudget::new(params, cancel);
        let mut stats = RunStats::new(seed);
        let parent_count = params.parent_count();

        info!(
            event = "run_start",
            strategy = "evolutionary",
            mode = ?mode,
            variables = problem.variables().len(),
            objectives = problem.objective_count(),
            constraints = problem.constraints().len(),
            population_size = params.population_size,
            seed = seed,
        );

        // 1. Seed and evaluate
        let seeds: Vec<Assignment> = (0..params.population_size)
            .map(|_| problem.random_assignment(&mut rng))
            .collect();
        let mut population = evaluate_batch(problem, seeds, params.parallel)?;
        if mode == ObjectiveMode::Multi {
            rank_population(&mut population, problem);
        }

        let mut best = fittest(&population).clone();
        stats.fitness_history.push(best.fitness());

        // 2. Generational loop
        let termination = loop {
            if stats.generations >= params.max_generations {
                break TerminationReason::MaxGenerations;
            }
            if let Some(reason) = budget.exhausted(stats.iterations) {
                break reason;
            }
            if converged(&population, params) {
                break TerminationReason::Converged;
            }

            // Selection
            let parents: Vec<usize> = (0..parent_count)
                .map(|_| tournament(&population, params.tournament_size, mode, &mut rng))
                .collect();

            // Recombination and mutation
            let mut offspring = Vec::with_capacity(parent_count);
            for pair in parents.chunks_exact(2) {
                let (a, b) = (
                    population[pair[0]].assignment(),
                    population[pair[1]].assignment(),
                );
                let (c1, c2) = if rng.random_bool(params.crossover_rate) {
                    problem.crossover(a, b, &mut rng)
                } else {
                    (a.clone(), b.clone())
                };
                for mut child in [c1, c2] {
                    if rng.random_bool(params.mutation_rate) {
                        problem.mutate(&mut child, GENE_MUTATION_RATE, &mut rng);
                    }
                    offspring.push(child);
                }
            }

            let offspring = evaluate_batch(problem, offspring, params.parallel)?;
            stats.iterations += offspring.len();

            // Survivor selection over parents + offspring
            population.extend(offspring);
            population = survivors(population, params.population_size, mode, problem);
            stats.generations += 1;

            let generation_best = fittest(&population);
            if generation_best.fitness() > best.fitness() {
                best = generation_best.clone();
            }
            stats.fitness_history.push(best.fitness());

            debug!(
                event = "generation",
                generation = stats.generations,
                iterations = stats.iterations,
                best_fitness = best.fitness(),
                diversity = diversity(&population),
            );
        };

        stats.termination = termination;
        stats.elapsed = budget.elapsed();
        let population_metrics = PopulationMetrics::of(&population);

        let outcome = match mode {
            ObjectiveMode::Single => {
                let recommendations =
                    Recommendations::for_evolution(&best, &stats, &population_metrics);
                EvolutionOutcome::Single(SingleObjectiveResult {
                    best,
                    stats,
                    metrics: Some(population_metrics),
                    recommendations,
                })
            }
            ObjectiveMode::Multi => {
                let front = ParetoFront::from_population(&population, problem);
                let best = front
                    .solutions
                    .iter()
                    .max_by(|a, b| a.fitness().total_cmp(&b.fitness()))
                    .cloned()
                    .unwrap_or(best);
                let recommendations = Recommendations::for_pareto(
                    &best,
                    &stats,
                    &front.metrics,
                    &population_metrics,
                    problem.objective_count(),
                );
                EvolutionOutcome::Pareto(ParetoResult {
                    front,
                    best,
                    stats,
                    population_metrics,
                    recommendations,
                })
            }
        };

        let stats = outcome.stats();
        info!(
            event = "run_end",
            strategy = "evolutionary",
            termination = %stats.termination,
            generations = stats.generations,
            iterations = stats.iterations,
            duration_ms = stats.elapsed.as_millis() as u64,
            best_fitness = outcome.best().fitness(),
            feasible = outcome.best().is_feasible(),
            convergence = population_metrics.convergence,
            diversity = population_metrics.diversity,
        );

        Ok(outcome)
    }
}

/// Keeps `size` members of `combined`: the fittest for single-objective
/// runs, NSGA-II environmental selection otherwise.
fn survivors(
    mut combined: Vec<Solution>,
    size: usize,
    mode: ObjectiveMode,
    problem: &Problem,
) -> Vec<Solution> {
    match mode {
        ObjectiveMode::Single => {
            combined.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
            combined.truncate(size);
            combined
        }
        ObjectiveMode::Multi => environmental_select(combined, size, problem),
    }
}

/// Population fitness has collapsed while enough distinct assignments
/// remain.
fn converged(population: &[Solution], params: &OptimizerParameters) -> bool {
    let fitness: Vec<f64> = population.iter().map(Solution::fitness).collect();
    normalized_variance(&fitness) < params.convergence_threshold
        && diversity(population) > params.diversity_threshold
}

/// Find the individual with the highest fitness.
fn fittest(population: &[Solution]) -> &Solution {
    population
        .iter()
        .max_by(|a, b| a.fitness().total_cmp(&b.fitness()))
        .expect("population must not be empty")
}

// ============================================================================
// Tests
// ============================================================================
