//! SA execution loop.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use super::cooling::Cooler;
use crate::budget::{RunBudget, TerminationReason};
use crate::error::Result;
use crate::eval::{evaluate, Solution};
use crate::params::OptimizerParameters;
use crate::problem::Problem;
use crate::random::{rng_for, RunRng};
use crate::report::{Recommendations, RunStats, SingleObjectiveResult};

/// Iterations between best-fitness history samples.
const HISTORY_INTERVAL: usize = 100;

/// Metropolis acceptance probability for an energy change `delta`.
///
/// Exactly 1 for `delta < 0`; `exp(-delta / temperature)` otherwise, and 0
/// at a non-positive temperature.
///
/// ```
/// use u_optcore::sa::acceptance_probability;
///
/// assert_eq!(acceptance_probability(-3.0, 10.0), 1.0);
/// assert!(acceptance_probability(1.0, 10.0) > acceptance_probability(1.0, 5.0));
/// ```
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta < 0.0 {
        1.0
    } else if temperature > 0.0 {
        (-delta / temperature).exp()
    } else {
        0.0
    }
}

/// Executes simulated annealing over a [`Problem`]'s scalar fitness.
///
/// # Usage
///
/// ```ignore
/// let params = OptimizerParameters::default().with_seed(42);
/// let result = AnnealingRunner::run(&problem, &params)?;
/// println!("best fitness: {}", result.best.fitness());
/// ```
pub struct AnnealingRunner;

impl AnnealingRunner {
    /// Runs annealing to termination.
    pub fn run(problem: &Problem, params: &OptimizerParameters) -> Result<SingleObjectiveResult> {
        Self::run_with_cancel(problem, params, None)
    }

    /// Runs annealing with an optional cancellation flag.
    ///
    /// The flag is checked at the top of every step; once raised the run
    /// stops and returns the best solution found so far.
    pub fn run_with_cancel(
        problem: &Problem,
        params: &OptimizerParameters,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SingleObjectiveResult> {
        params.validate()?;

        let (mut rng, seed) = rng_for(params.seed);
        let budget = RunBudget::new(params, cancel);
        let mut stats = RunStats::new(seed);

        info!(
            event = "run_start",
            strategy = "annealing",
            variables = problem.variables().len(),
            objectives = problem.objective_count(),
            constraints = problem.constraints().len(),
            seed = seed,
        );

        let mut current = evaluate(problem.random_assignment(&mut rng), problem)?;
        let mut best = current.clone();
        let mut temperature = params.initial_temperature;
        let mut cooler = Cooler::new(params);
        stats.fitness_history.push(best.fitness());

        let termination = loop {
            if temperature <= params.final_temperature {
                break TerminationReason::TemperatureFloor;
            }
            if let Some(reason) = budget.exhausted(stats.iterations) {
                break reason;
            }

            let neighbor = evaluate(
                problem.neighbor(current.assignment(), params.neighborhood_size, &mut rng),
                problem,
            )?;

            // Energy is negated fitness.
            let delta = current.fitness() - neighbor.fitness();
            let accepted = if delta < 0.0 {
                stats.improving_moves += 1;
                true
            } else {
                rng.random::<f64>() < acceptance_probability(delta, temperature)
            };
            stats.iterations += 1;

            if accepted {
                stats.accepted_moves += 1;
                current = neighbor;
                if current.fitness() > best.fitness() {
                    best = current.clone();
                    if params.local_search_iterations > 0 {
                        best = local_search(problem, best, params, &mut rng)?;
                        current = best.clone();
                    }
                }
            }

            temperature = cooler.next(temperature, accepted);

            if params.restart_threshold > 0.0
                && best.fitness() - current.fitness()
                    > params.restart_threshold * best.fitness().abs()
            {
                current = evaluate(problem.random_assignment(&mut rng), problem)?;
                stats.restarts += 1;
                debug!(
                    event = "restart",
                    iteration = stats.iterations,
                    temperature = temperature,
                    best_fitness = best.fitness(),
                );
            }

            if stats.iterations % HISTORY_INTERVAL == 0 {
                stats.fitness_history.push(best.fitness());
                debug!(
                    event = "progress",
                    iteration = stats.iterations,
                    temperature = temperature,
                    multiplier = cooler.multiplier(),
                    best_fitness = best.fitness(),
                );
            }
        };

        if stats.fitness_history.last() != Some(&best.fitness()) {
            stats.fitness_history.push(best.fitness());
        }
        stats.final_temperature = Some(temperature);
        stats.termination = termination;
        stats.elapsed = budget.elapsed();

        info!(
            event = "run_end",
            strategy = "annealing",
            termination = %termination,
            iterations = stats.iterations,
            acceptance_rate = stats.acceptance_rate(),
            restarts = stats.restarts,
            duration_ms = stats.elapsed.as_millis() as u64,
            best_fitness = best.fitness(),
            feasible = best.is_feasible(),
        );

        let recommendations = Recommendations::for_annealing(&best, &stats);
        Ok(SingleObjectiveResult {
            best,
            stats,
            metrics: None,
            recommendations,
        })
    }
}

/// Strict-improvement hill climbing from `start`, at most
/// `local_search_iterations` neighbor draws.
fn local_search(
    problem: &Problem,
    start: Solution,
    params: &OptimizerParameters,
    rng: &mut RunRng,
) -> Result<Solution> {
    let mut best = start;
    for _ in 0..params.local_search_iterations {
        let candidate = evaluate(
            problem.neighbor(best.assignment(), params.neighborhood_size, rng),
            problem,
        )?;
        if candidate.fitness() > best.fitness() {
            best = candidate;
        }
    }
    Ok(best)
}
