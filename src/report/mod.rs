//! Results, metrics and recommendations.
//!
//! - [`SingleObjectiveResult`]: best solution of an annealing or
//!   single-objective evolutionary run
//! - [`ParetoResult`]: the rank-0 front of a multi-objective run with
//!   [`FrontMetrics`]
//! - [`RunStats`]: per-run counters, returned rather than accumulated in
//!   shared state

mod metrics;
mod recommend;

pub use metrics::{
    convergence, diversity, hypervolume, normalized_variance, spread, uniformity, FrontMetrics,
    PopulationMetrics,
};
pub use recommend::Recommendations;

use std::time::Duration;

use crate::budget::TerminationReason;
use crate::eval::Solution;
use crate::pareto;
use crate::problem::Problem;

/// Counters of one run.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Annealing steps, or offspring evaluations for evolutionary runs.
    pub iterations: usize,
    /// Completed generations (0 for annealing).
    pub generations: usize,
    /// Accepted annealing moves, including improvements.
    pub accepted_moves: usize,
    /// Annealing moves that lowered energy.
    pub improving_moves: usize,
    /// Annealing restarts.
    pub restarts: usize,
    /// Temperature when annealing stopped.
    pub final_temperature: Option<f64>,
    pub termination: TerminationReason,
    pub elapsed: Duration,
    /// Seed of the run's generator.
    pub seed: u64,
    /// Best fitness after initialization and after each iteration block or
    /// generation.
    pub fitness_history: Vec<f64>,
}

impl RunStats {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            iterations: 0,
            generations: 0,
            accepted_moves: 0,
            improving_moves: 0,
            restarts: 0,
            final_temperature: None,
            termination: TerminationReason::MaxIterations,
            elapsed: Duration::ZERO,
            seed,
            fitness_history: Vec::new(),
        }
    }

    /// Accepted moves per iteration.
    pub fn acceptance_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.accepted_moves as f64 / self.iterations as f64
        }
    }

    /// Improving moves per iteration.
    pub fn improvement_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.improving_moves as f64 / self.iterations as f64
        }
    }
}

/// Result of a single-objective run.
#[derive(Debug, Clone)]
pub struct SingleObjectiveResult {
    /// Highest-fitness solution seen during the run.
    pub best: Solution,
    pub stats: RunStats,
    /// Metrics of the terminal population (`None` for annealing).
    pub metrics: Option<PopulationMetrics>,
    pub recommendations: Recommendations,
}

/// The non-dominated subset of a terminal population.
#[derive(Debug, Clone)]
pub struct ParetoFront {
    /// Rank-0 solutions, in crowded-comparison order.
    pub solutions: Vec<Solution>,
    pub metrics: FrontMetrics,
}

impl ParetoFront {
    /// Builds the front of `population` and its metrics.
    pub fn from_population(population: &[Solution], problem: &Problem) -> Self {
        let solutions = pareto::pareto_front(population, problem);
        let metrics = FrontMetrics::of(&solutions, population);
        Self { solutions, metrics }
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }
}

/// Result of a multi-objective run.
#[derive(Debug, Clone)]
pub struct ParetoResult {
    pub front: ParetoFront,
    /// Front member with the highest scalar fitness.
    pub best: Solution,
    pub stats: RunStats,
    pub population_metrics: PopulationMetrics,
    pub recommendations: Recommendations,
}
