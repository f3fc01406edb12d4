//! Strategy selection and dispatch.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ga::{EvolutionOutcome, EvolutionaryRunner, ObjectiveMode};
use crate::params::OptimizerParameters;
use crate::problem::Problem;
use crate::sa::AnnealingRunner;

/// Which optimizer a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Simulated annealing on the scalar fitness.
    Annealing,
    /// Evolutionary search on the scalar fitness.
    #[default]
    Evolutionary,
    /// Evolutionary search with Pareto ranking (NSGA-II).
    ParetoMultiObjective,
}

impl Strategy {
    /// Suggests a strategy from the shape of `problem`.
    ///
    /// Several objectives call for a Pareto front; a handful of variables
    /// is cheap enough to anneal; anything else gets a population.
    pub fn suggest(problem: &Problem) -> Self {
        if problem.objective_count() > 1 {
            Strategy::ParetoMultiObjective
        } else if problem.variables().len() <= 5 {
            Strategy::Annealing
        } else {
            Strategy::Evolutionary
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Strategy::Annealing => "annealing",
            Strategy::Evolutionary => "evolutionary",
            Strategy::ParetoMultiObjective => "pareto",
        };
        f.write_str(s)
    }
}

/// Runs `problem` with the chosen `strategy`.
///
/// Annealing results come back as [`EvolutionOutcome::Single`], so every
/// strategy shares one return type.
pub fn optimize(
    problem: &Problem,
    params: &OptimizerParameters,
    strategy: Strategy,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<EvolutionOutcome> {
    match strategy {
        Strategy::Annealing => {
            AnnealingRunner::run_with_cancel(problem, params, cancel).map(EvolutionOutcome::Single)
        }
        Strategy::Evolutionary => {
            EvolutionaryRunner::run_with_cancel(problem, params, ObjectiveMode::Single, cancel)
        }
        Strategy::ParetoMultiObjective => {
            EvolutionaryRunner::run_with_cancel(problem, params, ObjectiveMode::Multi, cancel)
        }
    }
}
