//! Run budgets and cooperative cancellation.
//!
//! Both optimizers consult a [`RunBudget`] at the top of every iteration or
//! generation. Exhausting the budget is a normal way for a run to end: the
//! best solution seen so far is returned together with the
//! [`TerminationReason`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::params::OptimizerParameters;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Annealing temperature reached `final_temperature`.
    TemperatureFloor,
    /// `max_iterations` reached.
    MaxIterations,
    /// `max_generations` reached.
    MaxGenerations,
    /// `max_time` elapsed.
    TimeLimit,
    /// The external cancellation flag was raised.
    Cancelled,
    /// Population fitness converged while diversity stayed above threshold.
    Converged,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminationReason::TemperatureFloor => "temperature floor",
            TerminationReason::MaxIterations => "iteration limit",
            TerminationReason::MaxGenerations => "generation limit",
            TerminationReason::TimeLimit => "time limit",
            TerminationReason::Cancelled => "cancelled",
            TerminationReason::Converged => "converged",
        };
        f.write_str(s)
    }
}

/// Limits shared by every optimizer: wall clock, iteration count and an
/// optional external cancellation flag.
#[derive(Debug)]
pub(crate) struct RunBudget {
    started: Instant,
    time_limit: Option<Duration>,
    max_iterations: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl RunBudget {
    pub(crate) fn new(params: &OptimizerParameters, cancel: Option<Arc<AtomicBool>>) -> Self {
        Self {
            started: Instant::now(),
            time_limit: params.time_limit(),
            max_iterations: params.max_iterations,
            cancel,
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Returns the reason to stop, if any, after `iterations` steps.
    pub(crate) fn exhausted(&self, iterations: usize) -> Option<TerminationReason> {
        if let Some(ref flag) = self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Some(TerminationReason::Cancelled);
            }
        }
        if self.time_limit.is_some_and(|limit| self.elapsed() >= limit) {
            return Some(TerminationReason::TimeLimit);
        }
        if self.max_iterations > 0 && iterations >= self.max_iterations {
            return Some(TerminationReason::MaxIterations);
        }
        None
    }
}
