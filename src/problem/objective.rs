//! Objectives: weighted, prioritized evaluator callbacks.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::assignment::Assignment;
use crate::error::EvaluatorError;

/// Caller-supplied evaluator: a pure function of an assignment.
///
/// Must be thread-safe when batch evaluation runs in parallel.
pub type EvaluatorFn = Arc<dyn Fn(&Assignment) -> Result<f64, EvaluatorError> + Send + Sync>;

/// Optimization direction of an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Direction {
    /// Whether `a` is strictly better than `b` in this direction.
    pub fn better(self, a: f64, b: f64) -> bool {
        match self {
            Direction::Minimize => a < b,
            Direction::Maximize => a > b,
        }
    }

    /// Maps a value so that lower is always better.
    pub(crate) fn to_minimization(self, value: f64) -> f64 {
        match self {
            Direction::Minimize => value,
            Direction::Maximize => -value,
        }
    }
}

/// An objective function with its scoring metadata.
#[derive(Clone)]
pub struct Objective {
    pub id: String,
    pub direction: Direction,
    /// Weight in `[0, 1]`.
    pub weight: f64,
    /// Positive; higher is more important.
    pub priority: u32,
    /// Values are clamped into `[min, max]` before scoring.
    pub soft_bounds: Option<(f64, f64)>,
    /// Variable ids the evaluator reads.
    pub variables: Vec<String>,
    evaluator: EvaluatorFn,
}

impl Objective {
    /// Objective with an infallible evaluator, weight 1 and priority 1.
    pub fn new<F>(id: impl Into<String>, direction: Direction, evaluator: F) -> Self
    where
        F: Fn(&Assignment) -> f64 + Send + Sync + 'static,
    {
        Self::fallible(id, direction, move |a: &Assignment| Ok(evaluator(a)))
    }

    /// Objective whose evaluator may fail. A failure aborts the run.
    pub fn fallible<F>(id: impl Into<String>, direction: Direction, evaluator: F) -> Self
    where
        F: Fn(&Assignment) -> Result<f64, EvaluatorError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            direction,
            weight: 1.0,
            priority: 1,
            soft_bounds: None,
            variables: Vec::new(),
            evaluator: Arc::new(evaluator),
        }
    }

    pub fn minimize<F>(id: impl Into<String>, evaluator: F) -> Self
    where
        F: Fn(&Assignment) -> f64 + Send + Sync + 'static,
    {
        Self::new(id, Direction::Minimize, evaluator)
    }

    pub fn maximize<F>(id: impl Into<String>, evaluator: F) -> Self
    where
        F: Fn(&Assignment) -> f64 + Send + Sync + 'static,
    {
        Self::new(id, Direction::Maximize, evaluator)
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_soft_bounds(mut self, min: f64, max: f64) -> Self {
        self.soft_bounds = Some((min, max));
        self
    }

    /// Declares the variables the evaluator reads; checked by
    /// [`build_problem`](super::build_problem).
    pub fn references<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Invokes the evaluator.
    pub fn evaluate(&self, assignment: &Assignment) -> Result<f64, EvaluatorError> {
        (self.evaluator)(assignment)
    }

    /// Clamps a raw value into the soft bounds, if any.
    pub fn clamp(&self, value: f64) -> f64 {
        match self.soft_bounds {
            Some((min, max)) => value.clamp(min, max),
            None => value,
        }
    }
}

impl fmt::Debug for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Objective")
            .field("id", &self.id)
            .field("direction", &self.direction)
            .field("weight", &self.weight)
            .field("priority", &self.priority)
            .field("soft_bounds", &self.soft_bounds)
            .field("variables", &self.variables)
            .finish_non_exhaustive()
    }
}
