//! Constraints and their violation measure.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::assignment::Assignment;
use super::objective::EvaluatorFn;
use crate::error::EvaluatorError;

/// Tolerance within which an equality constraint counts as satisfied.
pub const EQUALITY_TOLERANCE: f64 = 1e-3;

/// How a constraint's evaluated value is compared with its bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// `|value - bound| <= 0.001`.
    Equality,
    /// `value <= bound`.
    Inequality,
    /// `lower <= value <= bound`.
    Bound { lower: f64 },
    /// Truth of `value` (non-zero) equals truth of `bound`.
    Logical,
}

/// A constraint over an assignment.
#[derive(Clone)]
pub struct Constraint {
    pub id: String,
    pub kind: ConstraintKind,
    /// Right-hand side.
    pub bound: f64,
    pub weight: f64,
    /// Fitness lost per unit of weighted violation.
    pub penalty: f64,
    /// Variable ids the evaluator reads.
    pub variables: Vec<String>,
    evaluator: EvaluatorFn,
}

impl Constraint {
    /// Constraint with an infallible evaluator, weight 1 and penalty 1.
    pub fn new<F>(id: impl Into<String>, kind: ConstraintKind, bound: f64, evaluator: F) -> Self
    where
        F: Fn(&Assignment) -> f64 + Send + Sync + 'static,
    {
        Self::fallible(id, kind, bound, move |a: &Assignment| Ok(evaluator(a)))
    }

    /// Constraint whose evaluator may fail. A failure aborts the run.
    pub fn fallible<F>(id: impl Into<String>, kind: ConstraintKind, bound: f64, evaluator: F) -> Self
    where
        F: Fn(&Assignment) -> Result<f64, EvaluatorError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            kind,
            bound,
            weight: 1.0,
            penalty: 1.0,
            variables: Vec::new(),
            evaluator: Arc::new(evaluator),
        }
    }

    /// `evaluator(a) == bound` within [`EQUALITY_TOLERANCE`].
    pub fn equality<F>(id: impl Into<String>, bound: f64, evaluator: F) -> Self
    where
        F: Fn(&Assignment) -> f64 + Send + Sync + 'static,
    {
        Self::new(id, ConstraintKind::Equality, bound, evaluator)
    }

    /// `evaluator(a) <= bound`.
    pub fn at_most<F>(id: impl Into<String>, bound: f64, evaluator: F) -> Self
    where
        F: Fn(&Assignment) -> f64 + Send + Sync + 'static,
    {
        Self::new(id, ConstraintKind::Inequality, bound, evaluator)
    }

    /// `lower <= evaluator(a) <= upper`.
    pub fn within<F>(id: impl Into<String>, lower: f64, upper: f64, evaluator: F) -> Self
    where
        F: Fn(&Assignment) -> f64 + Send + Sync + 'static,
    {
        Self::new(id, ConstraintKind::Bound { lower }, upper, evaluator)
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    /// Declares the variables the evaluator reads.
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

    /// Violation magnitude of an evaluated value; 0 when satisfied.
    pub fn violation(&self, value: f64) -> f64 {
        match self.kind {
            ConstraintKind::Equality => {
                let gap = (value - self.bound).abs();
                if gap <= EQUALITY_TOLERANCE {
                    0.0
                } else {
                    gap
                }
            }
            ConstraintKind::Inequality => (value - self.bound).max(0.0),
            ConstraintKind::Bound { lower } => {
                if value < lower {
                    lower - value
                } else {
                    (value - self.bound).max(0.0)
                }
            }
            ConstraintKind::Logical => {
                if (value != 0.0) == (self.bound != 0.0) {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }

    /// Fitness penalty for an evaluated value.
    pub fn penalty_for(&self, value: f64) -> f64 {
        self.violation(value) * self.weight * self.penalty
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("bound", &self.bound)
            .field("weight", &self.weight)
            .field("penalty", &self.penalty)
            .field("variables", &self.variables)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(kind: ConstraintKind, bound: f64) -> Constraint {
        Constraint::new("c", kind, bound, |_| 0.0)
    }

    #[test]
    fn test_equality_tolerance() {
        let c = constant(ConstraintKind::Equality, 1.0);
        assert_eq!(c.violation(1.0005), 0.0);
        assert!((c.violation(1.5) - 0.5).abs() < 1e-12);
        assert!((c.violation(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_inequality_one_sided() {
        let c = constant(ConstraintKind::Inequality, 10.0);
        assert_eq!(c.violation(3.0), 0.0);
        assert_eq!(c.violation(10.0), 0.0);
        assert!((c.violation(12.5) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_bound_two_sided() {
        let c = constant(ConstraintKind::Bound { lower: 2.0 }, 5.0);
        assert!((c.violation(1.0) - 1.0).abs() < 1e-12);
        assert_eq!(c.violation(3.0), 0.0);
        assert!((c.violation(7.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_logical_truthiness() {
        let c = constant(ConstraintKind::Logical, 1.0);
        assert_eq!(c.violation(3.0), 0.0);
        assert_eq!(c.violation(0.0), 1.0);

        let c = constant(ConstraintKind::Logical, 0.0);
        assert_eq!(c.violation(0.0), 0.0);
        assert_eq!(c.violation(-1.0), 1.0);
    }

    #[test]
    fn test_penalty_scales_with_weight_and_penalty() {
        let c = constant(ConstraintKind::Inequality, 0.0)
            .with_weight(2.0)
            .with_penalty(50.0);
        assert!((c.penalty_for(1.5) - 150.0).abs() < 1e-9);
    }
}
