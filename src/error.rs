//! Error taxonomy for the optimization core.
//!
//! Only two conditions abort work: a malformed problem (rejected up front by
//! [`build_problem`](crate::problem::build_problem)) and a failing
//! caller-supplied evaluator. Everything else, including infeasibility,
//! stagnation and time limits, is reported through result fields.

use thiserror::Error;

use crate::params::ConfigError;

/// Error produced by a caller-supplied objective or constraint evaluator.
pub type EvaluatorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Convenience alias used throughout the crate.
pub type Result<T, E = OptimizeError> = std::result::Result<T, E>;

/// Errors raised by the optimization core.
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// The problem definition is malformed: dangling variable reference,
    /// inverted bounds, empty variable set, and similar.
    #[error("invalid problem definition: {0}")]
    InvalidProblemDefinition(String),

    /// An objective or constraint evaluator failed. The run is aborted.
    #[error("evaluation of '{target}' failed: {source}")]
    Evaluation {
        /// Id of the objective or constraint whose evaluator failed.
        target: String,
        /// The original cause.
        #[source]
        source: EvaluatorError,
    },

    /// Optimizer parameters are out of range.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Parameters could not be loaded from a configuration source.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl OptimizeError {
    pub(crate) fn invalid_problem(msg: impl Into<String>) -> Self {
        OptimizeError::InvalidProblemDefinition(msg.into())
    }

    pub(crate) fn evaluation(target: &str, source: impl Into<EvaluatorError>) -> Self {
        OptimizeError::Evaluation {
            target: target.to_string(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_error_keeps_source() {
        let err = OptimizeError::evaluation("travel_time", "lookup table missing");
        assert!(err.to_string().contains("travel_time"));
        assert!(err.to_string().contains("lookup table missing"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_problem_message() {
        let err = OptimizeError::invalid_problem("variable set is empty");
        assert_eq!(
            err.to_string(),
            "invalid problem definition: variable set is empty"
        );
    }
}
