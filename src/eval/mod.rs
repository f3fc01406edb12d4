//! Solution evaluation.
//!
//! Turns an [`Assignment`] into a [`Solution`] by running every objective
//! and constraint evaluator, then folding the results into one scalar
//! fitness (higher is better):
//!
//! ```text
//! fitness = Σ_obj  weight · priority · score(value)
//!         − Σ_con  violation · weight · penalty
//!
//! score(v) = MINIMIZE_SCALE / (|v| + 1)   for minimized objectives
//!          = v · MAXIMIZE_SCALE           for maximized objectives
//! ```
//!
//! The `+ 1` keeps the minimization score finite at zero; it also means
//! minimized objectives are scored on magnitude, so callers whose values can
//! go negative should shift them first.
//!
//! [`evaluate_batch`] is the unit of parallelism: with the `parallel`
//! feature it spreads a population over the rayon pool, and results keep
//! input order either way.

mod solution;

pub use solution::{ParetoMeta, Solution};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{OptimizeError, Result};
use crate::problem::{Assignment, Direction, Problem};

/// Numerator of the minimization score.
pub const MINIMIZE_SCALE: f64 = 1000.0;

/// Multiplier of the maximization score.
pub const MAXIMIZE_SCALE: f64 = 1.0;

/// Evaluates one assignment against `problem`.
///
/// # Errors
///
/// [`OptimizeError::Evaluation`] if any evaluator fails or returns a
/// non-finite value.
pub fn evaluate(assignment: Assignment, problem: &Problem) -> Result<Solution> {
    let mut fitness = 0.0;

    let mut objective_values = Vec::with_capacity(problem.objective_count());
    for obj in problem.objectives() {
        let raw = obj
            .evaluate(&assignment)
            .map_err(|e| OptimizeError::evaluation(&obj.id, e))?;
        if !raw.is_finite() {
            return Err(OptimizeError::evaluation(
                &obj.id,
                format!("evaluator returned non-finite value {raw}"),
            ));
        }
        let value = obj.clamp(raw);
        let score = match obj.direction {
            Direction::Minimize => MINIMIZE_SCALE / (value.abs() + 1.0),
            Direction::Maximize => value * MAXIMIZE_SCALE,
        };
        fitness += obj.weight * obj.priority as f64 * score;
        objective_values.push(value);
    }

    let mut constraint_values = Vec::with_capacity(problem.constraints().len());
    let mut violations = Vec::new();
    for con in problem.constraints() {
        let value = con
            .evaluate(&assignment)
            .map_err(|e| OptimizeError::evaluation(&con.id, e))?;
        if !value.is_finite() {
            return Err(OptimizeError::evaluation(
                &con.id,
                format!("evaluator returned non-finite value {value}"),
            ));
        }
        let violation = con.violation(value);
        if violation > 0.0 {
            fitness -= con.penalty_for(value);
            violations.push(format!(
                "{}: value {value} violates {:?} bound {} by {violation}",
                con.id, con.kind, con.bound
            ));
        }
        constraint_values.push(value);
    }

    Ok(Solution {
        assignment,
        objective_values,
        constraint_values,
        fitness,
        feasible: violations.is_empty(),
        violations,
        pareto: ParetoMeta::default(),
    })
}

/// Evaluates a batch of assignments, in parallel when requested.
///
/// Output order matches input order. If any assignment fails, the error of
/// the lowest-index failing assignment is returned, whether or not the
/// batch ran in parallel.
pub fn evaluate_batch(
    problem: &Problem,
    assignments: Vec<Assignment>,
    parallel: bool,
) -> Result<Vec<Solution>> {
    #[cfg(feature = "parallel")]
    if parallel {
        let results: Vec<Result<Solution>> = assignments
            .into_par_iter()
            .map(|a| evaluate(a, problem))
            .collect();
        return results.into_iter().collect();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    assignments
        .into_iter()
        .map(|a| evaluate(a, problem))
        .collect()
}
