//! Problem model: variables, objectives, constraints.
//!
//! Callers translate their domain (dock doors, pick lists, slotting
//! candidates) into a [`Problem`] with [`build_problem`], run an optimizer,
//! and decode the winning [`Assignment`] back into domain decisions.
//!
//! # Example
//!
//! ```
//! use u_optcore::params::OptimizerParameters;
//! use u_optcore::problem::{build_problem, Constraint, Objective, Variable};
//!
//! let problem = build_problem(
//!     vec![
//!         Variable::integer("doors", 1, 12),
//!         Variable::continuous("shift_hours", 4.0, 12.0),
//!     ],
//!     vec![Objective::minimize("labor_cost", |a| a["doors"] * a["shift_hours"] * 21.0)
//!         .references(["doors", "shift_hours"])],
//!     vec![Constraint::at_most("capacity", 60.0, |a| a["doors"] * 5.0)
//!         .references(["doors"])],
//!     OptimizerParameters::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(problem.variables().len(), 2);
//! ```

mod assignment;
mod constraint;
mod objective;
mod variable;

pub use assignment::Assignment;
pub use constraint::{Constraint, ConstraintKind, EQUALITY_TOLERANCE};
pub use objective::{Direction, EvaluatorFn, Objective};
pub use variable::{Domain, Variable, VariableKind, CONTINUOUS_PERTURBATION};

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;

use crate::error::{OptimizeError, Result};
use crate::params::OptimizerParameters;
use assignment::VariableIndex;

/// Largest number of grid steps a discrete domain may span; beyond it step
/// indices lose integer precision in `f64`.
const MAX_GRID_STEPS: f64 = 9.0e15;

/// A validated optimization problem.
///
/// Read-only for the duration of a run; optimizers only borrow it.
#[derive(Debug)]
pub struct Problem {
    variables: Vec<Variable>,
    objectives: Vec<Objective>,
    constraints: Vec<Constraint>,
    parameters: OptimizerParameters,
    index: Arc<VariableIndex>,
}

/// Validates the parts of a problem and assembles them.
///
/// # Errors
///
/// [`OptimizeError::InvalidProblemDefinition`] when the variable set is
/// empty, ids repeat, a domain is inverted, non-finite, too wide or empty, a
/// discrete step is not positive or too fine, a current value lies outside
/// its domain, an objective or constraint references or reads an unknown
/// variable (every evaluator is run once on the current values), an objective
/// weight leaves `[0, 1]`, a priority is zero, soft bounds are inverted, or
/// there is no objective. [`OptimizeError::InvalidParameters`] when
/// `parameters` fail validation.
pub fn build_problem(
    variables: Vec<Variable>,
    objectives: Vec<Objective>,
    constraints: Vec<Constraint>,
    parameters: OptimizerParameters,
) -> Result<Problem> {
    if variables.is_empty() {
        return Err(OptimizeError::invalid_problem("variable set is empty"));
    }
    if objectives.is_empty() {
        return Err(OptimizeError::invalid_problem("at least one objective is required"));
    }

    let mut seen = HashSet::with_capacity(variables.len());
    for var in &variables {
        if !seen.insert(var.id.as_str()) {
            return Err(OptimizeError::invalid_problem(format!(
                "duplicate variable id '{}'",
                var.id
            )));
        }
        validate_variable(var)?;
    }

    let mut objective_ids = HashSet::with_capacity(objectives.len());
    for obj in &objectives {
        if !objective_ids.insert(obj.id.as_str()) {
            return Err(OptimizeError::invalid_problem(format!(
                "duplicate objective id '{}'",
                obj.id
            )));
        }
        check_references("objective", &obj.id, &obj.variables, &seen)?;
        if !(0.0..=1.0).contains(&obj.weight) {
            return Err(OptimizeError::invalid_problem(format!(
                "objective '{}' weight {} is outside [0, 1]",
                obj.id, obj.weight
            )));
        }
        if obj.priority == 0 {
            return Err(OptimizeError::invalid_problem(format!(
                "objective '{}' priority must be positive",
                obj.id
            )));
        }
        if let Some((min, max)) = obj.soft_bounds {
            if !(min <= max) {
                return Err(OptimizeError::invalid_problem(format!(
                    "objective '{}' soft bounds are inverted",
                    obj.id
                )));
            }
        }
    }

    for con in &constraints {
        check_references("constraint", &con.id, &con.variables, &seen)?;
        if let ConstraintKind::Bound { lower } = con.kind {
            if !(lower <= con.bound) {
                return Err(OptimizeError::invalid_problem(format!(
                    "constraint '{}' has lower limit above its bound",
                    con.id
                )));
            }
        }
        if !(con.weight >= 0.0 && con.penalty >= 0.0) {
            return Err(OptimizeError::invalid_problem(format!(
                "constraint '{}' weight and penalty must be non-negative",
                con.id
            )));
        }
    }

    parameters.validate()?;

    let index = Arc::new(VariableIndex::new(
        variables.iter().map(|v| v.id.clone()).collect(),
    ));
    check_evaluator_reads(&index, &variables, &objectives, &constraints)?;

    Ok(Problem {
        variables,
        objectives,
        constraints,
        parameters,
        index,
    })
}

fn validate_variable(var: &Variable) -> Result<()> {
    let d = var.domain;
    if !(d.min.is_finite() && d.max.is_finite()) {
        return Err(OptimizeError::invalid_problem(format!(
            "variable '{}' has a non-finite domain",
            var.id
        )));
    }
    if d.min > d.max {
        return Err(OptimizeError::invalid_problem(format!(
            "variable '{}' has min {} > max {}",
            var.id, d.min, d.max
        )));
    }
    if !d.range().is_finite() {
        return Err(OptimizeError::invalid_problem(format!(
            "variable '{}' has a domain too wide to sample",
            var.id
        )));
    }
    match var.kind {
        VariableKind::Discrete => match d.step {
            Some(step) if step.is_finite() && step > 0.0 => {
                if !(d.range() / step <= MAX_GRID_STEPS) {
                    return Err(OptimizeError::invalid_problem(format!(
                        "discrete variable '{}' has too many steps for its domain",
                        var.id
                    )));
                }
            }
            _ => {
                return Err(OptimizeError::invalid_problem(format!(
                    "discrete variable '{}' needs a positive step",
                    var.id
                )))
            }
        },
        VariableKind::Binary if d.min != 0.0 || d.max != 1.0 => {
            return Err(OptimizeError::invalid_problem(format!(
                "binary variable '{}' must have domain [0, 1]",
                var.id
            )));
        }
        _ => {}
    }
    if !var.has_admissible_value() {
        return Err(OptimizeError::invalid_problem(format!(
            "variable '{}' has no admissible value",
            var.id
        )));
    }
    if !var.contains(var.value) {
        return Err(OptimizeError::invalid_problem(format!(
            "variable '{}' current value {} is outside its domain",
            var.id, var.value
        )));
    }
    Ok(())
}

/// Runs every evaluator once on the current values and rejects any that
/// index an undeclared variable id. Evaluator errors are ignored here.
fn check_evaluator_reads(
    index: &Arc<VariableIndex>,
    variables: &[Variable],
    objectives: &[Objective],
    constraints: &[Constraint],
) -> Result<()> {
    let values = variables.iter().map(|v| v.value).collect();
    let (assignment, reads) = Assignment::recording(Arc::clone(index), values);
    let first_unknown = || reads.lock().ok().and_then(|r| r.first().cloned());

    for obj in objectives {
        let _ = obj.evaluate(&assignment);
        if let Some(missing) = first_unknown() {
            return Err(OptimizeError::invalid_problem(format!(
                "objective '{}' reads unknown variable '{missing}'",
                obj.id
            )));
        }
    }
    for con in constraints {
        let _ = con.evaluate(&assignment);
        if let Some(missing) = first_unknown() {
            return Err(OptimizeError::invalid_problem(format!(
                "constraint '{}' reads unknown variable '{missing}'",
                con.id
            )));
        }
    }
    Ok(())
}

fn check_references(kind: &str, id: &str, refs: &[String], known: &HashSet<&str>) -> Result<()> {
    match refs.iter().find(|r| !known.contains(r.as_str())) {
        Some(missing) => Err(OptimizeError::invalid_problem(format!(
            "{kind} '{id}' references unknown variable '{missing}'"
        ))),
        None => Ok(()),
    }
}

impl Problem {
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Parameters supplied at build time.
    pub fn parameters(&self) -> &OptimizerParameters {
        &self.parameters
    }

    /// Number of objectives.
    pub fn objective_count(&self) -> usize {
        self.objectives.len()
    }

    /// Position of an objective by id.
    pub fn objective_position(&self, id: &str) -> Option<usize> {
        self.objectives.iter().position(|o| o.id == id)
    }

    /// Position of a constraint by id.
    pub fn constraint_position(&self, id: &str) -> Option<usize> {
        self.constraints.iter().position(|c| c.id == id)
    }

    /// The caller-supplied current values of every variable.
    pub fn current_assignment(&self) -> Assignment {
        self.assignment_from_values(self.variables.iter().map(|v| v.value).collect())
    }

    /// Builds an assignment from values in declaration order, clamping each
    /// into its domain.
    ///
    /// # Panics
    /// Panics if `values.len()` differs from the number of variables.
    pub fn assignment_from_values(&self, values: Vec<f64>) -> Assignment {
        assert_eq!(
            values.len(),
            self.variables.len(),
            "assignment length must match variable count"
        );
        let values = self
            .variables
            .iter()
            .zip(values)
            .map(|(var, v)| var.clamp(v))
            .collect();
        Assignment::new(Arc::clone(&self.index), values)
    }

    /// Draws a uniformly random assignment.
    pub fn random_assignment<R: Rng>(&self, rng: &mut R) -> Assignment {
        let values = self
            .variables
            .iter()
            .map(|var| var.random_value(rng))
            .collect();
        Assignment::new(Arc::clone(&self.index), values)
    }

    /// Perturbs up to `neighborhood_size` distinct variables of `base`.
    pub fn neighbor<R: Rng>(
        &self,
        base: &Assignment,
        neighborhood_size: usize,
        rng: &mut R,
    ) -> Assignment {
        let n = self.variables.len();
        let k = neighborhood_size.clamp(1, n);
        let mut next = base.clone();
        for i in rand::seq::index::sample(rng, n, k) {
            next.set(i, self.variables[i].perturb(base.value(i), rng));
        }
        next
    }

    /// Perturbs each variable independently with probability `per_variable`.
    pub fn mutate<R: Rng>(&self, assignment: &mut Assignment, per_variable: f64, rng: &mut R) {
        for (i, var) in self.variables.iter().enumerate() {
            if rng.random_bool(per_variable) {
                assignment.set(i, var.perturb(assignment.value(i), rng));
            }
        }
    }

    /// Uniform crossover: each gene comes from exactly one parent.
    pub fn crossover<R: Rng>(
        &self,
        a: &Assignment,
        b: &Assignment,
        rng: &mut R,
    ) -> (Assignment, Assignment) {
        let mut first = a.clone();
        let mut second = b.clone();
        for (i, var) in self.variables.iter().enumerate() {
            if rng.random_bool(0.5) {
                first.set(i, var.clamp(b.value(i)));
                second.set(i, var.clamp(a.value(i)));
            }
        }
        (first, second)
    }

    /// Whether every value of `assignment` lies in its domain.
    pub fn is_within_domains(&self, assignment: &Assignment) -> bool {
        self.variables
            .iter()
            .zip(assignment.values())
            .all(|(var, &v)| var.contains(v))
    }
}
