//! Metaheuristic optimization core for logistics planning.
//!
//! Searches a bounded, mixed-type variable space to satisfy constraints and
//! optimize one or more weighted objectives:
//!
//! - **Problem model** ([`problem`]): continuous, discrete, binary and
//!   integer variables; objectives and constraints backed by caller-supplied
//!   evaluators; validated by [`build_problem`].
//! - **Solution evaluator** ([`eval`]): objective values, constraint
//!   violations and one scalar fitness per assignment.
//! - **Simulated Annealing** ([`sa`]): single-solution search on the scalar
//!   fitness with geometric or adaptive cooling.
//! - **Evolutionary optimizer** ([`ga`]): tournament selection, uniform
//!   crossover, type-aware mutation, elitist survivors; scalarized or
//!   Pareto-ranked.
//! - **Pareto engine** ([`pareto`]): dominance, non-dominated sorting,
//!   crowding distance (NSGA-II).
//! - **Reporter** ([`report`]): Pareto fronts, quality metrics and advisory
//!   recommendations.
//!
//! # Architecture
//!
//! The crate contains no logistics concepts. Dock-door schedules, pick paths
//! and slotting plans are mapped onto variables, objectives and constraints
//! by callers, who also persist and publish results. Every run owns its
//! population and a seeded generator; the [`Problem`] is shared read-only.
//!
//! # Example
//!
//! ```
//! use u_optcore::{build_problem, run_annealing, Objective, OptimizerParameters, Variable};
//!
//! let params = OptimizerParameters::fast().with_seed(7);
//! let problem = build_problem(
//!     vec![Variable::continuous("x", 0.0, 10.0)],
//!     vec![Objective::minimize("x", |a| a["x"])],
//!     vec![],
//!     params.clone(),
//! )
//! .unwrap();
//!
//! let result = run_annealing(&problem, &params).unwrap();
//! assert!(problem.is_within_domains(result.best.assignment()));
//! ```

pub mod budget;
pub mod error;
pub mod eval;
pub mod ga;
pub mod params;
pub mod pareto;
pub mod problem;
pub mod random;
pub mod report;
pub mod sa;
pub mod strategy;

pub use budget::TerminationReason;
pub use error::{OptimizeError, Result};
pub use eval::{evaluate, Solution};
pub use ga::{EvolutionOutcome, EvolutionaryRunner, ObjectiveMode};
pub use params::{CoolingMode, OptimizerParameters};
pub use problem::{
    build_problem, Assignment, Constraint, ConstraintKind, Direction, Objective, Problem,
    Variable, VariableKind,
};
pub use report::{ParetoFront, ParetoResult, SingleObjectiveResult};
pub use sa::AnnealingRunner;
pub use strategy::{optimize, Strategy};

/// Runs simulated annealing on `problem`.
pub fn run_annealing(
    problem: &Problem,
    parameters: &OptimizerParameters,
) -> Result<SingleObjectiveResult> {
    AnnealingRunner::run(problem, parameters)
}

/// Runs the evolutionary optimizer on `problem` in the given mode.
pub fn run_evolutionary(
    problem: &Problem,
    parameters: &OptimizerParameters,
    mode: ObjectiveMode,
) -> Result<EvolutionOutcome> {
    EvolutionaryRunner::run(problem, parameters, mode)
}
