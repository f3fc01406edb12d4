//! Evaluated solutions.

use crate::problem::{Assignment, Problem};

/// Multi-objective annotations attached during Pareto ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParetoMeta {
    /// Non-domination rank (0 = Pareto front). `None` until ranked.
    pub rank: Option<usize>,
    /// Crowding distance within the solution's front.
    pub crowding_distance: f64,
    /// Number of solutions in the ranked set that dominate this one.
    pub dominance_count: usize,
}

impl Default for ParetoMeta {
    fn default() -> Self {
        Self {
            rank: None,
            crowding_distance: 0.0,
            dominance_count: 0,
        }
    }
}

/// An evaluated assignment.
///
/// Produced only by [`evaluate`](super::evaluate); everything except the
/// Pareto annotations is fixed from then on.
#[derive(Debug, Clone)]
pub struct Solution {
    pub(crate) assignment: Assignment,
    pub(crate) objective_values: Vec<f64>,
    pub(crate) constraint_values: Vec<f64>,
    pub(crate) fitness: f64,
    pub(crate) feasible: bool,
    pub(crate) violations: Vec<String>,
    pub(crate) pareto: ParetoMeta,
}

impl Solution {
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Objective values (clamped to soft bounds) in objective order.
    pub fn objective_values(&self) -> &[f64] {
        &self.objective_values
    }

    /// Raw constraint evaluator values in constraint order.
    pub fn constraint_values(&self) -> &[f64] {
        &self.constraint_values
    }

    /// Scalar fitness. Higher is better.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Human-readable violation descriptions, each tagged with the
    /// constraint id.
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    pub fn pareto(&self) -> &ParetoMeta {
        &self.pareto
    }

    pub fn rank(&self) -> Option<usize> {
        self.pareto.rank
    }

    pub fn crowding_distance(&self) -> f64 {
        self.pareto.crowding_distance
    }

    /// Value of the objective with id `id`.
    pub fn objective(&self, problem: &Problem, id: &str) -> Option<f64> {
        problem
            .objective_position(id)
            .map(|i| self.objective_values[i])
    }

    /// Value of the constraint with id `id`.
    pub fn constraint(&self, problem: &Problem, id: &str) -> Option<f64> {
        problem
            .constraint_position(id)
            .map(|i| self.constraint_values[i])
    }
}
