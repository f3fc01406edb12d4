//! Advisory recommendations derived from run metrics.
//!
//! Nothing here feeds back into the algorithms; the output is text for the
//! planner reviewing a run.

use serde::{Deserialize, Serialize};

use super::metrics::{FrontMetrics, PopulationMetrics};
use super::RunStats;
use crate::budget::TerminationReason;
use crate::eval::Solution;

const LOW_DIVERSITY: f64 = 0.2;
const LOW_CONVERGENCE: f64 = 0.5;
const LOW_FEASIBLE_RATIO: f64 = 0.5;
const LOW_ACCEPTANCE: f64 = 0.05;
const HIGH_ACCEPTANCE: f64 = 0.9;
const LOW_IMPROVEMENT: f64 = 0.01;
const LOW_UNIFORMITY: f64 = 0.5;
const SPARSE_FRONT: usize = 3;

/// Recommendations grouped by urgency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub immediate: Vec<String>,
    pub short_term: Vec<String>,
    pub long_term: Vec<String>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.immediate.is_empty() && self.short_term.is_empty() && self.long_term.is_empty()
    }

    /// All recommendations, most urgent first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.immediate
            .iter()
            .chain(&self.short_term)
            .chain(&self.long_term)
            .map(String::as_str)
    }

    fn common(&mut self, best: &Solution, stats: &RunStats) {
        if !best.is_feasible() {
            self.immediate.push(format!(
                "Best solution violates {} constraint(s); review penalties and bounds before acting on it: {}",
                best.violations().len(),
                best.violations().join("; ")
            ));
        }
        match stats.termination {
            TerminationReason::TimeLimit => self.immediate.push(
                "Run stopped on its time limit; extend max_time if results look premature".into(),
            ),
            TerminationReason::Cancelled => self
                .immediate
                .push("Run was cancelled; the result is the best found before cancellation".into()),
            _ => {}
        }
    }

    fn population(&mut self, metrics: &PopulationMetrics) {
        if metrics.diversity < LOW_DIVERSITY {
            self.short_term.push(format!(
                "Population diversity is low ({:.2}); raise mutation_rate or population_size",
                metrics.diversity
            ));
        }
        if metrics.convergence < LOW_CONVERGENCE {
            self.short_term.push(format!(
                "Population has not converged ({:.2}); raise max_generations or max_time",
                metrics.convergence
            ));
        }
        if metrics.feasible_ratio < LOW_FEASIBLE_RATIO {
            self.long_term.push(format!(
                "Only {:.0}% of the final population is feasible; tighten variable domains to exclude infeasible regions",
                metrics.feasible_ratio * 100.0
            ));
        }
    }

    /// Recommendations for an annealing run.
    pub fn for_annealing(best: &Solution, stats: &RunStats) -> Self {
        let mut rec = Self::default();
        rec.common(best, stats);
        if stats.iterations > 0 {
            let acceptance = stats.acceptance_rate();
            if acceptance < LOW_ACCEPTANCE {
                rec.short_term.push(format!(
                    "Acceptance rate is {acceptance:.3}; raise initial_temperature or use adaptive cooling"
                ));
            } else if acceptance > HIGH_ACCEPTANCE {
                rec.short_term.push(format!(
                    "Acceptance rate is {acceptance:.3}; lower initial_temperature or cooling_rate"
                ));
            }
            if stats.improvement_rate() < LOW_IMPROVEMENT {
                rec.long_term.push(
                    "Few improving moves; enable local search or restarts, or model a tighter neighborhood".into(),
                );
            }
        }
        rec
    }

    /// Recommendations for a single-objective evolutionary run.
    pub fn for_evolution(best: &Solution, stats: &RunStats, metrics: &PopulationMetrics) -> Self {
        let mut rec = Self::default();
        rec.common(best, stats);
        rec.population(metrics);
        rec
    }

    /// Recommendations for a Pareto run.
    pub fn for_pareto(
        best: &Solution,
        stats: &RunStats,
        front: &FrontMetrics,
        population: &PopulationMetrics,
        objective_count: usize,
    ) -> Self {
        let mut rec = Self::default();
        rec.common(best, stats);
        rec.population(population);
        if front.size < SPARSE_FRONT {
            rec.short_term.push(format!(
                "Pareto front has only {} solution(s); raise population_size",
                front.size
            ));
        }
        if front.size >= SPARSE_FRONT && front.uniformity < LOW_UNIFORMITY {
            rec.short_term.push(format!(
                "Pareto front is unevenly spaced (uniformity {:.2}); raise population_size or max_generations",
                front.uniformity
            ));
        }
        if objective_count > 3 {
            rec.long_term.push(format!(
                "{objective_count} objectives dilute Pareto pressure; merge or prioritize objectives"
            ));
        }
        rec.long_term.push(
            "Hypervolume is approximate; compare runs with a reference-point hypervolume".into(),
        );
        rec
    }
}
