//! Population-based evolutionary optimizer.
//!
//! One engine serves both scalarized and Pareto searches; the
//! [`ObjectiveMode`] decides how tournaments are judged and which members
//! survive each generation.
//!
//! | Step | Single | Multi |
//! |---|---|---|
//! | Tournament winner | highest fitness | lowest rank, widest crowding, then fitness |
//! | Survivors | fittest of parents + offspring | NSGA-II environmental selection |
//! | Result | [`SingleObjectiveResult`](crate::report::SingleObjectiveResult) | [`ParetoResult`](crate::report::ParetoResult) |
//!
//! Crossover is uniform per variable; mutation perturbs each variable of a
//! mutated offspring with probability [`GENE_MUTATION_RATE`] using the same
//! type-aware rules as annealing neighbors.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*

mod runner;
mod selection;

pub use runner::{EvolutionOutcome, EvolutionaryRunner, ObjectiveMode, GENE_MUTATION_RATE};
