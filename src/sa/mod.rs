//! Simulated Annealing (SA).
//!
//! A single-solution trajectory over the problem's scalar fitness. Worse
//! neighbors are accepted with the Metropolis probability
//! `exp(-Δ / T)`, where Δ is the fitness loss; the temperature `T` falls
//! geometrically, or adaptively from the running acceptance rate.
//!
//! Optional extras on top of the plain loop:
//!
//! - local search: a bounded hill climb on every new best
//! - restarts: a fresh random solution when the current one trails the
//!   best by more than `restart_threshold · |best|`
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod cooling;
mod runner;

pub use cooling::{ACCEPTANCE_HIGH, ACCEPTANCE_LOW};
pub use runner::{acceptance_probability, AnnealingRunner};
