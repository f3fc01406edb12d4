//! Temperature schedules.

use crate::params::{CoolingMode, OptimizerParameters};

/// Steps per acceptance-rate measurement for adaptive cooling.
const ADAPT_WINDOW: usize = 20;

/// Running acceptance rate above which adaptive cooling speeds up.
pub const ACCEPTANCE_HIGH: f64 = 0.5;

/// Running acceptance rate below which adaptive cooling slows down.
pub const ACCEPTANCE_LOW: f64 = 0.1;

const MIN_MULTIPLIER: f64 = 0.5;
const MAX_MULTIPLIER: f64 = 0.999;

/// Applies the configured cooling rule, one step at a time.
#[derive(Debug, Clone)]
pub(crate) struct Cooler {
    mode: CoolingMode,
    multiplier: f64,
    window_steps: usize,
    window_accepted: usize,
}

impl Cooler {
    pub(crate) fn new(params: &OptimizerParameters) -> Self {
        Self {
            mode: params.cooling,
            multiplier: params.cooling_rate,
            window_steps: 0,
            window_accepted: 0,
        }
    }

    /// Current multiplier applied to the temperature.
    pub(crate) fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Returns the temperature after one step in which a move was or was
    /// not `accepted`.
    pub(crate) fn next(&mut self, temperature: f64, accepted: bool) -> f64 {
        if self.mode == CoolingMode::Adaptive {
            self.window_steps += 1;
            if accepted {
                self.window_accepted += 1;
            }
            if self.window_steps >= ADAPT_WINDOW {
                let rate = self.window_accepted as f64 / self.window_steps as f64;
                self.retune(rate);
                self.window_steps = 0;
                self.window_accepted = 0;
            }
        }
        temperature * self.multiplier
    }

    /// Strengthens cooling while too many moves are accepted and relaxes it
    /// while too few are.
    fn retune(&mut self, acceptance_rate: f64) {
        if acceptance_rate > ACCEPTANCE_HIGH {
            self.multiplier = (self.multiplier * 0.95).max(MIN_MULTIPLIER);
        } else if acceptance_rate < ACCEPTANCE_LOW {
            self.multiplier = (1.0 - (1.0 - self.multiplier) * 0.5).min(MAX_MULTIPLIER);
        }
    }
}
