//! Optimizer parameters.
//!
//! [`OptimizerParameters`] is the single configuration record shared by the
//! annealing and evolutionary optimizers. It can be built in code with the
//! `with_*` builder methods, started from a preset, or loaded from TOML.
//!
//! # Examples
//!
//! ```
//! use u_optcore::params::{CoolingMode, OptimizerParameters};
//!
//! let params = OptimizerParameters::default()
//!     .with_population_size(60)
//!     .with_cooling(CoolingMode::Adaptive)
//!     .with_max_time_minutes(0.5)
//!     .with_seed(42);
//! assert!(params.validate().is_ok());
//! ```
//!
//! ```
//! use u_optcore::params::OptimizerParameters;
//!
//! let params = OptimizerParameters::from_toml_str(r#"
//!     population_size = 40
//!     max_generations = 200
//!     mutation_rate = 0.2
//!     cooling = "adaptive"
//! "#).unwrap();
//! assert_eq!(params.population_size, 40);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{OptimizeError, Result};

/// Errors reading parameters from a configuration source.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Temperature reduction rule for simulated annealing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoolingMode {
    /// `T_{k+1} = cooling_rate * T_k`.
    #[default]
    Geometric,

    /// Geometric cooling whose multiplier is retuned every step to keep the
    /// running acceptance rate between 0.1 and 0.5.
    Adaptive,
}

/// Configuration record recognized by every optimizer in the crate.
///
/// Count limits use `0` to mean "no limit" (`max_iterations`) and
/// `max_time` uses `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct OptimizerParameters {
    /// Starting annealing temperature.
    pub initial_temperature: f64,

    /// Annealing stops once the temperature drops to this value.
    pub final_temperature: f64,

    /// Geometric cooling factor in (0, 1). Also the starting multiplier for
    /// adaptive cooling.
    pub cooling_rate: f64,

    /// Cooling rule.
    pub cooling: CoolingMode,

    /// Number of solutions kept in each generation.
    pub population_size: usize,

    /// Maximum number of generations of the evolutionary optimizer.
    pub max_generations: usize,

    /// Maximum number of annealing steps, or offspring evaluations for the
    /// evolutionary optimizer. 0 = no limit.
    pub max_iterations: usize,

    /// Wall-clock budget in minutes. `None` = no limit.
    pub max_time: Option<f64>,

    /// Normalized fitness variance under which the population counts as
    /// converged.
    pub convergence_threshold: f64,

    /// Fraction of distinct assignments the population must exceed for the
    /// convergence stop to fire.
    pub diversity_threshold: f64,

    /// Probability that an offspring is mutated.
    pub mutation_rate: f64,

    /// Probability that a parent pair is recombined.
    pub crossover_rate: f64,

    /// Parents selected per generation, as a multiple of `population_size`.
    pub selection_pressure: f64,

    /// Number of solutions sampled per tournament.
    pub tournament_size: usize,

    /// Number of variables perturbed to form an annealing neighbor.
    pub neighborhood_size: usize,

    /// Relative gap between best and current fitness that triggers a
    /// restart. 0 disables restarts.
    pub restart_threshold: f64,

    /// Strict-improvement refinement steps run on every new best annealing
    /// solution. 0 disables local search.
    pub local_search_iterations: usize,

    /// Random seed. `None` draws a fresh seed per run.
    pub seed: Option<u64>,

    /// Evaluate populations on the rayon thread pool.
    pub parallel: bool,
}

impl Default for OptimizerParameters {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            final_temperature: 1e-3,
            cooling_rate: 0.95,
            cooling: CoolingMode::default(),
            population_size: 100,
            max_generations: 500,
            max_iterations: 100_000,
            max_time: None,
            convergence_threshold: 1e-6,
            diversity_threshold: 0.0,
            mutation_rate: 0.1,
            crossover_rate: 0.9,
            selection_pressure: 1.0,
            tournament_size: 3,
            neighborhood_size: 3,
            restart_threshold: 0.0,
            local_search_iterations: 0,
            seed: None,
            parallel: true,
        }
    }
}

impl OptimizerParameters {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_final_temperature(mut self, t: f64) -> Self {
        self.final_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingMode) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the wall-clock budget in minutes.
    pub fn with_max_time_minutes(mut self, minutes: f64) -> Self {
        self.max_time = Some(minutes);
        self
    }

    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold.max(0.0);
        self
    }

    pub fn with_diversity_threshold(mut self, threshold: f64) -> Self {
        self.diversity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_selection_pressure(mut self, pressure: f64) -> Self {
        self.selection_pressure = pressure;
        self
    }

    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    pub fn with_neighborhood_size(mut self, n: usize) -> Self {
        self.neighborhood_size = n;
        self
    }

    pub fn with_restart_threshold(mut self, threshold: f64) -> Self {
        self.restart_threshold = threshold.max(0.0);
        self
    }

    pub fn with_local_search_iterations(mut self, n: usize) -> Self {
        self.local_search_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Wall-clock budget as a [`Duration`], if one is set.
    ///
    /// Budgets beyond what a `Duration` holds saturate at [`Duration::MAX`].
    pub fn time_limit(&self) -> Option<Duration> {
        self.max_time.map(|minutes| {
            Duration::try_from_secs_f64((minutes * 60.0).max(0.0)).unwrap_or(Duration::MAX)
        })
    }

    /// Number of parents drawn per generation: even, at least two.
    pub fn parent_count(&self) -> usize {
        let n = (self.selection_pressure * self.population_size as f64).ceil() as usize;
        let n = n.max(2);
        n + n % 2
    }

    /// Preset for quick feasibility checks and interactive use.
    ///
    /// - Population: 40, Generations: 100, Time limit: 10s
    pub fn fast() -> Self {
        Self {
            population_size: 40,
            max_generations: 100,
            max_iterations: 20_000,
            cooling_rate: 0.9,
            max_time: Some(10.0 / 60.0),
            ..Self::default()
        }
    }

    /// Preset balancing quality against run time.
    ///
    /// - Population: 100, Generations: 300, Time limit: 30s
    pub fn balanced() -> Self {
        Self {
            population_size: 100,
            max_generations: 300,
            max_iterations: 100_000,
            max_time: Some(0.5),
            ..Self::default()
        }
    }

    /// Preset for overnight-style planning runs.
    ///
    /// - Population: 150, Generations: 500, Time limit: 60s
    pub fn quality() -> Self {
        Self {
            population_size: 150,
            max_generations: 500,
            max_iterations: 500_000,
            cooling_rate: 0.98,
            local_search_iterations: 20,
            max_time: Some(1.0),
            ..Self::default()
        }
    }

    /// Picks a preset from the number of decision variables.
    ///
    /// - `variable_count < 20` → [`fast()`](Self::fast)
    /// - `20 ≤ variable_count < 100` → [`balanced()`](Self::balanced)
    /// - `variable_count ≥ 100` → [`quality()`](Self::quality)
    pub fn auto_select(variable_count: usize) -> Self {
        if variable_count < 20 {
            Self::fast()
        } else if variable_count < 100 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Loads parameters from a TOML file and validates them.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        Self::from_toml_str(&contents)
    }

    /// Parses parameters from a TOML string and validates them.
    ///
    /// Missing keys fall back to [`Default`].
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let params: Self = toml::from_str(s).map_err(ConfigError::from)?;
        params.validate()?;
        Ok(params)
    }

    /// Checks every parameter against its admissible range.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(OptimizeError::InvalidParameters(msg.to_string()));

        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return fail("initial_temperature must be positive and finite");
        }
        if !(self.final_temperature >= 0.0 && self.final_temperature < self.initial_temperature)
        {
            return fail("final_temperature must lie in [0, initial_temperature)");
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return fail("cooling_rate must lie in (0, 1)");
        }
        if self.population_size < 2 {
            return fail("population_size must be at least 2");
        }
        if self.max_generations == 0 {
            return fail("max_generations must be at least 1");
        }
        if let Some(minutes) = self.max_time {
            if !(minutes.is_finite() && minutes >= 0.0) {
                return fail("max_time must be a non-negative number of minutes");
            }
            if Duration::try_from_secs_f64(minutes * 60.0).is_err() {
                return fail("max_time is too large");
            }
        }
        if !(self.convergence_threshold >= 0.0) {
            return fail("convergence_threshold must be non-negative");
        }
        if !(0.0..=1.0).contains(&self.diversity_threshold) {
            return fail("diversity_threshold must lie in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return fail("mutation_rate must lie in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return fail("crossover_rate must lie in [0, 1]");
        }
        if !(self.selection_pressure.is_finite() && self.selection_pressure > 0.0) {
            return fail("selection_pressure must be positive");
        }
        if self.tournament_size < 2 {
            return fail("tournament_size must be at least 2");
        }
        if self.neighborhood_size == 0 {
            return fail("neighborhood_size must be at least 1");
        }
        if !(self.restart_threshold >= 0.0) {
            return fail("restart_threshold must be non-negative");
        }
        Ok(())
    }
}
