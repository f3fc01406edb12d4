//! Decision variables and their domains.
//!
//! Every variable value that leaves this module is a member of its domain:
//! random draws, perturbations and clamping all snap to the kind's lattice
//! (the `step` grid for discrete, whole numbers for integer, {0, 1} for
//! binary).

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fraction of the domain range used for continuous perturbation.
pub const CONTINUOUS_PERTURBATION: f64 = 0.1;

/// Kind of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    /// Any real value in `[min, max]`.
    Continuous,
    /// `min + k * step` for whole `k`, not exceeding `max`.
    Discrete,
    /// 0 or 1.
    Binary,
    /// Whole numbers in `[min, max]`.
    Integer,
}

/// Bounds of a variable. `step` is only meaningful for discrete variables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
}

impl Domain {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: None,
        }
    }

    pub fn with_step(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step: Some(step),
        }
    }

    /// Width of the domain.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// A decision variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: String,
    pub kind: VariableKind,
    pub domain: Domain,
    /// Current value as supplied by the caller. Must lie in the domain.
    pub value: f64,
    pub weight: f64,
}

impl Variable {
    /// Continuous variable on `[min, max]`, starting at `min`.
    pub fn continuous(id: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(id, VariableKind::Continuous, Domain::new(min, max))
    }

    /// Discrete variable on the grid `min, min + step, ..` up to `max`.
    pub fn discrete(id: impl Into<String>, min: f64, max: f64, step: f64) -> Self {
        Self::new(id, VariableKind::Discrete, Domain::with_step(min, max, step))
    }

    /// Integer variable on `[min, max]`.
    pub fn integer(id: impl Into<String>, min: i64, max: i64) -> Self {
        Self::new(
            id,
            VariableKind::Integer,
            Domain::new(min as f64, max as f64),
        )
    }

    /// Binary (0/1) variable.
    pub fn binary(id: impl Into<String>) -> Self {
        Self::new(id, VariableKind::Binary, Domain::new(0.0, 1.0))
    }

    fn new(id: impl Into<String>, kind: VariableKind, domain: Domain) -> Self {
        let mut var = Self {
            id: id.into(),
            kind,
            domain,
            value: 0.0,
            weight: 1.0,
        };
        var.value = var.clamp(domain.min);
        var
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Lowest admissible value.
    fn lower(&self) -> f64 {
        match self.kind {
            VariableKind::Integer => self.domain.min.ceil(),
            _ => self.domain.min,
        }
    }

    /// Highest admissible value.
    fn upper(&self) -> f64 {
        match self.kind {
            VariableKind::Integer => self.domain.max.floor(),
            VariableKind::Discrete => self.domain.min + self.grid_steps() as f64 * self.step(),
            _ => self.domain.max,
        }
    }

    fn step(&self) -> f64 {
        self.domain.step.unwrap_or(1.0)
    }

    /// Largest `k` with `min + k * step <= max`.
    fn grid_steps(&self) -> u64 {
        // Tolerance absorbs representation error, e.g. (1.0 - 0.0) / 0.1.
        ((self.domain.range() / self.step()) + 1e-9).floor().max(0.0) as u64
    }

    /// Whether the domain admits at least one value of this kind.
    pub(crate) fn has_admissible_value(&self) -> bool {
        self.lower() <= self.upper()
    }

    /// Whether `value` is a member of this variable's domain.
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() || value < self.lower() - 1e-9 || value > self.upper() + 1e-9 {
            return false;
        }
        match self.kind {
            VariableKind::Continuous => true,
            VariableKind::Binary => value == 0.0 || value == 1.0,
            VariableKind::Integer => value.fract() == 0.0,
            VariableKind::Discrete => {
                let k = (value - self.domain.min) / self.step();
                (k - k.round()).abs() < 1e-6
            }
        }
    }

    /// Maps any real number onto the nearest admissible value.
    pub fn clamp(&self, value: f64) -> f64 {
        let value = if value.is_nan() { self.lower() } else { value };
        match self.kind {
            VariableKind::Continuous => value.clamp(self.domain.min, self.domain.max),
            VariableKind::Binary => {
                if value >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            VariableKind::Integer => value.round().clamp(self.lower(), self.upper()),
            VariableKind::Discrete => {
                let k = ((value - self.domain.min) / self.step())
                    .round()
                    .clamp(0.0, self.grid_steps() as f64);
                self.domain.min + k * self.step()
            }
        }
    }

    /// Draws a uniformly random admissible value.
    pub fn random_value<R: Rng>(&self, rng: &mut R) -> f64 {
        match self.kind {
            VariableKind::Continuous => {
                if self.domain.range() > 0.0 {
                    rng.random_range(self.domain.min..=self.domain.max)
                } else {
                    self.domain.min
                }
            }
            VariableKind::Binary => {
                if rng.random_bool(0.5) {
                    1.0
                } else {
                    0.0
                }
            }
            VariableKind::Integer => {
                let lo = self.lower() as i64;
                let hi = self.upper() as i64;
                rng.random_range(lo..=hi) as f64
            }
            VariableKind::Discrete => {
                let k = rng.random_range(0..=self.grid_steps());
                self.domain.min + k as f64 * self.step()
            }
        }
    }

    /// Moves `value` to a nearby admissible value.
    ///
    /// Continuous: uniform shift within ±10% of the domain range.
    /// Discrete: ± one step. Integer: ±1. Binary: flip.
    pub fn perturb<R: Rng>(&self, value: f64, rng: &mut R) -> f64 {
        let moved = match self.kind {
            VariableKind::Continuous => {
                let span = self.domain.range() * CONTINUOUS_PERTURBATION;
                if span > 0.0 {
                    value + rng.random_range(-span..=span)
                } else {
                    value
                }
            }
            VariableKind::Discrete => value + self.step() * random_sign(rng),
            VariableKind::Integer => value + random_sign(rng),
            VariableKind::Binary => 1.0 - value,
        };
        self.clamp(moved)
    }
}

fn random_sign<R: Rng>(rng: &mut R) -> f64 {
    if rng.random_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_continuous_clamp() {
        let v = Variable::continuous("x", 0.0, 10.0);
        assert_eq!(v.clamp(-3.0), 0.0);
        assert_eq!(v.clamp(12.0), 10.0);
        assert_eq!(v.clamp(4.25), 4.25);
    }

    #[test]
    fn test_discrete_snaps_to_grid() {
        let v = Variable::discrete("slot", 0.0, 1.0, 0.25);
        assert_eq!(v.clamp(0.3), 0.25);
        assert_eq!(v.clamp(0.9), 1.0);
        assert_eq!(v.clamp(-5.0), 0.0);
        assert!(v.contains(0.75));
        assert!(!v.contains(0.6));
    }

    #[test]
    fn test_discrete_max_off_grid() {
        // Grid is 0, 3, 6, 9; 10 is not reachable.
        let v = Variable::discrete("lane", 0.0, 10.0, 3.0);
        assert_eq!(v.clamp(10.0), 9.0);
        assert!(!v.contains(10.0));
    }

    #[test]
    fn test_integer_clamp_rounds() {
        let v = Variable::integer("doors", 1, 8);
        assert_eq!(v.clamp(3.6), 4.0);
        assert_eq!(v.clamp(0.2), 1.0);
        assert_eq!(v.clamp(100.0), 8.0);
    }

    #[test]
    fn test_binary_flip() {
        let v = Variable::binary("open");
        let mut rng = create_rng(1);
        assert_eq!(v.perturb(0.0, &mut rng), 1.0);
        assert_eq!(v.perturb(1.0, &mut rng), 0.0);
    }

    #[test]
    fn test_integer_perturb_steps_by_one() {
        let v = Variable::integer("n", 0, 100);
        let mut rng = create_rng(3);
        for _ in 0..100 {
            let moved = v.perturb(50.0, &mut rng);
            assert!(moved == 49.0 || moved == 51.0, "got {moved}");
        }
    }

    #[test]
    fn test_continuous_perturb_within_ten_percent() {
        let v = Variable::continuous("x", 0.0, 10.0);
        let mut rng = create_rng(5);
        for _ in 0..200 {
            let moved = v.perturb(5.0, &mut rng);
            assert!((moved - 5.0).abs() <= 1.0 + 1e-12, "got {moved}");
        }
    }

    #[test]
    fn test_random_values_in_domain() {
        let vars = [
            Variable::continuous("c", -2.0, 3.0),
            Variable::discrete("d", 1.0, 2.0, 0.1),
            Variable::integer("i", -5, 5),
            Variable::binary("b"),
        ];
        let mut rng = create_rng(9);
        for v in &vars {
            for _ in 0..200 {
                let x = v.random_value(&mut rng);
                assert!(v.contains(x), "{} produced {x}", v.id);
            }
        }
    }

    #[test]
    fn test_degenerate_domain() {
        let v = Variable::continuous("fixed", 4.0, 4.0);
        let mut rng = create_rng(2);
        assert_eq!(v.random_value(&mut rng), 4.0);
        assert_eq!(v.perturb(4.0, &mut rng), 4.0);
    }

    #[test]
    fn test_constructor_value_in_domain() {
        let v = Variable::integer("i", 2, 9);
        assert_eq!(v.value, 2.0);
        assert!(v.contains(v.value));
    }
}
