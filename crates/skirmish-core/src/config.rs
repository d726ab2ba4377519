//! Battle configuration.
//!
//! A [`BattleConfig`] fixes everything a run depends on: battlefield size,
//! edge policy, seed and the forces to deploy. Two simulations built from
//! equal configs and stepped the same number of times end in the same state.

use serde::{Deserialize, Serialize};
use skirmish_grid::{EdgePolicy, Extent};

use crate::agent::UnitKind;
use crate::error::ConfigError;

/// One force to deploy: `count` units of `kind` with shared starting stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceSpec {
    /// Unit kind
    pub kind: UnitKind,
    /// Number of units
    pub count: usize,
    /// Starting health of each unit
    pub health: f64,
    /// Base attack power of each unit
    pub base_power: f64,
}

impl ForceSpec {
    /// A force with the kind's default stats.
    #[must_use]
    pub fn new(kind: UnitKind, count: usize) -> Self {
        Self {
            kind,
            count,
            health: kind.default_health(),
            base_power: kind.default_power(),
        }
    }

    /// Archers with default stats.
    #[must_use]
    pub fn archers(count: usize) -> Self {
        Self::new(UnitKind::Ranged, count)
    }

    /// Axemen with default stats.
    #[must_use]
    pub fn axemen(count: usize) -> Self {
        Self::new(UnitKind::Melee, count)
    }

    /// Override starting health.
    #[must_use]
    pub fn with_health(mut self, health: f64) -> Self {
        self.health = health;
        self
    }

    /// Override base attack power.
    #[must_use]
    pub fn with_power(mut self, base_power: f64) -> Self {
        self.base_power = base_power;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.health.is_finite() || self.health <= 0.0 {
            return Err(ConfigError::InvalidHealth {
                kind: self.kind,
                health: self.health,
            });
        }
        if !self.base_power.is_finite() || self.base_power < 0.0 {
            return Err(ConfigError::InvalidPower {
                kind: self.kind,
                power: self.base_power,
            });
        }
        Ok(())
    }
}

/// Everything needed to build a [`Simulation`](crate::Simulation).
///
/// Forces are deployed in list order, each unit on a uniformly random cell.
///
/// # Example
///
/// ```
/// use skirmish_core::{BattleConfig, ForceSpec};
/// use skirmish_grid::EdgePolicy;
///
/// let config = BattleConfig::new(20, 20)
///     .with_edge(EdgePolicy::Torus)
///     .with_seed(7)
///     .with_force(ForceSpec::archers(10))
///     .with_force(ForceSpec::axemen(10).with_health(150.0));
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.total_units(), 20);
/// ```
///
/// In JSON only `width` and `height` are required. A missing `edge` is
/// bounded, a missing `seed` is 0 and missing `forces` deploy nobody.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Grid width
    pub width: u32,
    /// Grid height
    pub height: u32,
    /// Edge policy
    #[serde(default)]
    pub edge: EdgePolicy,
    /// Seed for placement and every random choice during the run
    #[serde(default)]
    pub seed: u64,
    /// Forces, deployed in order
    #[serde(default)]
    pub forces: Vec<ForceSpec>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::skirmish()
    }
}

impl BattleConfig {
    /// An empty bounded battlefield with seed 0.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            edge: EdgePolicy::Bounded,
            seed: 0,
            forces: Vec::new(),
        }
    }

    /// The reference skirmish: a 100×1 strip, 15 archers (100 hp, 50 power)
    /// against 15 axemen (200 hp, 100 power), seed 100.
    #[must_use]
    pub fn skirmish() -> Self {
        Self::new(100, 1)
            .with_seed(100)
            .with_force(ForceSpec::archers(15).with_power(50.0))
            .with_force(ForceSpec::axemen(15))
    }

    /// Set the edge policy.
    #[must_use]
    pub fn with_edge(mut self, edge: EdgePolicy) -> Self {
        self.edge = edge;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Add a force.
    #[must_use]
    pub fn with_force(mut self, force: ForceSpec) -> Self {
        self.forces.push(force);
        self
    }

    /// Units across all forces.
    #[must_use]
    pub fn total_units(&self) -> usize {
        self.forces.iter().map(|f| f.count).sum()
    }

    /// Check dimensions and every force.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidDimensions`] for a zero or oversized side
    /// - [`ConfigError::InvalidHealth`] for non-positive or non-finite health
    /// - [`ConfigError::InvalidPower`] for negative or non-finite power
    pub fn validate(&self) -> Result<(), ConfigError> {
        Extent::new(self.width, self.height).map_err(|_| ConfigError::InvalidDimensions {
            width: self.width,
            height: self.height,
        })?;
        self.forces.iter().try_for_each(ForceSpec::validate)
    }
}
