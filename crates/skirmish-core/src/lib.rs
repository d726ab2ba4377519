//! # Skirmish Core
//!
//! Deterministic Archer vs. Axeman combat on a discrete grid.
//!
//! Two unit kinds fight on a `width × height` lattice. Every tick runs a
//! movement phase and then an attack phase, each over a freshly shuffled
//! order of live agents:
//!
//! - **Archers** ([`UnitKind::Ranged`]) hold position and shoot a random
//!   living axeman anywhere on the battlefield, for damage that falls off
//!   with Manhattan distance
//! - **Axemen** ([`UnitKind::Melee`]) step one cell toward the nearest archer
//!   they can see, then strike a random archer within reach at full power
//!
//! An agent whose health drops to zero is removed from the grid and the
//! registry before the next activation.
//!
//! ## Architecture
//!
//! - [`Battlefield`]: the grid and the population registry, kept in lockstep
//! - [`Tactic`]: per-kind movement and attack behavior
//! - [`Simulation`]: the seeded RNG, the step loop and the census history
//! - [`snapshot`]: read-only reports (census, health heatmap, snapshots)
//!
//! ## Usage
//!
//! ```
//! use skirmish_core::{BattleConfig, Simulation, UnitKind};
//!
//! let mut sim = Simulation::new(BattleConfig::skirmish()).unwrap();
//! let history = sim.run(50).unwrap();
//!
//! assert_eq!(history.len(), 50);
//! let archers = history.series(UnitKind::Ranged);
//! assert!(archers.windows(2).all(|w| w[1] <= w[0]));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export the grid crate for spatial types
pub use skirmish_grid;

pub mod agent;
pub mod battlefield;
pub mod config;
pub mod error;
pub mod events;
pub mod population;
pub mod simulation;
pub mod snapshot;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use agent::{
    Agent, AgentId, MeleeTactic, RangedTactic, Tactic, UnitKind, Vitality, FALLBACK_DAMAGE,
};
pub use battlefield::{Battlefield, Strike};
pub use config::{BattleConfig, ForceSpec};
pub use error::{ConfigError, EngineError};
pub use events::CombatEvent;
pub use population::Population;
pub use simulation::{Phase, Simulation};
pub use snapshot::{Census, CountHistory, Heatmap, Snapshot};
