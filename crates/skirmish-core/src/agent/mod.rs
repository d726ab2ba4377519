//! Agent module: identities, unit kinds and per-agent combat state.
//!
//! - [`AgentId`]: Unique, monotonically assigned identifier
//! - [`UnitKind`]: Type tag selecting the agent's [`Tactic`]
//! - [`Vitality`]: The two-state life cycle (`Alive` → `Dead`, terminal)
//! - [`Agent`]: Position, health and attack power of one unit
//!
//! Behavior lives in [`tactics`]: each `UnitKind` dispatches to a stateless
//! [`Tactic`] implementation for its move and attack.
//!
//! # Example
//!
//! ```
//! use glam::IVec2;
//! use skirmish_core::agent::{Agent, AgentId, UnitKind};
//!
//! let archer = Agent::new(AgentId::new(0), UnitKind::Ranged, IVec2::new(3, 0), 100.0, 50.0);
//!
//! assert!(archer.is_alive());
//! assert_eq!(archer.kind().opponent(), UnitKind::Melee);
//! ```

pub mod tactics;

use std::fmt;

use serde::{Deserialize, Serialize};
use skirmish_grid::Cell;

pub use tactics::{ranged_damage, MeleeTactic, RangedTactic, Tactic, FALLBACK_DAMAGE};

/// Unique identifier for an agent.
///
/// Ids are assigned in increasing order as agents are deployed and are never
/// reused, so ordering by id is ordering by deployment.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(u64);

impl AgentId {
    /// Creates an `AgentId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({})", self.0)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AgentId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Unit type tag.
///
/// The tag decides which [`Tactic`] runs for an agent and which agents count
/// as its opponents: every `Ranged` unit fights every `Melee` unit and vice
/// versa.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Archer: stationary, shoots any opponent on the field
    Ranged,
    /// Axeman: closes in on adjacent archers, strikes within two cells
    Melee,
}

impl UnitKind {
    /// All unit kinds, in reporting order.
    pub const ALL: [Self; 2] = [Self::Ranged, Self::Melee];

    /// The kind this unit fights.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Ranged => Self::Melee,
            Self::Melee => Self::Ranged,
        }
    }

    /// Behavior for units of this kind.
    #[must_use]
    pub fn tactic(self) -> &'static dyn Tactic {
        match self {
            Self::Ranged => &RangedTactic,
            Self::Melee => &MeleeTactic,
        }
    }

    /// Battlefield name of the unit.
    #[must_use]
    pub const fn unit_name(self) -> &'static str {
        match self {
            Self::Ranged => "Archer",
            Self::Melee => "Axeman",
        }
    }

    /// Starting health when a force does not override it.
    #[must_use]
    pub const fn default_health(self) -> f64 {
        match self {
            Self::Ranged => 100.0,
            Self::Melee => 200.0,
        }
    }

    /// Base attack power when a force does not override it.
    #[must_use]
    pub const fn default_power(self) -> f64 {
        match self {
            Self::Ranged => 25.0,
            Self::Melee => 100.0,
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ranged => write!(f, "Ranged"),
            Self::Melee => write!(f, "Melee"),
        }
    }
}

/// Life cycle of an agent. `Dead` is terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vitality {
    /// Takes part in both phases of every tick
    Alive,
    /// Eliminated; never activated again
    Dead,
}

/// One unit on the battlefield.
///
/// The position mirrors the agent's cell in the grid; it is a back-reference
/// kept in sync by [`Battlefield`](crate::battlefield::Battlefield), which is
/// the only place that moves agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    kind: UnitKind,
    position: Cell,
    health: f64,
    base_power: f64,
    vitality: Vitality,
}

impl Agent {
    /// Creates a live agent.
    #[must_use]
    pub fn new(id: AgentId, kind: UnitKind, position: Cell, health: f64, base_power: f64) -> Self {
        Self {
            id,
            kind,
            position,
            health,
            base_power,
            vitality: Vitality::Alive,
        }
    }

    /// Agent identifier.
    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Unit kind.
    #[must_use]
    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Current cell.
    #[must_use]
    pub fn position(&self) -> Cell {
        self.position
    }

    /// Remaining health. May be negative once dead.
    #[must_use]
    pub fn health(&self) -> f64 {
        self.health
    }

    /// Base attack power.
    #[must_use]
    pub fn base_power(&self) -> f64 {
        self.base_power
    }

    /// Life-cycle state.
    #[must_use]
    pub fn vitality(&self) -> Vitality {
        self.vitality
    }

    /// True while the agent can act and be targeted.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.vitality == Vitality::Alive
    }

    pub(crate) fn set_position(&mut self, position: Cell) {
        self.position = position;
    }

    /// Subtracts `amount` from health.
    ///
    /// Returns `true` exactly once: on the hit that takes health to zero or
    /// below and flips the agent to `Dead`.
    pub(crate) fn take_damage(&mut self, amount: f64) -> bool {
        debug_assert!(self.is_alive(), "agent {} damaged after death", self.id);
        self.health -= amount;
        if self.health <= 0.0 && self.is_alive() {
            self.vitality = Vitality::Dead;
            return true;
        }
        false
    }
}
