//! Combat events recorded during a tick.
//!
//! Events do not drive the simulation; they are a read-only account of what
//! happened, in activation order, for renderers and tests. The simulation
//! keeps only the most recent tick's events.

use serde::{Deserialize, Serialize};
use skirmish_grid::Cell;

use crate::agent::{AgentId, UnitKind};

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatEvent {
    /// An agent stepped to a new cell.
    Moved {
        /// Mover
        agent: AgentId,
        /// Cell before the step
        from: Cell,
        /// Cell after the step
        to: Cell,
    },
    /// An attack landed.
    Attacked {
        /// Attacker
        attacker: AgentId,
        /// Target
        target: AgentId,
        /// Health removed from the target
        damage: f64,
        /// Target health after the hit
        remaining: f64,
    },
    /// An agent died and left the grid and registry.
    Eliminated {
        /// The dead agent
        agent: AgentId,
        /// Its kind
        kind: UnitKind,
        /// Who dealt the final blow
        by: AgentId,
        /// Cell it died in
        at: Cell,
    },
    /// An attacker found nobody to attack.
    NoTarget {
        /// The idle attacker
        agent: AgentId,
    },
}

impl CombatEvent {
    /// The agent that caused the event.
    #[must_use]
    pub fn actor(&self) -> AgentId {
        match self {
            Self::Moved { agent, .. } | Self::NoTarget { agent } => *agent,
            Self::Attacked { attacker, .. } => *attacker,
            Self::Eliminated { by, .. } => *by,
        }
    }

    /// True for [`CombatEvent::Eliminated`].
    #[must_use]
    pub fn is_elimination(&self) -> bool {
        matches!(self, Self::Eliminated { .. })
    }
}
