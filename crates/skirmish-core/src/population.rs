//! Population registry: the authoritative set of live agents.
//!
//! Agents are stored in a `BTreeMap` keyed by [`AgentId`], so every traversal
//! runs in id order regardless of insertion history. Randomized activation
//! order is layered on top by the step loop, which shuffles a snapshot of
//! [`Population::live_ids`] taken at the start of each phase.
//!
//! # Removal during traversal
//!
//! The step loop never iterates the registry while agents act. It walks its
//! own id snapshot and checks [`Population::contains`] before each
//! activation, so [`Population::remove`] is always safe to call mid-phase.

use std::collections::BTreeMap;

use skirmish_grid::Cell;

use crate::agent::{Agent, AgentId, UnitKind};

/// Registry of live agents.
#[derive(Debug, Clone, Default)]
pub struct Population {
    /// Next id to hand out.
    next_id: u64,
    /// Live agents in id order.
    agents: BTreeMap<AgentId, Agent>,
}

impl Population {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next call to [`enlist`](Self::enlist) will assign.
    #[must_use]
    pub fn peek_id(&self) -> AgentId {
        AgentId::new(self.next_id)
    }

    /// Registers a new live agent and returns its id.
    pub fn enlist(&mut self, kind: UnitKind, position: Cell, health: f64, base_power: f64) -> AgentId {
        let id = AgentId::new(self.next_id);
        self.next_id += 1;
        self.agents
            .insert(id, Agent::new(id, kind, position, health, base_power));
        id
    }

    /// Deregisters an agent, returning it. Unknown ids are ignored.
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.remove(&id)
    }

    /// True if the agent is registered (and therefore alive).
    #[must_use]
    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    /// Looks up a live agent.
    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    /// All live agents, in id order.
    pub fn live_agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.values()
    }

    /// Snapshot of live ids, in id order.
    #[must_use]
    pub fn live_ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    /// Live agents of one kind, in id order.
    pub fn of_kind(&self, kind: UnitKind) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.values().filter(move |a| a.kind() == kind)
    }

    /// Number of live agents of one kind.
    #[must_use]
    pub fn count(&self, kind: UnitKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Number of live agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// True if nobody is left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
