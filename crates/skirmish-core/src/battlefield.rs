//! Battlefield: the grid and the population registry, kept in lockstep.
//!
//! Every mutation that touches both structures goes through here, so an agent
//! is either on the grid *and* in the registry, or in neither:
//!
//! - [`Battlefield::deploy`] places and registers a new agent
//! - [`Battlefield::relocate`] moves an agent and updates its back-reference
//! - [`Battlefield::strike`] applies damage and, on death, removes the agent
//!   from both structures before returning
//!
//! # Example
//!
//! ```
//! use glam::IVec2;
//! use skirmish_core::battlefield::{Battlefield, Strike};
//! use skirmish_core::agent::UnitKind;
//! use skirmish_grid::EdgePolicy;
//!
//! let mut field = Battlefield::new(5, 1, EdgePolicy::Bounded).unwrap();
//! let axeman = field.deploy(UnitKind::Melee, IVec2::new(0, 0), 200.0, 100.0).unwrap();
//! let archer = field.deploy(UnitKind::Ranged, IVec2::new(1, 0), 80.0, 25.0).unwrap();
//!
//! assert_eq!(field.strike(axeman, archer, 100.0), Strike::Eliminated);
//! assert!(!field.is_live(archer));
//! assert!(field.grid().occupants(IVec2::new(1, 0)).is_empty());
//! ```

use skirmish_grid::{Cell, EdgePolicy, GridError, MultiGrid};
use tracing::{debug, trace};

use crate::agent::{Agent, AgentId, UnitKind};
use crate::events::CombatEvent;
use crate::population::Population;

/// Outcome of a single attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strike {
    /// Target survived with this much health.
    Wounded(f64),
    /// Target died and has been removed.
    Eliminated,
    /// Target was not live; nothing happened.
    Missed,
}

/// Grid plus population registry.
#[derive(Debug, Clone)]
pub struct Battlefield {
    grid: MultiGrid<AgentId>,
    population: Population,
    /// Events recorded since the last drain.
    events: Vec<CombatEvent>,
}

impl Battlefield {
    /// Creates an empty battlefield.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] for a zero or oversized side.
    pub fn new(width: u32, height: u32, policy: EdgePolicy) -> Result<Self, GridError> {
        Ok(Self {
            grid: MultiGrid::new(width, height, policy)?,
            population: Population::new(),
            events: Vec::new(),
        })
    }

    /// Places a new agent and registers it.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `cell` is off a bounded grid. No
    /// agent is registered in that case.
    pub fn deploy(
        &mut self,
        kind: UnitKind,
        cell: Cell,
        health: f64,
        base_power: f64,
    ) -> Result<AgentId, GridError> {
        let id = self.population.peek_id();
        let cell = self.grid.place(id, cell)?;
        let enlisted = self.population.enlist(kind, cell, health, base_power);
        debug_assert_eq!(id, enlisted);
        trace!(agent = %id, %kind, x = cell.x, y = cell.y, "deployed");
        Ok(id)
    }

    /// The spatial grid.
    #[must_use]
    pub fn grid(&self) -> &MultiGrid<AgentId> {
        &self.grid
    }

    /// The live-agent registry.
    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Looks up a live agent.
    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.population.get(id)
    }

    /// True if the agent is alive, registered and on the grid.
    #[must_use]
    pub fn is_live(&self, id: AgentId) -> bool {
        self.population.contains(id)
    }

    /// Live opponents of `kind` standing within Chebyshev `radius` of `cell`,
    /// excluding `cell` itself, in grid scan order.
    #[must_use]
    pub fn opponents_near(&self, kind: UnitKind, cell: Cell, radius: u32) -> Vec<&Agent> {
        let enemy = kind.opponent();
        self.grid
            .neighbors(cell, radius, false)
            .into_iter()
            .filter_map(|id| self.population.get(id))
            .filter(|agent| agent.kind() == enemy)
            .collect()
    }

    /// Moves a live agent.
    ///
    /// # Errors
    ///
    /// - [`GridError::OutOfBounds`] if `cell` is off a bounded grid
    /// - [`GridError::NotPlaced`] if the agent is not live
    pub fn relocate(&mut self, id: AgentId, cell: Cell) -> Result<Cell, GridError> {
        let Some(agent) = self.population.get_mut(id) else {
            return Err(GridError::NotPlaced(format!("{id:?}")));
        };
        let from = agent.position();
        let to = self.grid.move_to(id, cell)?;
        agent.set_position(to);
        if to != from {
            trace!(agent = %id, ?from, ?to, "moved");
            self.events.push(CombatEvent::Moved { agent: id, from, to });
        }
        Ok(to)
    }

    /// Applies `damage` from `attacker` to `target`.
    ///
    /// When the hit takes the target to zero health or below it is removed
    /// from the grid and the registry before this returns.
    pub fn strike(&mut self, attacker: AgentId, target: AgentId, damage: f64) -> Strike {
        let Some(victim) = self.population.get_mut(target) else {
            return Strike::Missed;
        };
        let died = victim.take_damage(damage);
        let remaining = victim.health();
        let kind = victim.kind();
        let at = victim.position();

        debug!(
            attacker = %attacker,
            target = %target,
            damage,
            remaining,
            "{} hit",
            kind.unit_name()
        );
        self.events.push(CombatEvent::Attacked {
            attacker,
            target,
            damage,
            remaining,
        });

        if died {
            self.eliminate(target);
            debug!(agent = %target, by = %attacker, "{} eliminated", kind.unit_name());
            self.events.push(CombatEvent::Eliminated {
                agent: target,
                kind,
                by: attacker,
                at,
            });
            Strike::Eliminated
        } else {
            Strike::Wounded(remaining)
        }
    }

    /// Records an attack phase where `agent` had no target.
    pub fn record_idle(&mut self, agent: AgentId) {
        self.events.push(CombatEvent::NoTarget { agent });
    }

    /// Takes an agent off the grid and out of the registry. Idempotent.
    pub fn eliminate(&mut self, id: AgentId) -> Option<Agent> {
        self.grid.remove(id);
        self.population.remove(id)
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Drains recorded events.
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    fn strip() -> Battlefield {
        Battlefield::new(10, 1, EdgePolicy::Bounded).unwrap()
    }

    #[test]
    fn deploy_registers_and_places() {
        let mut field = strip();
        let id = field.deploy(UnitKind::Ranged, IVec2::new(3, 0), 100.0, 50.0).unwrap();
        assert!(field.is_live(id));
        assert_eq!(field.grid().location(id), Some(IVec2::new(3, 0)));
        assert_eq!(field.agent(id).unwrap().position(), IVec2::new(3, 0));
    }

    #[test]
    fn failed_deploy_registers_nothing() {
        let mut field = strip();
        assert!(field.deploy(UnitKind::Ranged, IVec2::new(10, 0), 100.0, 50.0).is_err());
        assert!(field.population().is_empty());
        assert!(field.grid().is_empty());
    }

    #[test]
    fn relocate_keeps_back_reference_in_sync() {
        let mut field = strip();
        let id = field.deploy(UnitKind::Melee, IVec2::new(3, 0), 200.0, 100.0).unwrap();
        field.relocate(id, IVec2::new(4, 0)).unwrap();
        assert_eq!(field.grid().location(id), Some(IVec2::new(4, 0)));
        assert_eq!(field.agent(id).unwrap().position(), IVec2::new(4, 0));
        assert_eq!(
            field.events(),
            &[CombatEvent::Moved {
                agent: id,
                from: IVec2::new(3, 0),
                to: IVec2::new(4, 0)
            }]
        );
    }

    #[test]
    fn relocate_off_grid_is_rejected() {
        let mut field = strip();
        let id = field.deploy(UnitKind::Melee, IVec2::new(9, 0), 200.0, 100.0).unwrap();
        assert!(matches!(
            field.relocate(id, IVec2::new(10, 0)),
            Err(GridError::OutOfBounds { .. })
        ));
        assert_eq!(field.agent(id).unwrap().position(), IVec2::new(9, 0));
    }

    #[test]
    fn strike_wounds() {
        let mut field = strip();
        let a = field.deploy(UnitKind::Ranged, IVec2::new(0, 0), 100.0, 50.0).unwrap();
        let b = field.deploy(UnitKind::Melee, IVec2::new(5, 0), 200.0, 100.0).unwrap();
        assert_eq!(field.strike(a, b, 10.0), Strike::Wounded(190.0));
        assert!(field.is_live(b));
    }

    #[test]
    fn lethal_strike_removes_from_grid_and_registry() {
        let mut field = strip();
        let a = field.deploy(UnitKind::Melee, IVec2::new(0, 0), 200.0, 100.0).unwrap();
        let b = field.deploy(UnitKind::Ranged, IVec2::new(1, 0), 80.0, 50.0).unwrap();

        assert_eq!(field.strike(a, b, 100.0), Strike::Eliminated);
        assert!(!field.is_live(b));
        assert_eq!(field.grid().location(b), None);
        assert!(field.grid().occupants(IVec2::new(1, 0)).is_empty());
        assert!(field.events().last().unwrap().is_elimination());

        // Striking the dead is a miss, not a second death
        assert_eq!(field.strike(a, b, 100.0), Strike::Missed);
    }

    #[test]
    fn opponents_near_filters_allies_and_center() {
        let mut field = strip();
        let me = field.deploy(UnitKind::Melee, IVec2::new(4, 0), 200.0, 100.0).unwrap();
        let _ally = field.deploy(UnitKind::Melee, IVec2::new(5, 0), 200.0, 100.0).unwrap();
        let _same_cell = field.deploy(UnitKind::Ranged, IVec2::new(4, 0), 100.0, 50.0).unwrap();
        let near = field.deploy(UnitKind::Ranged, IVec2::new(6, 0), 100.0, 50.0).unwrap();
        let _far = field.deploy(UnitKind::Ranged, IVec2::new(7, 0), 100.0, 50.0).unwrap();

        let kind = field.agent(me).unwrap().kind();
        let found: Vec<_> = field
            .opponents_near(kind, IVec2::new(4, 0), 2)
            .iter()
            .map(|a| a.id())
            .collect();
        assert_eq!(found, vec![near]);
    }
}
