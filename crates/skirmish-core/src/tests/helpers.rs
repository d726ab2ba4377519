//! Test helpers for building simulations and hand-placed battlefields.

use glam::IVec2;
use skirmish_grid::EdgePolicy;

use crate::agent::{AgentId, UnitKind};
use crate::config::{BattleConfig, ForceSpec};
use crate::simulation::Simulation;
use crate::snapshot::Census;

// =============================================================================
// Scenario Setup
// =============================================================================

/// An empty bounded battlefield, ready for hand placement.
pub fn empty_sim(width: u32, height: u32) -> Simulation {
    Simulation::new(BattleConfig::new(width, height)).unwrap()
}

/// A randomly deployed battle on a square grid.
pub fn square_battle(size: u32, archers: usize, axemen: usize, seed: u64) -> Simulation {
    let config = BattleConfig::new(size, size)
        .with_seed(seed)
        .with_force(ForceSpec::archers(archers))
        .with_force(ForceSpec::axemen(axemen));
    Simulation::new(config).unwrap()
}

/// The same battle on a torus.
pub fn torus_battle(size: u32, archers: usize, axemen: usize, seed: u64) -> Simulation {
    let config = BattleConfig::new(size, size)
        .with_edge(EdgePolicy::Torus)
        .with_seed(seed)
        .with_force(ForceSpec::archers(archers))
        .with_force(ForceSpec::axemen(axemen));
    Simulation::new(config).unwrap()
}

/// Places an archer with default health.
pub fn place_archer(sim: &mut Simulation, x: i32, y: i32, power: f64) -> AgentId {
    sim.battlefield_mut()
        .deploy(UnitKind::Ranged, IVec2::new(x, y), 100.0, power)
        .unwrap()
}

/// Places an archer with chosen health.
pub fn place_archer_with_hp(sim: &mut Simulation, x: i32, y: i32, health: f64) -> AgentId {
    sim.battlefield_mut()
        .deploy(UnitKind::Ranged, IVec2::new(x, y), health, 25.0)
        .unwrap()
}

/// Places an axeman with chosen stats.
pub fn place_axeman(sim: &mut Simulation, x: i32, y: i32, health: f64, power: f64) -> AgentId {
    sim.battlefield_mut()
        .deploy(UnitKind::Melee, IVec2::new(x, y), health, power)
        .unwrap()
}

// =============================================================================
// State Inspection
// =============================================================================

/// Current health, or `None` once eliminated.
pub fn hp(sim: &Simulation, id: AgentId) -> Option<f64> {
    sim.agent(id).map(crate::agent::Agent::health)
}

/// Current cell, or `None` once eliminated.
pub fn position(sim: &Simulation, id: AgentId) -> Option<IVec2> {
    sim.agent(id).map(crate::agent::Agent::position)
}

/// Checks that grid and registry agree on every live agent.
pub fn assert_consistent(sim: &Simulation) {
    let grid = sim.battlefield().grid();
    let population = sim.battlefield().population();
    assert_eq!(grid.len(), population.len(), "grid and registry sizes differ");

    for agent in sim.live_agents() {
        assert!(agent.is_alive(), "{:?} is registered but dead", agent.id());
        assert!(agent.health() > 0.0, "{:?} has no health", agent.id());
        assert!(grid.contains(agent.position()), "{:?} is off the grid", agent.id());
        assert_eq!(
            grid.location(agent.id()),
            Some(agent.position()),
            "back-reference out of sync for {:?}",
            agent.id()
        );
        assert!(grid.occupants(agent.position()).contains(&agent.id()));
    }
}

/// Checks that no count ever grows from one tick to the next.
pub fn assert_counts_never_grow(sim: &Simulation, start: Census) {
    for kind in UnitKind::ALL {
        let mut previous = start.get(kind);
        for &count in sim.history().series(kind) {
            assert!(count <= previous, "{kind} count grew from {previous} to {count}");
            previous = count;
        }
    }
}
