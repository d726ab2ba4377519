//! Integration tests for the full step loop.
//!
//! These tests drive whole ticks through [`Simulation::step`] and check:
//! - Damage and elimination as seen from outside the battlefield
//! - Movement rules for both kinds
//! - Grid/registry consistency over long runs
//! - Reports (census, heatmap, events)

use proptest::prelude::*;

use crate::agent::UnitKind;
use crate::config::BattleConfig;
use crate::events::CombatEvent;
use crate::simulation::Simulation;
use crate::snapshot::Census;

use super::helpers::{
    assert_consistent, assert_counts_never_grow, empty_sim, hp, place_archer,
    place_archer_with_hp, place_axeman, position, square_battle, torus_battle,
};

// =============================================================================
// Combat
// =============================================================================

#[test]
fn archer_damage_falls_off_with_distance() {
    let mut sim = empty_sim(10, 1);
    place_archer(&mut sim, 0, 0, 50.0);
    let axeman = place_axeman(&mut sim, 5, 0, 200.0, 0.0);

    sim.step().unwrap();

    assert_eq!(hp(&sim, axeman), Some(190.0));
    assert_eq!(position(&sim, axeman), Some(glam::IVec2::new(5, 0)));
}

#[test]
fn archer_sharing_a_cell_deals_fallback_damage() {
    let mut sim = empty_sim(10, 1);
    place_archer(&mut sim, 3, 0, 50.0);
    let axeman = place_axeman(&mut sim, 3, 0, 200.0, 0.0);

    sim.step().unwrap();

    assert_eq!(hp(&sim, axeman), Some(195.0));
}

#[test]
fn archer_reaches_across_the_whole_field() {
    let mut sim = empty_sim(50, 1);
    place_archer(&mut sim, 0, 0, 25.0);
    let axeman = place_axeman(&mut sim, 49, 0, 200.0, 0.0);

    sim.step().unwrap();

    assert_eq!(hp(&sim, axeman), Some(200.0 - 25.0 / 49.0));
}

#[test]
fn axeman_kills_weak_archer_in_one_tick() {
    let mut sim = empty_sim(5, 5);
    let axeman = place_axeman(&mut sim, 2, 2, 200.0, 100.0);
    let archer = place_archer_with_hp(&mut sim, 4, 4, 80.0);

    sim.step().unwrap();

    assert_eq!(hp(&sim, archer), None);
    assert!(sim.battlefield().grid().location(archer).is_none());
    assert!(!sim.live_agents().any(|a| a.id() == archer));
    assert!(hp(&sim, axeman).is_some());
    assert_eq!(sim.count_by_type(), Census { ranged: 0, melee: 1 });
    assert!(sim
        .events()
        .iter()
        .any(|e| matches!(e, CombatEvent::Eliminated { agent, by, .. } if *agent == archer && *by == axeman)));
}

#[test]
fn axeman_strikes_two_cells_away_without_moving() {
    let mut sim = empty_sim(10, 1);
    let axeman = place_axeman(&mut sim, 0, 0, 200.0, 100.0);
    let archer = place_archer_with_hp(&mut sim, 2, 0, 80.0);

    sim.step().unwrap();

    assert_eq!(position(&sim, axeman), Some(glam::IVec2::new(0, 0)));
    assert_eq!(hp(&sim, archer), None);
}

#[test]
fn eliminated_archer_is_gone_for_good() {
    let mut sim = empty_sim(5, 1);
    place_axeman(&mut sim, 0, 0, 200.0, 100.0);
    place_archer_with_hp(&mut sim, 2, 0, 50.0);

    sim.run(5).unwrap();

    assert_eq!(sim.history().series(UnitKind::Ranged), &[0, 0, 0, 0, 0]);
    assert_eq!(sim.history().series(UnitKind::Melee), &[1, 1, 1, 1, 1]);
    assert!(sim.is_decided());
    assert_consistent(&sim);
}

#[test]
fn eliminated_agents_never_act_again_in_the_tick() {
    for seed in 0..200 {
        let mut sim = square_battle(4, 10, 10, seed);

        for _ in 0..30 {
            sim.step().unwrap();

            let mut fallen = std::collections::BTreeSet::new();
            for event in sim.events() {
                assert!(
                    !fallen.contains(&event.actor()),
                    "seed {seed} tick {}: {:?} acted after elimination",
                    sim.tick(),
                    event.actor()
                );
                if let CombatEvent::Attacked { target, .. } = event {
                    assert!(!fallen.contains(target), "seed {seed}: dead {target:?} was hit");
                }
                if let CombatEvent::Eliminated { agent, .. } = event {
                    fallen.insert(*agent);
                }
            }
        }
    }
}

// =============================================================================
// Movement
// =============================================================================

#[test]
fn axeman_without_adjacent_archer_stays_put() {
    let mut sim = empty_sim(10, 1);
    let axeman = place_axeman(&mut sim, 0, 0, 200.0, 100.0);
    place_archer(&mut sim, 3, 0, 25.0);

    sim.run(3).unwrap();

    assert_eq!(position(&sim, axeman), Some(glam::IVec2::new(0, 0)));
    assert!(!sim.events().iter().any(|e| matches!(e, CombatEvent::Moved { .. })));
}

#[test]
fn axeman_steps_toward_diagonal_archer_along_x() {
    let mut sim = empty_sim(5, 5);
    let axeman = place_axeman(&mut sim, 1, 1, 200.0, 10.0);
    let archer = place_archer(&mut sim, 2, 2, 25.0);

    sim.step().unwrap();

    assert_eq!(position(&sim, axeman), Some(glam::IVec2::new(2, 1)));
    assert_eq!(hp(&sim, archer), Some(90.0));
}

#[test]
fn axeman_stepping_onto_archer_cannot_strike_it() {
    let mut sim = empty_sim(5, 5);
    let axeman = place_axeman(&mut sim, 2, 2, 200.0, 100.0);
    let archer = place_archer(&mut sim, 3, 2, 25.0);

    sim.step().unwrap();

    // Both now share (3, 2); the strike neighborhood excludes the own cell
    assert_eq!(position(&sim, axeman), Some(glam::IVec2::new(3, 2)));
    assert_eq!(hp(&sim, archer), Some(100.0));
    assert_eq!(hp(&sim, axeman), Some(195.0));

    sim.step().unwrap();
    assert_eq!(position(&sim, axeman), Some(glam::IVec2::new(3, 2)));
}

#[test]
fn archers_never_move() {
    let mut sim = square_battle(8, 10, 10, 3);
    let before: Vec<_> = sim
        .live_agents()
        .filter(|a| a.kind() == UnitKind::Ranged)
        .map(|a| (a.id(), a.position()))
        .collect();

    sim.run(20).unwrap();

    for (id, cell) in before {
        if let Some(now) = position(&sim, id) {
            assert_eq!(now, cell, "archer {id:?} moved");
        }
    }
}

// =============================================================================
// Long Runs
// =============================================================================

#[test]
fn reference_skirmish_runs_a_thousand_ticks() {
    let mut sim = Simulation::new(BattleConfig::skirmish()).unwrap();
    let start = sim.count_by_type();
    assert_eq!(start, Census { ranged: 15, melee: 15 });

    for _ in 0..1000 {
        sim.step().unwrap();
        assert_consistent(&sim);
    }

    assert_eq!(sim.history().len(), 1000);
    assert_counts_never_grow(&sim, start);
}

#[test]
fn torus_battle_keeps_invariants() {
    let mut sim = torus_battle(6, 12, 12, 11);
    let start = sim.count_by_type();

    for _ in 0..300 {
        sim.step().unwrap();
        assert_consistent(&sim);
    }

    assert_counts_never_grow(&sim, start);
}

#[test]
fn battle_without_survivors_keeps_stepping() {
    let mut sim = empty_sim(3, 3);
    sim.run(10).unwrap();
    assert_eq!(sim.history().latest(), Some(Census::default()));
    assert_eq!(sim.health_heatmap().occupied(), 0);
}

// =============================================================================
// Reports
// =============================================================================

#[test]
fn heatmap_is_idempotent_and_matches_agents() {
    let mut sim = square_battle(10, 15, 15, 8);
    sim.run(10).unwrap();

    let first = sim.health_heatmap();
    let second = sim.health_heatmap();
    assert_eq!(first, second);

    let occupied: std::collections::BTreeSet<_> =
        sim.live_agents().map(|a| (a.position().x, a.position().y)).collect();
    assert_eq!(first.occupied(), occupied.len());

    for &(x, y) in &occupied {
        let (x, y) = (usize::try_from(x).unwrap(), usize::try_from(y).unwrap());
        assert!(first.get(x, y).is_some_and(|h| h > 0.0));
    }
}

#[test]
fn snapshot_agrees_with_census() {
    let mut sim = square_battle(10, 6, 6, 21);
    sim.run(15).unwrap();

    let snapshot = sim.snapshot();
    assert_eq!(snapshot.tick, 15);
    assert_eq!(snapshot.census, sim.count_by_type());
    assert_eq!(snapshot.agents.len(), snapshot.census.total());
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every live agent stays on the grid, alive and in sync, whatever the seed.
    #[test]
    fn live_agents_stay_valid(
        seed in any::<u64>(),
        width in 1u32..12,
        height in 1u32..12,
        archers in 0usize..12,
        axemen in 0usize..12,
        torus in any::<bool>(),
    ) {
        let mut config = BattleConfig::new(width, height)
            .with_seed(seed)
            .with_force(crate::config::ForceSpec::archers(archers))
            .with_force(crate::config::ForceSpec::axemen(axemen));
        if torus {
            config = config.with_edge(skirmish_grid::EdgePolicy::Torus);
        }
        let mut sim = Simulation::new(config).unwrap();
        let start = sim.count_by_type();

        for _ in 0..40 {
            sim.step().unwrap();
            for agent in sim.live_agents() {
                prop_assert!(agent.health() > 0.0);
                prop_assert!(sim.battlefield().grid().contains(agent.position()));
            }
        }
        assert_consistent(&sim);
        assert_counts_never_grow(&sim, start);
    }
}
