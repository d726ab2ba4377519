//! Unit behavior behind a capability trait.
//!
//! Each [`UnitKind`] maps to one stateless [`Tactic`]. The step loop calls
//! [`Tactic::advance`] on every live agent in the move phase and
//! [`Tactic::engage`] in the attack phase; the tactic reads and mutates the
//! [`Battlefield`] and draws every random choice from the shared simulation
//! RNG.
//!
//! | Kind   | advance                                   | engage                                   |
//! |--------|-------------------------------------------|------------------------------------------|
//! | Ranged | stays put                                 | random opponent anywhere, damage falls off with distance |
//! | Melee  | one orthogonal step toward an adjacent opponent | random opponent within 2 cells, flat damage |

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use skirmish_grid::neighborhood::orthogonal_step;
use skirmish_grid::{Cell, GridError};
use tracing::debug;

use crate::agent::{AgentId, UnitKind};
use crate::battlefield::Battlefield;

/// Damage a ranged attack deals to a target sharing the attacker's cell.
pub const FALLBACK_DAMAGE: f64 = 5.0;

/// Chebyshev radius a melee unit scans when choosing where to step.
pub const MELEE_SIGHT: u32 = 1;

/// Chebyshev radius within which a melee unit can strike.
pub const MELEE_REACH: u32 = 2;

/// Ranged damage at a given Manhattan distance.
///
/// Power is divided by distance; point-blank shots deal [`FALLBACK_DAMAGE`].
///
/// ```
/// use skirmish_core::agent::ranged_damage;
///
/// assert_eq!(ranged_damage(50.0, 5), 10.0);
/// assert_eq!(ranged_damage(50.0, 0), 5.0);
/// ```
#[must_use]
pub fn ranged_damage(base_power: f64, distance: i32) -> f64 {
    if distance == 0 {
        FALLBACK_DAMAGE
    } else {
        base_power / f64::from(distance.abs())
    }
}

/// Move and attack behavior for one unit kind.
///
/// Implementations are stateless; all per-agent state lives in the
/// [`Agent`](crate::agent::Agent) record.
///
/// Both methods may assume `actor` is live: the step loop never activates an
/// eliminated agent. They still check and return early if it is not, and
/// trip a debug assertion so the bug surfaces in tests.
pub trait Tactic: Send + Sync {
    /// Kind this tactic drives.
    fn kind(&self) -> UnitKind;

    /// Move-phase action.
    ///
    /// # Errors
    ///
    /// Propagates a rejected grid update. The movement rules never leave the
    /// grid, so an error here is a bug.
    fn advance(
        &self,
        field: &mut Battlefield,
        rng: &mut ChaCha8Rng,
        actor: AgentId,
    ) -> Result<(), GridError>;

    /// Attack-phase action. Finding no target is not an error.
    ///
    /// # Errors
    ///
    /// Propagates a rejected grid update.
    fn engage(
        &self,
        field: &mut Battlefield,
        rng: &mut ChaCha8Rng,
        actor: AgentId,
    ) -> Result<(), GridError>;
}

/// Guard shared by both tactics: the actor must be live with positive health.
fn ready(field: &Battlefield, actor: AgentId) -> bool {
    let ready = field
        .agent(actor)
        .is_some_and(|agent| agent.is_alive() && agent.health() > 0.0);
    debug_assert!(ready, "dead agent {actor} activated");
    ready
}

/// Archer behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangedTactic;

impl Tactic for RangedTactic {
    fn kind(&self) -> UnitKind {
        UnitKind::Ranged
    }

    /// Archers hold their position.
    fn advance(
        &self,
        field: &mut Battlefield,
        _rng: &mut ChaCha8Rng,
        actor: AgentId,
    ) -> Result<(), GridError> {
        ready(field, actor);
        Ok(())
    }

    /// Shoots a uniformly random live opponent anywhere on the field.
    fn engage(
        &self,
        field: &mut Battlefield,
        rng: &mut ChaCha8Rng,
        actor: AgentId,
    ) -> Result<(), GridError> {
        if !ready(field, actor) {
            return Ok(());
        }
        let Some(me) = field.agent(actor) else {
            return Ok(());
        };
        let (origin, power) = (me.position(), me.base_power());

        let pool: Vec<(AgentId, _)> = field
            .population()
            .of_kind(self.kind().opponent())
            .map(|agent| (agent.id(), agent.position()))
            .collect();
        let Some(&(target, at)) = pool.choose(rng) else {
            debug!(agent = %actor, "no {}s left", self.kind().opponent().unit_name());
            field.record_idle(actor);
            return Ok(());
        };

        let distance = field.grid().manhattan(origin, at);
        field.strike(actor, target, ranged_damage(power, distance));
        Ok(())
    }
}

/// Axeman behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeleeTactic;

impl Tactic for MeleeTactic {
    fn kind(&self) -> UnitKind {
        UnitKind::Melee
    }

    /// Steps one cell toward the nearest adjacent opponent.
    ///
    /// Only the surrounding eight cells are searched. Candidates are compared
    /// by Manhattan distance and the first nearest in scan order wins. The
    /// step goes along the axis with the larger offset, x on a tie.
    fn advance(
        &self,
        field: &mut Battlefield,
        _rng: &mut ChaCha8Rng,
        actor: AgentId,
    ) -> Result<(), GridError> {
        if !ready(field, actor) {
            return Ok(());
        }
        let Some(me) = field.agent(actor) else {
            return Ok(());
        };
        let origin = me.position();

        let grid = field.grid();
        let nearest = field
            .opponents_near(self.kind(), origin, MELEE_SIGHT)
            .into_iter()
            .map(|agent| agent.position())
            .fold(None, |best: Option<(i32, Cell)>, at| {
                let d = grid.manhattan(origin, at);
                match best {
                    Some((best_d, _)) if best_d <= d => best,
                    _ => Some((d, at)),
                }
            });

        let Some((_, at)) = nearest else {
            return Ok(());
        };
        let step = orthogonal_step(grid.delta(origin, at));
        field.relocate(actor, origin + step)?;
        Ok(())
    }

    /// Strikes a uniformly random opponent within [`MELEE_REACH`].
    fn engage(
        &self,
        field: &mut Battlefield,
        rng: &mut ChaCha8Rng,
        actor: AgentId,
    ) -> Result<(), GridError> {
        if !ready(field, actor) {
            return Ok(());
        }
        let Some(me) = field.agent(actor) else {
            return Ok(());
        };
        let (origin, power) = (me.position(), me.base_power());

        let in_reach: Vec<AgentId> = field
            .opponents_near(self.kind(), origin, MELEE_REACH)
            .iter()
            .map(|agent| agent.id())
            .collect();
        let Some(&target) = in_reach.choose(rng) else {
            field.record_idle(actor);
            return Ok(());
        };

        field.strike(actor, target, power);
        Ok(())
    }
}
