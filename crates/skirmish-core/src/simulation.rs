//! Simulation module with the two-phase step loop.
//!
//! The `Simulation` owns the battlefield and the single random source that
//! drives a run. Each tick executes:
//!
//! 1. **MOVE**: every live agent runs [`Tactic::advance`] in a freshly
//!    shuffled order
//! 2. **ATTACK**: every agent still live runs [`Tactic::engage`] in a second,
//!    independently shuffled order
//! 3. **RECORD**: the tick counter advances, the census is appended to the
//!    history and the tick's events are kept for inspection
//!
//! # Activation
//!
//! Activation is sequential, not simultaneous: each agent sees every change
//! made by the agents before it in the same phase. The order for a phase is a
//! snapshot of live ids taken when the phase starts; an agent eliminated
//! before its turn is skipped.
//!
//! # Determinism
//!
//! A single `ChaCha8Rng`, seeded once from [`BattleConfig::seed`], drives
//! initial placement, every shuffle and every target choice. The registry
//! iterates in id order and grid queries scan in row-major order, so equal
//! configs produce equal runs.
//!
//! # Example
//!
//! ```
//! use skirmish_core::{BattleConfig, Simulation};
//!
//! let mut sim = Simulation::new(BattleConfig::skirmish()).unwrap();
//! let before = sim.count_by_type();
//!
//! for _ in 0..10 {
//!     sim.step().unwrap();
//! }
//!
//! assert_eq!(sim.tick(), 10);
//! assert_eq!(sim.history().len(), 10);
//! assert!(sim.count_by_type().total() <= before.total());
//! ```

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use glam::IVec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skirmish_grid::hash::hash_grid_into;
use tracing::{debug, info};

use crate::agent::{Agent, AgentId, Tactic};
use crate::battlefield::Battlefield;
use crate::config::BattleConfig;
use crate::error::{ConfigError, EngineError};
use crate::events::CombatEvent;
use crate::snapshot::{Census, CountHistory, Heatmap, Snapshot};

/// One half of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Every live agent may step
    Move,
    /// Every live agent may strike
    Attack,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move => write!(f, "move"),
            Self::Attack => write!(f, "attack"),
        }
    }
}

/// The step loop and everything it owns.
///
/// `Simulation` manages:
/// - The battlefield (grid + population registry)
/// - The seeded random source shared by placement, shuffles and targeting
/// - The tick counter, census history and last tick's combat events
pub struct Simulation {
    config: BattleConfig,
    field: Battlefield,
    rng: ChaCha8Rng,
    tick: u64,
    history: CountHistory,
    /// Events from the most recent tick.
    events: Vec<CombatEvent>,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("seed", &self.config.seed)
            .field("tick", &self.tick)
            .field("census", &self.count_by_type())
            .field("events", &format!("[{} events]", self.events.len()))
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Builds the battlefield and deploys every force.
    ///
    /// Forces are deployed in config order; each unit lands on a uniformly
    /// random cell drawn from the seeded RNG.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config does not validate.
    pub fn new(config: BattleConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut field = Battlefield::new(config.width, config.height, config.edge)?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let (width, height) = (field.grid().width(), field.grid().height());

        for force in &config.forces {
            for _ in 0..force.count {
                let cell = IVec2::new(rng.gen_range(0..width), rng.gen_range(0..height));
                field.deploy(force.kind, cell, force.health, force.base_power)?;
            }
        }

        info!(
            seed = config.seed,
            width = config.width,
            height = config.height,
            edge = ?config.edge,
            agents = field.population().len(),
            "simulation initialized"
        );

        Ok(Self {
            config,
            field,
            rng,
            tick: 0,
            history: CountHistory::new(),
            events: Vec::new(),
        })
    }

    /// Advances one tick: move phase, then attack phase.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if a grid update is rejected. The movement
    /// rules keep agents on the grid, so this signals a bug.
    pub fn step(&mut self) -> Result<(), EngineError> {
        self.run_phase(Phase::Move)?;
        self.run_phase(Phase::Attack)?;

        self.tick += 1;
        let census = self.count_by_type();
        self.history.record(census);
        self.events = self.field.take_events();

        debug!(
            tick = self.tick,
            ranged = census.ranged,
            melee = census.melee,
            events = self.events.len(),
            "tick complete"
        );
        Ok(())
    }

    /// Activates every agent live at the start of `phase`, in shuffled order.
    fn run_phase(&mut self, phase: Phase) -> Result<(), EngineError> {
        let mut order = self.field.population().live_ids();
        order.shuffle(&mut self.rng);

        for id in order {
            // Eliminated earlier in this phase
            let Some(kind) = self.field.agent(id).map(Agent::kind) else {
                continue;
            };
            let tactic: &dyn Tactic = kind.tactic();
            match phase {
                Phase::Move => tactic.advance(&mut self.field, &mut self.rng, id)?,
                Phase::Attack => tactic.engage(&mut self.field, &mut self.rng, id)?,
            }
        }
        Ok(())
    }

    /// Steps `ticks` times and returns the census history.
    ///
    /// # Errors
    ///
    /// Stops at the first failing tick and returns its error.
    pub fn run(&mut self, ticks: u64) -> Result<&CountHistory, EngineError> {
        for _ in 0..ticks {
            self.step()?;
        }
        let census = self.count_by_type();
        info!(
            tick = self.tick,
            ranged = census.ranged,
            melee = census.melee,
            "run complete"
        );
        Ok(&self.history)
    }

    /// Live units per kind right now.
    #[must_use]
    pub fn count_by_type(&self) -> Census {
        Census::of(&self.field)
    }

    /// Mean occupant health per cell right now.
    #[must_use]
    pub fn health_heatmap(&self) -> Heatmap {
        Heatmap::of(&self.field)
    }

    /// Full read-only view for renderers.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.field, self.tick)
    }

    /// Live agents in id order.
    pub fn live_agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.field.population().live_agents()
    }

    /// Looks up a live agent.
    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.field.agent(id)
    }

    /// Census after each completed tick.
    #[must_use]
    pub fn history(&self) -> &CountHistory {
        &self.history
    }

    /// Combat events from the most recent tick, in activation order.
    #[must_use]
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// True once at most one kind has units left.
    #[must_use]
    pub fn is_decided(&self) -> bool {
        let census = self.count_by_type();
        census.ranged == 0 || census.melee == 0
    }

    /// Read-only battlefield.
    #[must_use]
    pub fn battlefield(&self) -> &Battlefield {
        &self.field
    }

    /// Mutable battlefield.
    ///
    /// Use this to hand-place agents before the first step.
    #[must_use]
    pub fn battlefield_mut(&mut self) -> &mut Battlefield {
        &mut self.field
    }

    /// Ticks completed.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Seed the run was built with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    /// Config the run was built with.
    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Deterministic digest of tick, occupancy and every agent's health.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tick.hash(&mut hasher);
        hash_grid_into(self.field.grid(), &mut hasher);
        for agent in self.live_agents() {
            agent.id().hash(&mut hasher);
            agent.health().to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
