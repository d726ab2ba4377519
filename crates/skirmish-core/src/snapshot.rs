//! Read-only reports derived from battlefield state.
//!
//! Everything here is computed from the grid and the registry on demand and
//! never feeds back into the simulation:
//!
//! - [`Census`]: live units per kind
//! - [`Heatmap`]: mean occupant health per cell
//! - [`CountHistory`]: one census per completed tick, append-only
//! - [`Snapshot`]: all of the above plus per-agent positions for renderers

use serde::{Deserialize, Serialize};
use skirmish_grid::Cell;

use crate::agent::{AgentId, UnitKind};
use crate::battlefield::Battlefield;

/// Live units per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Census {
    /// Live archers
    pub ranged: usize,
    /// Live axemen
    pub melee: usize,
}

impl Census {
    /// Count live units on a battlefield.
    #[must_use]
    pub fn of(field: &Battlefield) -> Self {
        let mut census = Self::default();
        for agent in field.population().live_agents() {
            *census.get_mut(agent.kind()) += 1;
        }
        census
    }

    /// Count for one kind.
    #[must_use]
    pub fn get(&self, kind: UnitKind) -> usize {
        match kind {
            UnitKind::Ranged => self.ranged,
            UnitKind::Melee => self.melee,
        }
    }

    fn get_mut(&mut self, kind: UnitKind) -> &mut usize {
        match kind {
            UnitKind::Ranged => &mut self.ranged,
            UnitKind::Melee => &mut self.melee,
        }
    }

    /// Units of all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.ranged + self.melee
    }

    /// `(kind, count)` pairs in [`UnitKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (UnitKind, usize)> + '_ {
        UnitKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    /// The only kind still standing, if exactly one is.
    #[must_use]
    pub fn victor(&self) -> Option<UnitKind> {
        match (self.ranged > 0, self.melee > 0) {
            (true, false) => Some(UnitKind::Ranged),
            (false, true) => Some(UnitKind::Melee),
            _ => None,
        }
    }
}

/// Mean occupant health per cell, row-major. `None` marks an empty cell.
///
/// Only built from a live battlefield, so the dimensions always match the
/// cell buffer. It serializes for renderers but cannot be read back:
///
/// ```compile_fail
/// use skirmish_core::Heatmap;
///
/// let _: Heatmap = serde_json::from_str(r#"{"width":0,"height":0,"cells":[]}"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    width: usize,
    height: usize,
    cells: Vec<Option<f64>>,
}

impl Heatmap {
    /// Build the heatmap for a battlefield.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn of(field: &Battlefield) -> Self {
        let grid = field.grid();
        let cells = grid
            .iter_cells()
            .map(|(_, occupants)| {
                if occupants.is_empty() {
                    return None;
                }
                let total: f64 = occupants
                    .iter()
                    .filter_map(|id| field.agent(*id))
                    .map(crate::agent::Agent::health)
                    .sum();
                Some(total / occupants.len() as f64)
            })
            .collect();
        Self {
            width: grid.width() as usize,
            height: grid.height() as usize,
            cells,
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Mean health at `(x, y)`; `None` for empty or out-of-range cells.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y * self.width + x]
    }

    /// Rows top to bottom, `H × W`.
    #[must_use]
    pub fn rows(&self) -> Vec<&[Option<f64>]> {
        self.cells.chunks(self.width).collect()
    }

    /// Dense `H × W` matrix with `empty` in unoccupied cells.
    #[must_use]
    pub fn to_rows(&self, empty: f64) -> Vec<Vec<f64>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|c| c.unwrap_or(empty)).collect())
            .collect()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Census after every completed tick. Entry `i` is the state after tick `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountHistory {
    ranged: Vec<usize>,
    melee: Vec<usize>,
}

impl CountHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one tick's census.
    pub fn record(&mut self, census: Census) {
        self.ranged.push(census.ranged);
        self.melee.push(census.melee);
    }

    /// Per-tick counts for one kind.
    #[must_use]
    pub fn series(&self, kind: UnitKind) -> &[usize] {
        match kind {
            UnitKind::Ranged => &self.ranged,
            UnitKind::Melee => &self.melee,
        }
    }

    /// Census at a recorded tick index.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<Census> {
        Some(Census {
            ranged: *self.ranged.get(index)?,
            melee: *self.melee.get(index)?,
        })
    }

    /// Most recent census.
    #[must_use]
    pub fn latest(&self) -> Option<Census> {
        self.len().checked_sub(1).and_then(|i| self.at(i))
    }

    /// Number of recorded ticks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranged.len()
    }

    /// True before the first tick.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranged.is_empty()
    }
}

/// Position and health of one live agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    /// Agent id
    pub id: AgentId,
    /// Unit kind
    pub kind: UnitKind,
    /// Current cell
    pub position: Cell,
    /// Current health
    pub health: f64,
}

/// Everything a renderer needs after a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Ticks completed
    pub tick: u64,
    /// Live units per kind
    pub census: Census,
    /// Mean health per cell
    pub heatmap: Heatmap,
    /// Live agents in id order
    pub agents: Vec<AgentView>,
}

impl Snapshot {
    /// Capture the current state of a battlefield.
    #[must_use]
    pub fn capture(field: &Battlefield, tick: u64) -> Self {
        Self {
            tick,
            census: Census::of(field),
            heatmap: Heatmap::of(field),
            agents: field
                .population()
                .live_agents()
                .map(|agent| AgentView {
                    id: agent.id(),
                    kind: agent.kind(),
                    position: agent.position(),
                    health: agent.health(),
                })
                .collect(),
        }
    }

    /// Gini coefficient of live agents' health.
    #[must_use]
    pub fn health_gini(&self) -> Option<f64> {
        health_gini(self.agents.iter().map(|a| a.health))
    }
}

/// Gini coefficient of a set of health values.
///
/// 0 means everyone has the same health; values approach 1 as health
/// concentrates in few agents. Returns `None` for an empty set or a
/// non-positive total.
///
/// ```
/// use skirmish_core::snapshot::health_gini;
///
/// let even = health_gini([50.0, 50.0, 50.0]).unwrap();
/// assert!(even.abs() < 1e-12);
/// assert!(health_gini([0.0, 0.0, 100.0]).unwrap() > 0.6);
/// assert_eq!(health_gini(Vec::new()), None);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn health_gini(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut values: Vec<f64> = values.into_iter().collect();
    if values.is_empty() {
        return None;
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let n = values.len() as f64;
    let weighted: f64 = values
        .iter()
        .enumerate()
        .map(|(i, x)| x * (n - i as f64))
        .sum();
    let b = weighted / (n * total);
    Some(1.0 + 1.0 / n - 2.0 * b)
}
