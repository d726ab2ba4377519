//! Multi-occupancy grid.
//!
//! `MultiGrid` maps every cell to the occupants standing in it and keeps a
//! reverse index from occupant to cell, so moves and removals never scan the
//! whole lattice.
//!
//! # Determinism
//!
//! Cells keep occupants in arrival order and neighborhood queries walk cells
//! in row-major order, so every query returns occupants in a reproducible
//! order. The reverse index is a `HashMap`, but it is only ever used for
//! keyed lookups, never iterated.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use glam::IVec2;
use tracing::trace;

use crate::neighborhood::moore_cells;
use crate::{Cell, EdgePolicy, Extent, GridError};

/// A fixed-size grid where any number of occupants may share a cell.
///
/// Occupants are identified by a small copyable key `K` (usually an id
/// newtype). The grid never owns the occupants themselves.
///
/// # Example
///
/// ```
/// use glam::IVec2;
/// use skirmish_grid::{EdgePolicy, MultiGrid};
///
/// let mut grid: MultiGrid<u32> = MultiGrid::new(3, 3, EdgePolicy::Bounded).unwrap();
/// grid.place(7, IVec2::new(0, 0)).unwrap();
/// grid.move_to(7, IVec2::new(1, 0)).unwrap();
///
/// assert_eq!(grid.location(7), Some(IVec2::new(1, 0)));
/// assert!(grid.occupants(IVec2::new(0, 0)).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MultiGrid<K> {
    extent: Extent,
    policy: EdgePolicy,
    /// Occupants per cell, row-major.
    cells: Vec<Vec<K>>,
    /// Reverse index: occupant to cell.
    locations: HashMap<K, Cell>,
}

impl<K> MultiGrid<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Create an empty grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] for a zero or oversized side.
    pub fn new(width: u32, height: u32, policy: EdgePolicy) -> Result<Self, GridError> {
        let extent = Extent::new(width, height)?;
        Ok(Self {
            extent,
            policy,
            cells: vec![Vec::new(); extent.cell_count()],
            locations: HashMap::new(),
        })
    }

    /// Grid dimensions.
    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Edge policy this grid was built with.
    #[must_use]
    pub fn policy(&self) -> EdgePolicy {
        self.policy
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.extent.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.extent.height
    }

    /// Number of placed occupants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// True if no occupant is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Check whether `cell` is inside the grid.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.extent.contains(cell)
    }

    /// Put an occupant into a cell.
    ///
    /// On a torus the cell is wrapped first; the stored cell is returned.
    ///
    /// # Errors
    ///
    /// - [`GridError::OutOfBounds`] for a cell outside a bounded grid
    /// - [`GridError::AlreadyPlaced`] if the occupant already holds a cell
    pub fn place(&mut self, key: K, cell: Cell) -> Result<Cell, GridError> {
        if self.locations.contains_key(&key) {
            return Err(GridError::AlreadyPlaced(format!("{key:?}")));
        }
        let (cell, index) = self.resolve(cell)?;
        self.cells[index].push(key);
        self.locations.insert(key, cell);
        Ok(cell)
    }

    /// Move an occupant to another cell.
    ///
    /// Moving onto the current cell leaves the grid untouched.
    ///
    /// # Errors
    ///
    /// - [`GridError::OutOfBounds`] for a cell outside a bounded grid; the
    ///   occupant stays where it was
    /// - [`GridError::NotPlaced`] if the occupant holds no cell
    pub fn move_to(&mut self, key: K, cell: Cell) -> Result<Cell, GridError> {
        let Some(&from) = self.locations.get(&key) else {
            return Err(GridError::NotPlaced(format!("{key:?}")));
        };
        let (to, index) = self.resolve(cell)?;
        if to == from {
            return Ok(to);
        }
        self.detach(key, from);
        self.cells[index].push(key);
        self.locations.insert(key, to);
        trace!(occupant = ?key, from = ?from, to = ?to, "moved");
        Ok(to)
    }

    /// Take an occupant off the grid.
    ///
    /// Returns the cell it held, or `None` if it was not placed. Removing an
    /// absent occupant is not an error.
    pub fn remove(&mut self, key: K) -> Option<Cell> {
        let cell = self.locations.remove(&key)?;
        self.detach(key, cell);
        Some(cell)
    }

    /// Cell currently held by an occupant.
    #[must_use]
    pub fn location(&self, key: K) -> Option<Cell> {
        self.locations.get(&key).copied()
    }

    /// Occupants of a cell in arrival order. Empty for out-of-range cells.
    #[must_use]
    pub fn occupants(&self, cell: Cell) -> &[K] {
        match self.extent.index(cell) {
            Some(index) => &self.cells[index],
            None => &[],
        }
    }

    /// Occupants of every cell within Chebyshev distance `radius` of `center`.
    ///
    /// Cells are visited in row-major order and each cell yields its
    /// occupants in arrival order. Occupants of `center` itself are included
    /// only when `include_center` is set.
    #[must_use]
    pub fn neighbors(&self, center: Cell, radius: u32, include_center: bool) -> Vec<K> {
        moore_cells(self.extent, self.policy, center, radius, include_center)
            .into_iter()
            .flat_map(|cell| self.occupants(cell).iter().copied())
            .collect()
    }

    /// Displacement between two cells under the grid's edge policy.
    #[must_use]
    pub fn delta(&self, from: Cell, to: Cell) -> IVec2 {
        self.policy.delta(self.extent, from, to)
    }

    /// Manhattan distance between two cells under the grid's edge policy.
    #[must_use]
    pub fn manhattan(&self, a: Cell, b: Cell) -> i32 {
        let d = self.delta(a, b).abs();
        d.x + d.y
    }

    /// Iterate over all cells in row-major order with their occupants.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Cell, &[K])> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, occupants)| (self.extent.cell_at(index), occupants.as_slice()))
    }

    fn resolve(&self, cell: Cell) -> Result<(Cell, usize), GridError> {
        self.policy
            .resolve(self.extent, i64::from(cell.x), i64::from(cell.y))
            .and_then(|c| self.extent.index(c).map(|index| (c, index)))
            .ok_or(GridError::OutOfBounds {
                x: cell.x,
                y: cell.y,
                width: self.extent.width,
                height: self.extent.height,
            })
    }

    fn detach(&mut self, key: K, cell: Cell) {
        if let Some(index) = self.extent.index(cell) {
            let occupants = &mut self.cells[index];
            if let Some(pos) = occupants.iter().position(|k| *k == key) {
                // Keep arrival order stable for deterministic queries
                occupants.remove(pos);
            }
        }
    }
}
