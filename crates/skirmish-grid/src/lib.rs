//! # Skirmish Grid
//!
//! Discrete spatial substrate for grid-bound agents.
//!
//! The grid is a fixed `width × height` lattice of integer cells where any
//! number of occupants may share a cell. It provides:
//!
//! - **Occupancy bookkeeping**: place, move and remove keyed occupants while
//!   keeping the "one occupant, one cell" invariant
//! - **Moore neighborhood queries**: occupants within a Chebyshev radius,
//!   with or without the center cell
//! - **Edge policies**: a bounded world that rejects out-of-range cells, or a
//!   torus that wraps them
//! - **State hashing**: a stable digest of occupancy for determinism checks
//!
//! ## Quick Start
//!
//! ```
//! use glam::IVec2;
//! use skirmish_grid::{EdgePolicy, MultiGrid};
//!
//! let mut grid: MultiGrid<u64> = MultiGrid::new(10, 10, EdgePolicy::Bounded).unwrap();
//! grid.place(1, IVec2::new(2, 2)).unwrap();
//! grid.place(2, IVec2::new(3, 3)).unwrap();
//!
//! assert_eq!(grid.neighbors(IVec2::new(2, 2), 1, false), vec![2]);
//! assert!(grid.place(3, IVec2::new(10, 0)).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod edge;
pub mod error;
pub mod grid;
pub mod hash;
pub mod neighborhood;

// Re-exports for convenience
pub use edge::EdgePolicy;
pub use error::GridError;
pub use grid::MultiGrid;
pub use hash::hash_grid;
pub use neighborhood::{chebyshev, manhattan};

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A grid cell coordinate. `x` grows to the right, `y` grows downwards.
pub type Cell = IVec2;

/// Dimensions of a grid.
///
/// Coordinates are valid when `0 <= x < width` and `0 <= y < height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    /// Number of columns
    pub width: i32,
    /// Number of rows
    pub height: i32,
}

impl Extent {
    /// Create an extent, rejecting empty or oversized dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] if either side is zero, does
    /// not fit an `i32`, or the cell count overflows `usize`.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        let invalid = GridError::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(invalid);
        };
        (width as usize).checked_mul(height as usize).ok_or(invalid)?;
        Ok(Self {
            width: w,
            height: h,
        })
    }

    /// Check if a cell lies inside the extent.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// Total number of cells.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major index of an in-bounds cell.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Cell for a row-major index.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn cell_at(&self, index: usize) -> Cell {
        let w = self.width as usize;
        IVec2::new((index % w) as i32, (index / w) as i32)
    }
}
