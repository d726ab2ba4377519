//! Grid errors.

use thiserror::Error;

/// Errors raised by grid construction and occupancy updates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Width or height is zero or too large to index.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// A bounded grid was asked to use a cell outside `[0,W)×[0,H)`.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        /// Requested column
        x: i32,
        /// Requested row
        y: i32,
        /// Grid width
        width: i32,
        /// Grid height
        height: i32,
    },
    /// The occupant is not on the grid.
    #[error("occupant {0} is not placed on the grid")]
    NotPlaced(String),
    /// The occupant already holds a cell.
    #[error("occupant {0} is already placed on the grid")]
    AlreadyPlaced(String),
}
