//! Occupancy hashing for determinism verification.
//!
//! Two grids that went through the same sequence of operations must produce
//! the same hash. Runs that should be reproducible compare these digests
//! instead of walking both grids.

use std::collections::hash_map::DefaultHasher;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use crate::MultiGrid;

/// Compute a deterministic hash of grid occupancy.
///
/// This hash includes:
/// - Dimensions and edge policy
/// - Every cell's occupants, in row-major order and arrival order
#[must_use]
pub fn hash_grid<K>(grid: &MultiGrid<K>) -> u64
where
    K: Copy + Eq + Hash + Debug,
{
    let mut hasher = DefaultHasher::new();
    hash_grid_into(grid, &mut hasher);
    hasher.finish()
}

/// Feed grid occupancy into an existing hasher.
pub fn hash_grid_into<K, H>(grid: &MultiGrid<K>, hasher: &mut H)
where
    K: Copy + Eq + Hash + Debug,
    H: Hasher,
{
    grid.extent().hash(hasher);
    grid.policy().hash(hasher);

    for (cell, occupants) in grid.iter_cells() {
        if occupants.is_empty() {
            continue;
        }
        cell.x.hash(hasher);
        cell.y.hash(hasher);
        occupants.len().hash(hasher);
        for key in occupants {
            key.hash(hasher);
        }
    }
}
