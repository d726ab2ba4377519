//! Moore neighborhoods and lattice distances.

use glam::IVec2;

use crate::{Cell, EdgePolicy, Extent};

/// Chebyshev (king-move) distance between two cells.
#[must_use]
pub fn chebyshev(a: Cell, b: Cell) -> i32 {
    let d = (a - b).abs();
    d.x.max(d.y)
}

/// Manhattan distance `|dx| + |dy|` between two cells.
#[must_use]
pub fn manhattan(a: Cell, b: Cell) -> i32 {
    let d = (a - b).abs();
    d.x + d.y
}

/// Cells within Chebyshev distance `radius` of `center`, in row-major scan
/// order (top row first, left to right).
///
/// On a bounded grid out-of-range cells are dropped. On a torus the window
/// wraps and each cell appears at most once. The center cell is left out
/// unless `include_center` is set, including when a small torus wraps back
/// onto it.
#[must_use]
pub fn moore_cells(
    extent: Extent,
    policy: EdgePolicy,
    center: Cell,
    radius: u32,
    include_center: bool,
) -> Vec<Cell> {
    // A window wider than the grid revisits the same cells
    let r = i64::from(radius);
    let rx = r.min(i64::from(extent.width));
    let ry = r.min(i64::from(extent.height));

    // Only a torus window can land on the same cell twice
    let wraps = policy == EdgePolicy::Torus
        && (2 * rx + 1 > i64::from(extent.width) || 2 * ry + 1 > i64::from(extent.height));
    let mut cells = Vec::new();

    for dy in -ry..=ry {
        for dx in -rx..=rx {
            let x = i64::from(center.x) + dx;
            let y = i64::from(center.y) + dy;
            let Some(cell) = policy.resolve(extent, x, y) else {
                continue;
            };
            if !include_center && cell == center {
                continue;
            }
            if wraps && cells.contains(&cell) {
                continue;
            }
            cells.push(cell);
        }
    }

    cells
}

/// Unit step along the dominant axis of `delta`; ties go to the x axis.
///
/// Returns `IVec2::ZERO` for a zero delta.
#[must_use]
pub fn orthogonal_step(delta: IVec2) -> IVec2 {
    if delta == IVec2::ZERO {
        IVec2::ZERO
    } else if delta.x.abs() >= delta.y.abs() {
        IVec2::new(delta.x.signum(), 0)
    } else {
        IVec2::new(0, delta.y.signum())
    }
}
