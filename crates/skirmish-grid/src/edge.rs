//! Edge policies: what happens to coordinates outside the extent.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::{Cell, Extent};

/// How the grid treats coordinates that fall outside its extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Out-of-range cells are rejected. Distances are plain lattice distances.
    #[default]
    Bounded,
    /// Coordinates wrap around both axes. Distances take the shortest way
    /// around the torus.
    Torus,
}

impl EdgePolicy {
    /// Map a raw coordinate onto the grid.
    ///
    /// Returns `None` for an out-of-range cell on a bounded grid.
    #[must_use]
    pub fn resolve(self, extent: Extent, x: i64, y: i64) -> Option<Cell> {
        match self {
            Self::Bounded => {
                let cell = IVec2::new(i32::try_from(x).ok()?, i32::try_from(y).ok()?);
                extent.contains(cell).then_some(cell)
            }
            Self::Torus => Some(IVec2::new(
                wrap_axis(x, extent.width),
                wrap_axis(y, extent.height),
            )),
        }
    }

    /// Displacement from `from` to `to` under this policy.
    ///
    /// On a torus each axis takes the shorter way around; an exact half-way
    /// tie keeps the positive direction.
    #[must_use]
    pub fn delta(self, extent: Extent, from: Cell, to: Cell) -> IVec2 {
        let raw = to - from;
        match self {
            Self::Bounded => raw,
            Self::Torus => IVec2::new(
                shortest_axis(raw.x, extent.width),
                shortest_axis(raw.y, extent.height),
            ),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn wrap_axis(v: i64, len: i32) -> i32 {
    // rem_euclid with a positive i32 modulus fits back into i32
    v.rem_euclid(i64::from(len)) as i32
}

fn shortest_axis(d: i32, len: i32) -> i32 {
    let d = d.rem_euclid(len);
    if d > len / 2 {
        d - len
    } else {
        d
    }
}
