//! Detected circles and the near-duplicate rule used to merge them.

mod set;

pub use set::CircleSet;

use serde::{Deserialize, Serialize};

/// Offsets `(dx, dy, dr)` from a candidate to an accepted circle that count as
/// the same physical circle.
///
/// Only same-sign combinations are listed: `(x + 1, y - 1, r)` or
/// `(x + 2, y, r)` are deliberately absent, so the rule is narrower than a
/// Chebyshev distance of one and is not transitive.
pub const NEIGHBOR_OFFSETS: [(i32, i32, i32); 15] = [
    (0, 0, 0),
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
    (1, 1, 0),
    (-1, -1, 0),
    (1, 0, 1),
    (-1, 0, -1),
    (0, 1, 1),
    (0, -1, -1),
    (1, 1, 1),
    (-1, -1, -1),
];

/// A circle found by the radius sweep.
///
/// `x` is the row of the center and `y` its column, so raster order
/// (increasing `x`, then increasing `y`) is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Circle {
    pub x: i32,
    pub y: i32,
    pub r: i32,
}

impl Circle {
    pub const fn new(x: i32, y: i32, r: i32) -> Self {
        Self { x, y, r }
    }

    /// Shift every coordinate by the given offsets.
    pub const fn offset(&self, dx: i32, dy: i32, dr: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.r + dr)
    }

    /// True when `other` is this circle or one of its listed neighbors.
    pub fn is_near_duplicate(&self, other: &Circle) -> bool {
        NEIGHBOR_OFFSETS
            .iter()
            .any(|&(dx, dy, dr)| self.offset(dx, dy, dr) == *other)
    }

    /// Iterate over every triple that this candidate would collide with.
    pub fn neighbors(&self) -> impl Iterator<Item = Circle> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .map(move |&(dx, dy, dr)| self.offset(dx, dy, dr))
    }
}

impl From<(i32, i32, i32)> for Circle {
    fn from((x, y, r): (i32, i32, i32)) -> Self {
        Self::new(x, y, r)
    }
}
