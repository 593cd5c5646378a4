//! Coordinates and cell states.

use std::ops::{Add, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The state of a cell.
///
/// `0` is the background state. For two-state rules `1` is alive;
/// for Generations rules `1` is alive and larger values are dying.
pub type CellState = u8;

/// The background state.
pub const DEAD: CellState = 0;

/// The living state.
pub const ALIVE: CellState = 1;

/// The largest number of states a rule may have.
///
/// Successor masks are stored in a `u32`.
pub const MAX_STATES: usize = 31;

/// An offset `(x, y)` relative to a cell.
///
/// `x` grows to the right, `y` grows downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Chebyshev distance from the origin.
    pub fn range(self) -> i32 {
        self.x.abs().max(self.y.abs())
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Coord { x, y }
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord_arithmetic() {
        let a = Coord::new(2, -1);
        let b = Coord::from((-3, 4));
        assert_eq!(a + b, Coord::new(-1, 3));
        assert_eq!(a - b, Coord::new(5, -5));
        assert_eq!((a - b).range(), 5);
    }
}
