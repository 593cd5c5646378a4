//! Outer totalistic rules on arbitrary neighborhoods.

use super::{Rule, MOORE};
use crate::cells::{CellState, Coord, ALIVE, DEAD};

/// An outer totalistic two-state rule on an arbitrary neighborhood.
///
/// A dead cell is born, and a living cell survives, according to the number
/// of living cells in its neighborhood.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Totalistic {
    neighborhood: Vec<Coord>,
    birth: Vec<bool>,
    survival: Vec<bool>,
}

impl Totalistic {
    /// Constructs a rule from a neighborhood and the neighbor counts
    /// for birth and survival.
    ///
    /// Counts larger than the size of the neighborhood are ignored,
    /// and so is the origin if it appears in the neighborhood.
    pub fn new(neighborhood: Vec<Coord>, birth: &[usize], survival: &[usize]) -> Self {
        let neighborhood: Vec<Coord> = neighborhood
            .into_iter()
            .filter(|&coord| coord != Coord::default())
            .collect();
        let size = neighborhood.len();
        let table = |counts: &[usize]| {
            let mut table = vec![false; size + 1];
            for &count in counts.iter().filter(|&&count| count <= size) {
                table[count] = true;
            }
            table
        };
        Totalistic {
            birth: table(birth),
            survival: table(survival),
            neighborhood,
        }
    }

    /// The von Neumann neighborhood of range 1.
    pub fn von_neumann(birth: &[usize], survival: &[usize]) -> Self {
        let neighborhood = vec![
            Coord::new(0, -1),
            Coord::new(-1, 0),
            Coord::new(1, 0),
            Coord::new(0, 1),
        ];
        Self::new(neighborhood, birth, survival)
    }

    /// The hexagonal neighborhood, drawn on the square grid.
    pub fn hexagonal(birth: &[usize], survival: &[usize]) -> Self {
        let neighborhood = MOORE
            .iter()
            .copied()
            .filter(|&coord| coord != Coord::new(1, -1) && coord != Coord::new(-1, 1))
            .collect();
        Self::new(neighborhood, birth, survival)
    }

    /// The Moore neighborhood of the given range.
    pub fn moore(range: i32, birth: &[usize], survival: &[usize]) -> Self {
        let neighborhood = (-range..=range)
            .flat_map(|y| (-range..=range).map(move |x| Coord::new(x, y)))
            .collect();
        Self::new(neighborhood, birth, survival)
    }
}

impl Rule for Totalistic {
    fn neighborhood(&self) -> &[Coord] {
        &self.neighborhood
    }

    fn num_states(&self) -> usize {
        2
    }

    fn transition(&self, neighbors: &[CellState], state: CellState, _: usize) -> CellState {
        let count = neighbors.iter().filter(|&&state| state == ALIVE).count();
        let alive = if state == DEAD {
            self.birth[count]
        } else {
            self.survival[count]
        };
        alive as CellState
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighborhood_sizes() {
        assert_eq!(Totalistic::von_neumann(&[1], &[]).neighborhood().len(), 4);
        assert_eq!(Totalistic::hexagonal(&[2], &[3]).neighborhood().len(), 6);
        assert_eq!(Totalistic::moore(2, &[3], &[2, 3]).neighborhood().len(), 24);
    }

    #[test]
    fn counts() {
        let rule = Totalistic::von_neumann(&[1, 5], &[2]);
        assert_eq!(rule.transition(&[ALIVE, DEAD, DEAD, DEAD], DEAD, 0), ALIVE);
        assert_eq!(rule.transition(&[ALIVE, DEAD, DEAD, DEAD], ALIVE, 0), DEAD);
        assert_eq!(rule.transition(&[ALIVE, ALIVE, DEAD, DEAD], ALIVE, 0), ALIVE);
        assert!(!rule.has_b0());
        assert!(Totalistic::von_neumann(&[0], &[]).has_b0());
    }
}
