//! Cellular automata rules.
//!
//! For the notations of rule strings, please see
//! [this article on LifeWiki](https://conwaylife.com/wiki/Rulestring).

mod life;
mod ntlife;
mod totalistic;

use crate::cells::{CellState, Coord, DEAD};
pub use life::{Life, LifeGen};
pub use ntlife::{NtLife, NtLifeGen};
pub use totalistic::Totalistic;

/// The Moore neighborhood, in reading order.
pub(crate) const MOORE: [Coord; 8] = [
    Coord::new(-1, -1),
    Coord::new(0, -1),
    Coord::new(1, -1),
    Coord::new(-1, 0),
    Coord::new(1, 0),
    Coord::new(-1, 1),
    Coord::new(0, 1),
    Coord::new(1, 1),
];

/// A cellular automaton rule.
///
/// A rule is a pure function of the states of the neighbors of a cell,
/// the state of the cell itself, and the generation (for rules whose
/// behavior alternates between generations). The same rule applies to
/// every cell.
///
/// The search only needs [`neighborhood`](Rule::neighborhood),
/// [`num_states`](Rule::num_states) and [`transition`](Rule::transition);
/// the other methods have default implementations.
pub trait Rule {
    /// Offsets of the neighbors, in a fixed order.
    ///
    /// The `neighbors` slices passed to [`transition`](Rule::transition)
    /// follow this order. The cell itself is not part of its neighborhood.
    fn neighborhood(&self) -> &[Coord];

    /// The number of states.
    fn num_states(&self) -> usize;

    /// The number of generations after which the rule repeats itself.
    fn alternating_period(&self) -> usize {
        1
    }

    /// Maps a stored state to the state the rule sees in the given generation.
    ///
    /// Must be an involution for every generation.
    fn convert_state(&self, state: CellState, _generation: usize) -> CellState {
        state
    }

    /// The next state of a cell in state `state`, if it does not depend on
    /// the neighbors.
    fn depends_on_neighbors(&self, _state: CellState, _generation: usize) -> Option<CellState> {
        None
    }

    /// The next state of a cell.
    fn transition(&self, neighbors: &[CellState], state: CellState, generation: usize)
        -> CellState;

    /// A bitmask of the states of the neighbor at index `unknown`
    /// which make a cell in state `state` evolve into `next`.
    ///
    /// The value of `neighbors[unknown]` is ignored and may be overwritten.
    fn successor_mask(
        &self,
        neighbors: &mut [CellState],
        unknown: usize,
        state: CellState,
        next: CellState,
        generation: usize,
    ) -> u32 {
        let states = self.num_states();
        if let Some(forced) = self.depends_on_neighbors(state, generation) {
            return if forced == next {
                (1 << states) - 1
            } else {
                0
            };
        }
        let mut mask = 0;
        for value in 0..states as CellState {
            neighbors[unknown] = value;
            if self.transition(neighbors, state, generation) == next {
                mask |= 1 << value;
            }
        }
        mask
    }

    /// Whether the background fails to evolve into the background
    /// of the next generation.
    ///
    /// The background of a generation is what a stored dead cell is
    /// converted to.
    fn has_b0(&self) -> bool {
        let period = self.alternating_period().max(1);
        let len = self.neighborhood().len();
        (0..period).any(|generation| {
            let background = self.convert_state(DEAD, generation);
            let next = self.convert_state(DEAD, (generation + 1) % period);
            self.transition(&vec![background; len], background, generation) != next
        })
    }
}

/// The next state in a Generations rule.
///
/// `born` and `survives` say what the underlying two-state rule
/// would do with the current neighborhood.
pub(crate) fn generations_next(
    state: CellState,
    gen: usize,
    born: bool,
    survives: bool,
) -> CellState {
    match state {
        DEAD => born as CellState,
        1 if survives => 1,
        _ => ((state as usize + 1) % gen) as CellState,
    }
}

/// Dying cells of a Generations rule ignore their neighbors.
pub(crate) fn generations_forced(state: CellState, gen: usize) -> Option<CellState> {
    if state >= 2 {
        Some(((state as usize + 1) % gen) as CellState)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generations_decay() {
        assert_eq!(generations_next(0, 3, true, false), 1);
        assert_eq!(generations_next(0, 3, false, true), 0);
        assert_eq!(generations_next(1, 3, false, true), 1);
        assert_eq!(generations_next(1, 3, false, false), 2);
        assert_eq!(generations_next(2, 3, true, true), 0);
        assert_eq!(generations_next(1, 2, false, false), 0);
        assert_eq!(generations_forced(3, 5), Some(4));
        assert_eq!(generations_forced(4, 5), Some(0));
        assert_eq!(generations_forced(1, 5), None);
    }

    #[test]
    fn b0_after_conversion() -> Result<(), crate::error::Error> {
        assert!(Life::new(vec![0], vec![8]).has_b0());
        assert!(!Life::new(vec![0, 2], vec![]).has_b0());
        assert!(!"B3/S23".parse::<Life>()?.has_b0());
        assert!(!"B01468/S23".parse::<Life>()?.has_b0());
        assert!(!"B0/S".parse::<NtLife>()?.has_b0());
        Ok(())
    }
}
