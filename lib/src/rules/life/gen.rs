//! Totalistic Life-like Generations rules.

use super::Life;
use crate::{
    cells::{CellState, Coord},
    error::Error,
    rules::{generations_forced, generations_next, Rule, MOORE},
};
use ca_rules::ParseLifeGen;
use std::str::FromStr;

/// Totalistic Life-like Generations rules.
///
/// Only cells in state `1` count as living neighbors.
/// A living cell which does not survive starts dying,
/// passing through the states `2, 3, ..., gen - 1` before it dies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LifeGen {
    life: Life,
    /// Number of states.
    gen: usize,
}

impl LifeGen {
    /// Constructs a new rule from the `b` and `s` data
    /// and the number of states.
    pub fn new(b: Vec<u8>, s: Vec<u8>, gen: usize) -> Self {
        let life = Life::new(b, s);
        LifeGen { life, gen }
    }

    /// Number of states.
    pub fn gen(&self) -> usize {
        self.gen
    }

    /// Converts to the corresponding non-Generations rule.
    pub fn non_gen(self) -> Life {
        self.life
    }
}

impl ParseLifeGen for LifeGen {
    fn from_bsg(b: Vec<u8>, s: Vec<u8>, gen: usize) -> Self {
        Self::new(b, s, gen)
    }
}

impl FromStr for LifeGen {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let rule: LifeGen = ParseLifeGen::parse_rule(input).map_err(Error::ParseRuleError)?;
        if rule.life.b0() {
            Err(Error::B0Error)
        } else {
            Ok(rule)
        }
    }
}

impl Rule for LifeGen {
    fn neighborhood(&self) -> &[Coord] {
        &MOORE
    }

    fn num_states(&self) -> usize {
        self.gen
    }

    fn depends_on_neighbors(&self, state: CellState, _: usize) -> Option<CellState> {
        generations_forced(state, self.gen)
    }

    fn transition(&self, neighbors: &[CellState], state: CellState, _: usize) -> CellState {
        let count = Life::alive_count(neighbors);
        generations_next(
            state,
            self.gen,
            self.life.birth[count],
            self.life.survival[count],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::{ALIVE, DEAD};

    #[test]
    fn brians_brain() -> Result<(), Error> {
        let rule: LifeGen = "B2/S/C3".parse()?;
        assert_eq!(rule.gen(), 3);
        let mut neighbors = [DEAD; 8];
        neighbors[0] = ALIVE;
        neighbors[4] = 2;
        assert_eq!(rule.transition(&neighbors, DEAD, 0), DEAD);
        neighbors[4] = ALIVE;
        assert_eq!(rule.transition(&neighbors, DEAD, 0), ALIVE);
        assert_eq!(rule.transition(&neighbors, ALIVE, 0), 2);
        assert_eq!(rule.transition(&neighbors, 2, 0), DEAD);
        assert_eq!(rule.successor_mask(&mut neighbors, 0, 2, DEAD, 0), 0b111);
        assert_eq!(rule.successor_mask(&mut neighbors, 0, 2, ALIVE, 0), 0);
        Ok(())
    }
}
