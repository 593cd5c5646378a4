//! Totalistic Life-like rules.

mod gen;

use super::{Rule, MOORE};
use crate::{
    cells::{CellState, Coord, ALIVE, DEAD},
    error::Error,
};
use ca_rules::ParseLife;
use std::str::FromStr;

pub use gen::LifeGen;

/// Totalistic Life-like rules.
///
/// A cell only looks at the number of living cells among its eight
/// neighbors.
///
/// In a rule with `B0` but without `S8`, the background is alive in odd
/// generations. Such a rule sees stored states inverted in odd generations,
/// so that a stored dead cell is always background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Life {
    /// Birth conditions, indexed by the number of living neighbors.
    pub(super) birth: [bool; 9],
    /// Survival conditions, indexed by the number of living neighbors.
    pub(super) survival: [bool; 9],
}

impl Life {
    /// Constructs a new rule from the `b` and `s` data.
    pub fn new(b: Vec<u8>, s: Vec<u8>) -> Self {
        let mut birth = [false; 9];
        let mut survival = [false; 9];
        for n in b {
            birth[n as usize] = true;
        }
        for n in s {
            survival[n as usize] = true;
        }
        Life { birth, survival }
    }

    /// Whether the rule contains `B0`.
    pub fn b0(&self) -> bool {
        self.birth[0]
    }

    /// Whether the background alternates between dead and alive.
    pub fn strobing(&self) -> bool {
        self.birth[0] && !self.survival[8]
    }

    pub(super) fn alive_count(neighbors: &[CellState]) -> usize {
        neighbors.iter().filter(|&&state| state == ALIVE).count()
    }
}

impl ParseLife for Life {
    fn from_bs(b: Vec<u8>, s: Vec<u8>) -> Self {
        Self::new(b, s)
    }
}

impl FromStr for Life {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let rule: Life = ParseLife::parse_rule(input).map_err(Error::ParseRuleError)?;
        if rule.b0() && !rule.strobing() {
            Err(Error::B0Error)
        } else {
            Ok(rule)
        }
    }
}

impl Rule for Life {
    fn neighborhood(&self) -> &[Coord] {
        &MOORE
    }

    fn num_states(&self) -> usize {
        2
    }

    fn alternating_period(&self) -> usize {
        if self.strobing() {
            2
        } else {
            1
        }
    }

    fn convert_state(&self, state: CellState, generation: usize) -> CellState {
        if self.strobing() && generation % 2 == 1 {
            ALIVE - state
        } else {
            state
        }
    }

    fn transition(&self, neighbors: &[CellState], state: CellState, _: usize) -> CellState {
        let count = Self::alive_count(neighbors);
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
    fn parse_life() -> Result<(), Error> {
        let rule: Life = "B36/S23".parse()?;
        let mut neighbors = [DEAD; 8];
        neighbors[..3].fill(ALIVE);
        assert_eq!(rule.transition(&neighbors, DEAD, 0), ALIVE);
        assert_eq!(rule.transition(&neighbors, ALIVE, 0), ALIVE);
        neighbors[..6].fill(ALIVE);
        assert_eq!(rule.transition(&neighbors, DEAD, 0), ALIVE);
        assert_eq!(rule.transition(&neighbors, ALIVE, 0), DEAD);
        Ok(())
    }

    #[test]
    fn reject_b0() {
        assert_eq!("B0/S8".parse::<Life>(), Err(Error::B0Error));
        assert!(!"B3/S23".parse::<Life>().unwrap().has_b0());
    }

    #[test]
    fn strobing_background() -> Result<(), Error> {
        let rule: Life = "B01468/S23".parse()?;
        assert!(rule.strobing());
        assert_eq!(rule.alternating_period(), 2);
        assert_eq!(rule.convert_state(DEAD, 0), DEAD);
        assert_eq!(rule.convert_state(DEAD, 1), ALIVE);
        assert_eq!(rule.convert_state(ALIVE, 3), DEAD);
        // The background is born, then dies of overcrowding.
        assert_eq!(rule.transition(&[DEAD; 8], DEAD, 0), ALIVE);
        assert_eq!(rule.transition(&[ALIVE; 8], ALIVE, 1), DEAD);
        assert_eq!("B3/S23".parse::<Life>()?.alternating_period(), 1);
        Ok(())
    }

    #[test]
    fn successor_mask_of_life() -> Result<(), Error> {
        let rule: Life = "B3/S23".parse()?;
        // Two living neighbors and a dead cell: the last neighbor decides a birth.
        let mut neighbors = [ALIVE, ALIVE, DEAD, DEAD, DEAD, DEAD, DEAD, DEAD];
        assert_eq!(rule.successor_mask(&mut neighbors, 7, DEAD, ALIVE, 0), 0b10);
        assert_eq!(rule.successor_mask(&mut neighbors, 7, DEAD, DEAD, 0), 0b01);
        assert_eq!(rule.successor_mask(&mut neighbors, 7, ALIVE, ALIVE, 0), 0b11);
        Ok(())
    }
}
