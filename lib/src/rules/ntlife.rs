//! Non-totalistic Life-like rules.

mod gen;

use super::{Rule, MOORE};
use crate::{
    cells::{CellState, Coord, ALIVE, DEAD},
    error::Error,
};
use ca_rules::ParseNtLife;
use std::str::FromStr;

pub use gen::NtLifeGen;

/// Non-totalistic Life-like rules.
///
/// This includes any rule that can be converted to a non-totalistic
/// Life-like rule: isotropic non-totalistic rules,
/// non-isotropic rules, hexagonal rules, rules with von Neumann
/// neighborhoods, etc.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NtLife {
    /// Birth conditions, indexed by the configuration of living neighbors.
    pub(super) birth: Box<[bool; 256]>,
    /// Survival conditions, indexed by the configuration of living neighbors.
    pub(super) survival: Box<[bool; 256]>,
}

impl NtLife {
    /// Constructs a new rule from the `b` and `s` data.
    ///
    /// Each entry is a configuration of living neighbors, with the bits
    /// `NW, N, NE, W, E, SW, S, SE` from the most significant to the least.
    pub fn new(b: Vec<u8>, s: Vec<u8>) -> Self {
        let mut birth = Box::new([false; 256]);
        let mut survival = Box::new([false; 256]);
        for config in b {
            birth[config as usize] = true;
        }
        for config in s {
            survival[config as usize] = true;
        }
        NtLife { birth, survival }
    }

    /// Whether the rule contains `B0`.
    pub fn b0(&self) -> bool {
        self.birth[0]
    }

    /// Whether the background alternates between dead and alive.
    pub fn strobing(&self) -> bool {
        self.birth[0] && !self.survival[0xff]
    }

    /// The configuration of living neighbors, in the order of [`MOORE`].
    pub(super) fn configuration(neighbors: &[CellState]) -> usize {
        neighbors
            .iter()
            .fold(0, |config, &state| config << 1 | (state == ALIVE) as usize)
    }
}

impl ParseNtLife for NtLife {
    fn from_bs(b: Vec<u8>, s: Vec<u8>) -> Self {
        Self::new(b, s)
    }
}

impl FromStr for NtLife {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let rule: NtLife = ParseNtLife::parse_rule(input).map_err(Error::ParseRuleError)?;
        if rule.b0() && !rule.strobing() {
            Err(Error::B0Error)
        } else {
            Ok(rule)
        }
    }
}

impl Rule for NtLife {
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
        let config = Self::configuration(neighbors);
        let alive = if state == DEAD {
            self.birth[config]
        } else {
            self.survival[config]
        };
        alive as CellState
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn life_as_ntlife() -> Result<(), Error> {
        let rule: NtLife = "B3/S23".parse()?;
        // N, W, SE alive.
        let neighbors = [DEAD, ALIVE, DEAD, ALIVE, DEAD, DEAD, DEAD, ALIVE];
        assert_eq!(NtLife::configuration(&neighbors), 0b_0101_0001);
        assert_eq!(rule.transition(&neighbors, DEAD, 0), ALIVE);
        Ok(())
    }

    #[test]
    fn b0_without_s8() -> Result<(), Error> {
        assert!("B0/S3".parse::<NtLife>()?.strobing());
        assert_eq!("B0/S8".parse::<NtLife>(), Err(Error::B0Error));
        Ok(())
    }

    #[test]
    fn isotropic_letters() -> Result<(), Error> {
        let rule: NtLife = "B2a/S".parse()?;
        // Two adjacent neighbors on an edge and a corner: 2a.
        let adjacent = [ALIVE, ALIVE, DEAD, DEAD, DEAD, DEAD, DEAD, DEAD];
        // Two opposite neighbors: 2i.
        let opposite = [DEAD, ALIVE, DEAD, DEAD, DEAD, DEAD, ALIVE, DEAD];
        assert_eq!(rule.transition(&adjacent, DEAD, 0), ALIVE);
        assert_eq!(rule.transition(&opposite, DEAD, 0), DEAD);
        Ok(())
    }
}
