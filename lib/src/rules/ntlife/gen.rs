//! Non-totalistic Life-like Generations rules.

use super::NtLife;
use crate::{
    cells::{CellState, Coord},
    error::Error,
    rules::{generations_forced, generations_next, Rule, MOORE},
};
use ca_rules::ParseNtLifeGen;
use std::str::FromStr;

/// Non-totalistic Life-like Generations rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NtLifeGen {
    ntlife: NtLife,
    /// Number of states.
    gen: usize,
}

impl NtLifeGen {
    /// Constructs a new rule from the `b` and `s` data
    /// and the number of states.
    pub fn new(b: Vec<u8>, s: Vec<u8>, gen: usize) -> Self {
        let ntlife = NtLife::new(b, s);
        NtLifeGen { ntlife, gen }
    }

    /// Number of states.
    pub fn gen(&self) -> usize {
        self.gen
    }

    /// Converts to the corresponding non-Generations rule.
    pub fn non_gen(self) -> NtLife {
        self.ntlife
    }
}

impl ParseNtLifeGen for NtLifeGen {
    fn from_bsg(b: Vec<u8>, s: Vec<u8>, gen: usize) -> Self {
        Self::new(b, s, gen)
    }
}

impl FromStr for NtLifeGen {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let rule: NtLifeGen = ParseNtLifeGen::parse_rule(input).map_err(Error::ParseRuleError)?;
        if rule.ntlife.b0() {
            Err(Error::B0Error)
        } else {
            Ok(rule)
        }
    }
}

impl Rule for NtLifeGen {
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
        let config = NtLife::configuration(neighbors);
        generations_next(
            state,
            self.gen,
            self.ntlife.birth[config],
            self.ntlife.survival[config],
        )
    }
}
