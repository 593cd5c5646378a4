//! All kinds of errors in this crate.

use ca_rules::ParseRuleError;
use displaydoc::Display;
use thiserror::Error;

/// All kinds of errors in this crate.
#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum Error {
    /// Invalid rule: {0:?}.
    ParseRuleError(#[from] ParseRuleError),
    /// B0 rules are only supported without S8, and not for Generations rules.
    B0Error,
    /// Width / period / displacement should be positive.
    NonPositiveError,
    /// Rules with {0} states are not supported. The number of states should be between 2 and 31.
    TooManyStates(usize),
    /// The neighborhood should reach at least one row below the cell.
    NeighborhoodError,
    /// Glide symmetric searches require an even period and an even displacement with coprime halves.
    GlideError,
    /// Alternating rules require the period and the displacement to be coprime.
    AlternatingError,
    /// {0} is not supported.
    Unsupported(&'static str),
}
