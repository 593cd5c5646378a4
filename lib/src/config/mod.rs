//! Search configuration.

use crate::{
    error::Error,
    rules::{Life, LifeGen, NtLife, NtLifeGen, Rule},
    search::ShipSearch,
    traits::Search,
};
use educe::Educe;

mod symmetry;

pub use symmetry::Symmetry;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Search configuration.
///
/// The search will be generated from this configuration.
///
/// The ship travels upwards by `dy` rows every `period` generations.
/// Only `width` columns are searched; the [`Symmetry`] says
/// what lies beyond them.
#[derive(Clone, Debug, Educe, PartialEq, Eq)]
#[educe(Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// The rule string of the cellular automaton.
    #[educe(Default = "B3/S23")]
    pub rule_string: String,

    /// Number of searched columns.
    #[educe(Default = 6)]
    pub width: isize,

    /// Period.
    #[educe(Default = 2)]
    pub period: isize,

    /// Vertical displacement per period.
    #[educe(Default = 1)]
    pub dy: isize,

    /// Symmetry of the ship.
    pub symmetry: Symmetry,

    /// The size of the breadth-first queue at which the search
    /// switches to a round of depth-first deepening.
    #[educe(Default(expression = "1 << 20"))]
    pub max_queue_size: usize,

    /// How many rows each depth-first round goes beyond a queued state.
    ///
    /// `None` means the period (or half the period, for glide symmetric ships).
    pub min_deepening_increment: Option<usize>,

    /// Number of leading columns whose extensions are precomputed
    /// and cached.
    #[educe(Default = 3)]
    pub lookup_table_width: usize,

    /// Whether to reject rows which cannot be extended by one more row.
    #[educe(Default = true)]
    pub lookahead: bool,

    /// Reports every partial result.
    pub verbose: bool,

    /// Never reports partial results.
    pub no_partials: bool,

    /// Pops queued states from the back instead of the front.
    pub dfs: bool,

    /// Explores the successors of a state in a random order.
    pub random_order: bool,

    /// Seed of the random order.
    ///
    /// `None` means a seed from the operating system.
    pub seed: Option<u64>,

    /// Capacity of the transposition table.
    #[educe(Default(expression = "1 << 20"))]
    pub transposition_capacity: usize,

    /// Rows after the initial empty rows beyond which a state
    /// with a nonempty tail is discarded.
    ///
    /// `None` means no limit.
    pub max_length: Option<usize>,
}

impl Config {
    /// Sets up a new configuration with the given width, period and displacement.
    pub fn new(width: isize, period: isize, dy: isize) -> Self {
        Config {
            width,
            period,
            dy,
            ..Config::default()
        }
    }

    /// Sets the rule string.
    pub fn set_rule_string<S: ToString>(mut self, rule_string: S) -> Self {
        self.rule_string = rule_string.to_string();
        self
    }

    /// Sets the symmetry.
    pub fn set_symmetry(mut self, symmetry: Symmetry) -> Self {
        self.symmetry = symmetry;
        self
    }

    /// Sets the size of the queue which triggers depth-first deepening.
    pub fn set_max_queue_size(mut self, max_queue_size: usize) -> Self {
        self.max_queue_size = max_queue_size;
        self
    }

    /// Sets the depth of each depth-first round.
    pub fn set_min_deepening_increment<T: Into<Option<usize>>>(mut self, increment: T) -> Self {
        self.min_deepening_increment = increment.into();
        self
    }

    /// Sets the number of precomputed columns.
    pub fn set_lookup_table_width(mut self, lookup_table_width: usize) -> Self {
        self.lookup_table_width = lookup_table_width;
        self
    }

    /// Sets whether to use lookahead.
    pub fn set_lookahead(mut self, lookahead: bool) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Sets whether to report every partial result.
    pub fn set_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets whether to suppress partial results.
    pub fn set_no_partials(mut self, no_partials: bool) -> Self {
        self.no_partials = no_partials;
        self
    }

    /// Sets whether to pop queued states from the back.
    pub fn set_dfs(mut self, dfs: bool) -> Self {
        self.dfs = dfs;
        self
    }

    /// Sets whether to explore successors in a random order.
    pub fn set_random_order(mut self, random_order: bool) -> Self {
        self.random_order = random_order;
        self
    }

    /// Sets the seed of the random order.
    pub fn set_seed<T: Into<Option<u64>>>(mut self, seed: T) -> Self {
        self.seed = seed.into();
        self
    }

    /// Sets the capacity of the transposition table.
    pub fn set_transposition_capacity(mut self, capacity: usize) -> Self {
        self.transposition_capacity = capacity;
        self
    }

    /// Sets the maximal length of a ship.
    pub fn set_max_length<T: Into<Option<usize>>>(mut self, max_length: T) -> Self {
        self.max_length = max_length.into();
        self
    }

    /// Checks that the dimensions are positive.
    pub(crate) fn check(&self) -> Result<(), Error> {
        if self.width <= 0 || self.period <= 0 || self.dy <= 0 {
            return Err(Error::NonPositiveError);
        }
        if self.symmetry.is_glide()
            && (self.period % 2 != 0 || self.dy % 2 != 0 || gcd(self.period, self.dy) != 2)
        {
            return Err(Error::GlideError);
        }
        Ok(())
    }

    /// Creates a new search for a given rule.
    pub fn ship_search<R: Rule>(&self, rule: R) -> Result<ShipSearch<R>, Error> {
        ShipSearch::new(self.clone(), rule)
    }

    /// Creates a new search from the configuration.
    /// Returns an error if the rule string is invalid.
    pub fn world(&self) -> Result<Box<dyn Search>, Error> {
        self.check()?;
        if let Ok(rule) = self.rule_string.parse::<Life>() {
            Ok(Box::new(self.ship_search(rule)?))
        } else if let Ok(rule) = self.rule_string.parse::<NtLife>() {
            Ok(Box::new(self.ship_search(rule)?))
        } else if let Ok(rule) = self.rule_string.parse::<LifeGen>() {
            if rule.gen() > 2 {
                Ok(Box::new(self.ship_search(rule)?))
            } else {
                Ok(Box::new(self.ship_search(rule.non_gen())?))
            }
        } else {
            let rule = self.rule_string.parse::<NtLifeGen>()?;
            if rule.gen() > 2 {
                Ok(Box::new(self.ship_search(rule)?))
            } else {
                Ok(Box::new(self.ship_search(rule.non_gen())?))
            }
        }
    }
}

pub(crate) fn gcd(mut a: isize, mut b: isize) -> isize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd_of_speeds() {
        assert_eq!(gcd(4, 2), 2);
        assert_eq!(gcd(7, 3), 1);
        assert_eq!(gcd(6, 0), 6);
    }

    #[test]
    fn glide_parameters() {
        let config = Config::new(4, 4, 2).set_symmetry(Symmetry::GlideSymmetric);
        assert_eq!(config.check(), Ok(()));
        let config = Config::new(4, 3, 2).set_symmetry(Symmetry::GlideSymmetric);
        assert_eq!(config.check(), Err(Error::GlideError));
        let config = Config::new(4, 8, 4).set_symmetry(Symmetry::GlideSymmetric);
        assert_eq!(config.check(), Err(Error::GlideError));
    }

    #[test]
    fn non_positive() {
        assert_eq!(Config::new(0, 4, 2).check(), Err(Error::NonPositiveError));
        assert_eq!(Config::new(4, 4, -1).check(), Err(Error::NonPositiveError));
    }
}
