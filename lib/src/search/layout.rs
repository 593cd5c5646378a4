//! How the rows of a ship are ordered, and which cells constrain which.
//!
//! Rows are numbered by an index `m`. Rows `m` and `m + period` are
//! vertically adjacent rows of the same generation, and row `m + shift`
//! is row `m` one generation later. A new row with index `n` completes the
//! constraints of the centre row `n - ymax * period`, where `ymax` is the
//! lowest row of the neighborhood.
//!
//! Columns are decided from left to right. Column `c` of the new row is
//! the bottom-right neighbor of the centre cell at `c - ux`, so once it is
//! known, that centre cell can be checked.

use crate::{
    cells::{CellState, Coord, MAX_STATES},
    config::{gcd, Config, Symmetry},
    error::Error,
    rules::Rule,
};
use std::{collections::BTreeSet, ops::RangeInclusive};

/// Neighborhoods larger than this are rejected.
pub(crate) const MAX_NEIGHBORS: usize = 128;

/// Largest number of entries in a prefix table.
const MAX_PREFIX_ENTRIES: usize = 1 << 16;

/// Largest number of distinct recent-cell hashes for per-depth memoization.
const MAX_MEMO_STRIDE: u64 = 1 << 10;

/// Where a key cell comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Slot {
    /// A row of the window, by its neighborhood offset.
    Row(i32),
    /// The row the centre row evolves into.
    Next,
}

#[derive(Clone, Debug)]
pub(crate) struct Layout {
    pub width: usize,
    pub symmetry: Symmetry,
    /// Number of states.
    pub states: usize,
    /// Row interleave.
    pub period: usize,
    /// Index difference between a row and its successor.
    pub shift: usize,
    pub neighborhood: Vec<Coord>,
    /// Index of the bottom-right neighbor, whose value is being decided.
    pub decided: usize,
    /// Horizontal offset of the decided neighbor.
    pub ux: i32,
    /// Offset of the top row of the window. The centre row is always included.
    pub ylo: i32,
    /// Row offset of the new row.
    pub ymax: i32,
    pub max_dx: i32,
    pub min_dx: i32,
    /// Padding on each side of a key row.
    pub pad: usize,
    /// Number of recent cells needed to check a centre cell.
    pub span: usize,
    /// `states.pow(span)`.
    pub modulus: u64,
    /// `states.pow(i)`.
    pub powers: Vec<u64>,
    /// Whether the memo of recent cells is small enough.
    pub memo: bool,
    /// Place value of each neighbor in a table 1 index.
    pub places: Vec<usize>,
    /// Place value of the centre cell in a table 1 index.
    pub place_state: usize,
    /// Place value of the next state in a table 1 index.
    pub place_next: usize,
    /// Size of table 1 for one generation.
    pub table_size: usize,
    /// Number of rows which decide every successor of a state.
    pub history: usize,
    /// Inverse of `shift` modulo `period`, if any.
    pub inverse: Option<usize>,
    pub alternating: usize,
    /// `convert[generation][state]`.
    pub convert: Vec<Vec<CellState>>,
    pub identity: bool,
    /// Whether a ship of this speed can exist at all.
    pub feasible: bool,
    pub lookahead: bool,
    /// How far right of a failing lookahead column a candidate row
    /// still matters.
    pub lookahead_reach: i32,
    pub lookup_width: usize,
    pub successor_window: Vec<(Slot, usize)>,
    pub lookahead_window: Vec<(Slot, usize)>,
}

impl Layout {
    pub fn new<R: Rule>(config: &Config, rule: &R) -> Result<Self, Error> {
        config.check()?;
        let states = rule.num_states();
        if !(2..=MAX_STATES).contains(&states) {
            return Err(Error::TooManyStates(states));
        }
        let neighborhood = rule.neighborhood().to_vec();
        if neighborhood.is_empty() || neighborhood.len() > MAX_NEIGHBORS {
            return Err(Error::NeighborhoodError);
        }
        if rule.has_b0() {
            return Err(Error::B0Error);
        }
        let ymax = neighborhood.iter().map(|c| c.y).max().unwrap_or(0);
        if ymax < 1 {
            return Err(Error::NeighborhoodError);
        }
        let ylo = neighborhood.iter().map(|c| c.y).min().unwrap_or(0).min(0);
        let range = neighborhood
            .iter()
            .map(|c| c.range())
            .max()
            .unwrap_or(1) as usize;
        let (decided, ux) = neighborhood
            .iter()
            .enumerate()
            .filter(|(_, c)| c.y == ymax)
            .map(|(i, c)| (i, c.x))
            .max_by_key(|&(_, x)| x)
            .ok_or(Error::NeighborhoodError)?;
        let max_dx = neighborhood.iter().map(|c| c.x).max().unwrap_or(0).max(0);
        let min_dx = neighborhood.iter().map(|c| c.x).min().unwrap_or(0).min(0);

        let (period, shift) = if config.symmetry.is_glide() {
            (config.period as usize / 2, config.dy as usize / 2)
        } else {
            (config.period as usize, config.dy as usize)
        };
        let reach = ymax as usize * period;
        let feasible = shift <= reach;
        let next_is_new = shift == reach;
        if next_is_new && ux < 0 {
            return Err(Error::NeighborhoodError);
        }
        if next_is_new && config.symmetry.is_glide() {
            return Err(Error::Unsupported("A glide symmetric search at the maximal speed"));
        }

        let inverse = (gcd(shift as isize, period as isize) == 1)
            .then(|| (0..period).find(|&i| i * shift % period == 1 % period))
            .flatten();
        let alternating = rule.alternating_period().max(1);
        if alternating != 1 && (inverse.is_none() || period % alternating != 0) {
            return Err(Error::AlternatingError);
        }
        let convert: Vec<Vec<CellState>> = (0..alternating)
            .map(|g| {
                (0..states as CellState)
                    .map(|s| rule.convert_state(s, g))
                    .collect()
            })
            .collect();
        let identity = convert
            .iter()
            .all(|c| c.iter().enumerate().all(|(s, &t)| s == t as usize));

        let bottom_min = neighborhood
            .iter()
            .enumerate()
            .filter(|&(i, c)| c.y == ymax && i != decided)
            .map(|(_, c)| c.x)
            .min();
        let mut span = bottom_min.map_or(0, |x| ux - x).max(0);
        if next_is_new {
            span = span.max(ux);
        }
        let span = span as usize;
        let powers: Vec<u64> = (0..=span)
            .map(|i| (states as u64).checked_pow(i as u32))
            .collect::<Option<_>>()
            .ok_or(Error::NeighborhoodError)?;
        let modulus = powers[span];

        let n = neighborhood.len();
        let table_size = (states as u64)
            .checked_pow(n as u32 + 1)
            .filter(|&size| size <= usize::MAX as u64 >> 1)
            .ok_or(Error::NeighborhoodError)? as usize;
        let places = (0..n)
            .map(|i| match i.cmp(&decided) {
                std::cmp::Ordering::Less => states.pow(i as u32),
                std::cmp::Ordering::Equal => 0,
                std::cmp::Ordering::Greater => states.pow(i as u32 - 1),
            })
            .collect();

        let mut layout = Layout {
            width: config.width as usize,
            symmetry: config.symmetry,
            states,
            period,
            shift,
            neighborhood,
            decided,
            ux,
            ylo,
            ymax,
            max_dx,
            min_dx,
            pad: (max_dx - min_dx) as usize,
            span,
            modulus,
            powers,
            memo: modulus <= MAX_MEMO_STRIDE,
            places,
            place_state: states.pow(n as u32 - 1),
            place_next: states.pow(n as u32),
            table_size,
            history: 2 * range * period,
            inverse,
            alternating,
            convert,
            identity,
            feasible,
            lookahead: false,
            lookahead_reach: 0,
            lookup_width: 0,
            successor_window: Vec::new(),
            lookahead_window: Vec::new(),
        };
        layout.init_lookahead(config);
        layout.init_lookup_width(config);
        Ok(layout)
    }

    /// Lookahead needs exactly one unknown row: the bottom row of the
    /// window around the centre row `n - shift`.
    fn init_lookahead(&mut self, config: &Config) {
        let reach = self.ymax as usize * self.period;
        let applicable =
            self.shift < reach && (self.ymax as usize - 1) * self.period <= self.shift;
        if config.lookahead && !applicable {
            log::debug!("Lookahead is not applicable to this speed.");
        }
        self.lookahead = config.lookahead && applicable;

        // The candidate row is the next state, and maybe a row of the window.
        let mut reach = -self.ux;
        if self.shift % self.period == 0 {
            let dy = (self.shift / self.period) as i32;
            if let Some(dx) = self
                .neighborhood
                .iter()
                .filter(|c| c.y == dy)
                .map(|c| c.x)
                .max()
            {
                reach = reach.max(dx - self.ux);
            }
        }
        self.lookahead_reach = reach;
    }

    fn init_lookup_width(&mut self, config: &Config) {
        let mut width = config.lookup_table_width.min(self.width - 1);
        if width > 0 && (self.max_dx > self.ux || self.alternating != 1) {
            log::debug!("The neighborhood does not allow lookup tables.");
            width = 0;
        }
        while width > 0 {
            let successor = self.window(width, self.shift < self.ymax as usize * self.period);
            let lookahead = self.window(width, true);
            let fits = |cells: &[(Slot, usize)]| {
                (self.states as u64)
                    .checked_pow(cells.len() as u32)
                    .map_or(false, |size| size <= MAX_PREFIX_ENTRIES as u64)
            };
            if fits(&successor) && (!self.lookahead || fits(&lookahead)) {
                self.successor_window = successor;
                self.lookahead_window = lookahead;
                break;
            }
            width -= 1;
        }
        if width < config.lookup_table_width {
            log::debug!(
                "Lookup table width reduced from {} to {}.",
                config.lookup_table_width,
                width
            );
        }
        self.lookup_width = width;
    }

    /// The key cells read while deciding the first `width` columns.
    fn window(&self, width: usize, next_known: bool) -> Vec<(Slot, usize)> {
        let mut cells = BTreeSet::new();
        for c in 0..width as i32 {
            let x = c - self.ux;
            for coord in self.neighborhood.iter().filter(|c| c.y < self.ymax) {
                if let Some(col) = self.column(x + coord.x) {
                    cells.insert((Slot::Row(coord.y), col));
                }
            }
            if let Some(col) = self.column(x) {
                cells.insert((Slot::Row(0), col));
                if next_known {
                    cells.insert((Slot::Next, col));
                }
            }
        }
        cells.into_iter().collect()
    }

    /// The searched column whose value appears at column `col`.
    pub fn column(&self, col: i32) -> Option<usize> {
        self.symmetry.column(self.width, col)
    }

    pub fn extent(&self) -> usize {
        self.symmetry.extent(self.width)
    }

    /// Pads a searched row to all the columns a key may read.
    pub fn pad_row(&self, row: &[CellState]) -> Vec<CellState> {
        let pad = self.pad as i32;
        (-pad..self.extent() as i32 + pad)
            .map(|col| self.column(col).map_or(0, |col| row[col]))
            .collect()
    }

    /// Centre cells left of the searched columns which are checked
    /// before any column is decided.
    pub fn left_centres(&self) -> RangeInclusive<i32> {
        -self.max_dx..=-self.ux - 1
    }

    /// Centre cells which are checked once the whole row is known.
    pub fn right_centres(&self) -> RangeInclusive<i32> {
        self.width as i32 - self.ux..=self.extent() as i32 - 1 - self.min_dx
    }

    /// Phase of a row within the period, if rows of every phase
    /// appear in a fixed order.
    pub fn phase(&self, index: usize) -> Option<usize> {
        self.inverse
            .map(|inverse| index % self.period * inverse % self.period)
    }

    /// The generation of the rule in which a row evolves.
    pub fn generation(&self, index: usize) -> usize {
        self.phase(index).unwrap_or(0) % self.alternating
    }

    /// Whether the next state of a row is mirrored.
    pub fn mirrors_next(&self, index: usize) -> bool {
        self.symmetry.is_glide() && self.phase(index) == Some(self.period - 1)
    }

    /// Phase used to tell transposed states apart.
    pub fn transposition_phase(&self, index: usize) -> Option<usize> {
        if self.symmetry.is_glide() || self.alternating != 1 {
            self.phase(index)
        } else {
            None
        }
    }

    /// Maps a stored state to the one the rule sees.
    pub fn convert(&self, state: CellState, generation: usize) -> CellState {
        if self.identity {
            state
        } else {
            self.convert[generation % self.alternating][state as usize]
        }
    }

    /// Maps a mask of converted states back to stored states.
    pub fn stored_mask(&self, mask: u32, generation: usize) -> u32 {
        if self.identity {
            return mask;
        }
        (0..self.states as CellState)
            .filter(|&stored| mask >> self.convert(stored, generation) & 1 != 0)
            .fold(0, |result, stored| result | 1 << stored)
    }

    /// Adds a cell to a hash of recent cells.
    pub fn roll(&self, recent: u64, cell: CellState) -> u64 {
        (recent * self.states as u64 + cell as u64) % self.modulus
    }

    /// Reads column `col` of a new row from the hash of the cells before column `c`.
    pub fn recent_cell(&self, recent: u64, c: usize, col: i32) -> CellState {
        if col < 0 {
            return 0;
        }
        let back = c - 1 - col as usize;
        debug_assert!(back < self.span);
        (recent / self.powers[back] % self.states as u64) as CellState
    }
}
