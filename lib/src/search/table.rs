//! Lookup tables, filled in lazily.
//!
//! * The successor table maps a centre cell, its next state and all its
//!   neighbors but the bottom-right one to the bitmask of values that
//!   neighbor may take.
//! * A prefix table maps the key cells read by the first few columns to
//!   every valid assignment of those columns.

use super::{
    key::Key,
    layout::{Layout, Slot},
};
use crate::cells::CellState;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// Marks an entry that has not been computed.
pub(crate) const UNKNOWN: u32 = u32::MAX;

/// Successor tables larger than this are stored in a hash map.
const DENSE_LIMIT: usize = 1 << 22;

enum Masks {
    Dense(Vec<u32>),
    Sparse(HashMap<usize, u32>),
}

/// Table 1: the bitmask of possible values of the bottom-right neighbor.
pub(crate) struct SuccessorTable {
    /// One table for each generation.
    masks: Vec<RefCell<Masks>>,
}

impl SuccessorTable {
    pub fn new(layout: &Layout) -> Self {
        let dense = layout.table_size <= DENSE_LIMIT;
        log::debug!(
            "Successor table: {} entries per generation, {}.",
            layout.table_size,
            if dense { "dense" } else { "sparse" }
        );
        let masks = (0..layout.alternating)
            .map(|_| {
                RefCell::new(if dense {
                    Masks::Dense(vec![UNKNOWN; layout.table_size])
                } else {
                    Masks::Sparse(HashMap::new())
                })
            })
            .collect();
        SuccessorTable { masks }
    }

    /// Looks up an entry, computing it if needed.
    pub fn get<F: FnOnce() -> u32>(&self, generation: usize, index: usize, compute: F) -> u32 {
        let mut masks = self.masks[generation].borrow_mut();
        match &mut *masks {
            Masks::Dense(masks) => {
                if masks[index] == UNKNOWN {
                    masks[index] = compute();
                }
                masks[index]
            }
            Masks::Sparse(masks) => *masks.entry(index).or_insert_with(compute),
        }
    }
}

/// Every valid assignment of the first few columns of a row.
#[derive(Clone, Debug, Default)]
pub(crate) struct Prefixes {
    pub rows: Vec<Box<[CellState]>>,
    /// The deepest column at which a branch died, or `-1`.
    pub failure: i32,
}

/// Tables 2 and 3: prefixes of successor rows and of lookahead rows.
pub(crate) struct PrefixTable {
    window: Vec<(Slot, usize)>,
    states: usize,
    entries: RefCell<Vec<Option<Rc<Prefixes>>>>,
}

impl PrefixTable {
    pub fn new(layout: &Layout, window: Vec<(Slot, usize)>) -> Self {
        let size = layout.states.pow(window.len() as u32);
        PrefixTable {
            window,
            states: layout.states,
            entries: RefCell::new(vec![None; size]),
        }
    }

    /// The prefixes of a key, computing them if needed.
    pub fn get<F: FnOnce() -> Prefixes>(&self, key: &Key, compute: F) -> Rc<Prefixes> {
        let index = key.window_index(&self.window, self.states);
        if let Some(prefixes) = &self.entries.borrow()[index] {
            return Rc::clone(prefixes);
        }
        let prefixes = Rc::new(compute());
        self.entries.borrow_mut()[index] = Some(Rc::clone(&prefixes));
        prefixes
    }

    /// Number of computed entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, error::Error, rules::Life};
    use std::cell::Cell;

    #[test]
    fn entries_are_computed_once() -> Result<(), Error> {
        let layout = Layout::new(&Config::new(4, 2, 1), &"B3/S23".parse::<Life>()?)?;
        let table = SuccessorTable::new(&layout);
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            0b10
        };
        assert_eq!(table.get(0, 7, compute), 0b10);
        assert_eq!(table.get(0, 7, || unreachable!()), 0b10);
        assert_eq!(calls.get(), 1);
        Ok(())
    }
}
