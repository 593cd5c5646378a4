//! The known rows around a centre row.

use super::layout::{Layout, Slot};
use crate::cells::CellState;

/// The known rows around a centre row, padded so that every column a
/// check may read is present, with the symmetry already applied.
#[derive(Clone, Debug)]
pub(crate) struct Key {
    /// Window rows from `ylo` to `ymax - 1`.
    rows: Vec<Vec<CellState>>,
    /// The row the centre row evolves into, unless it is the row being built.
    next: Option<Vec<CellState>>,
    ylo: i32,
    pad: i32,
    /// Generation of the rule in which the centre row evolves.
    pub generation: usize,
}

impl Key {
    /// Builds the key of the centre row with index `centre`.
    ///
    /// `unknown` is the index of the row being built; `fetch` returns
    /// the cells of any other row the key needs.
    pub fn new<'a, F>(layout: &Layout, centre: usize, unknown: usize, fetch: F) -> Self
    where
        F: Fn(usize) -> &'a [CellState],
    {
        let rows = (layout.ylo..layout.ymax)
            .map(|dy| {
                let index = centre as i64 + dy as i64 * layout.period as i64;
                layout.pad_row(fetch(index as usize))
            })
            .collect();
        let next_index = centre + layout.shift;
        let next = (next_index != unknown).then(|| {
            let row = fetch(next_index);
            if layout.mirrors_next(centre) {
                let mirrored: Vec<CellState> = row.iter().rev().copied().collect();
                layout.pad_row(&mirrored)
            } else {
                layout.pad_row(row)
            }
        });
        Key {
            rows,
            next,
            ylo: layout.ylo,
            pad: layout.pad as i32,
            generation: layout.generation(centre),
        }
    }

    /// The cell at column `col` of the row `dy` rows below the centre row.
    pub fn get(&self, dy: i32, col: i32) -> CellState {
        self.rows[(dy - self.ylo) as usize][(col + self.pad) as usize]
    }

    /// The next state of the centre cell at column `col`,
    /// or `None` if it is part of the row being built.
    pub fn next(&self, col: i32) -> Option<CellState> {
        self.next
            .as_ref()
            .map(|next| next[(col + self.pad) as usize])
    }

    pub fn cell(&self, slot: Slot, col: usize) -> CellState {
        match slot {
            Slot::Row(dy) => self.get(dy, col as i32),
            Slot::Next => self.next(col as i32).unwrap_or(0),
        }
    }

    /// Base-`states` number formed by the given cells.
    pub fn window_index(&self, window: &[(Slot, usize)], states: usize) -> usize {
        window
            .iter()
            .rev()
            .fold(0, |index, &(slot, col)| {
                index * states + self.cell(slot, col) as usize
            })
    }
}
