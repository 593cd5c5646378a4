//! Successor rows and lookahead.

use super::{
    key::Key,
    layout::{Layout, MAX_NEIGHBORS},
    node::{Arena, NO_PARENT},
    table::{PrefixTable, Prefixes, SuccessorTable, UNKNOWN},
};
use crate::{
    cells::{CellState, DEAD},
    rules::Rule,
    state::State,
};
use std::rc::Rc;

/// What to do after a full row is visited.
enum Flow {
    Continue,
    /// Skips every later row sharing the first `n` columns with this one.
    /// `Skip(0)` ends the enumeration.
    Skip(usize),
    Stop,
}

struct Outcome {
    /// Whether the visitor stopped the enumeration.
    stopped: bool,
    /// The deepest column at which a branch died, `-1` if none died,
    /// `i32::MAX` if a full row failed a boundary check.
    failure: i32,
}

/// Memoized masks of each `(depth, recent)` pair within one enumeration.
struct Memo {
    masks: Vec<u32>,
    visited: Vec<bool>,
    stride: usize,
}

impl Memo {
    fn new(layout: &Layout, limit: usize, visited: bool) -> Option<Self> {
        layout.memo.then(|| {
            let stride = layout.modulus as usize;
            let size = (limit + 1) * stride;
            Memo {
                masks: vec![UNKNOWN; size],
                visited: if visited { vec![false; size] } else { Vec::new() },
                stride,
            }
        })
    }

    fn slot(&self, depth: u32, recent: u64) -> usize {
        depth as usize * self.stride + recent as usize
    }

    /// Marks a pair as visited, returning whether it had been visited before.
    fn visit(&mut self, depth: u32, recent: u64) -> bool {
        if self.visited.is_empty() {
            return false;
        }
        let slot = self.slot(depth, recent);
        std::mem::replace(&mut self.visited[slot], true)
    }

    /// Removes the value of a dead node from its parent's mask,
    /// and so on up the chain while masks become empty.
    fn propagate(&mut self, arena: &Arena, mut id: u32) {
        loop {
            let node = arena[id];
            if node.parent == NO_PARENT {
                return;
            }
            let parent = arena[node.parent];
            let slot = self.slot(parent.depth, parent.recent);
            if self.masks[slot] == UNKNOWN {
                return;
            }
            self.masks[slot] &= !(1 << node.cell);
            if self.masks[slot] != 0 {
                return;
            }
            id = node.parent;
        }
    }
}

/// Generates successor rows for one rule and layout.
pub(crate) struct Expander<R: Rule> {
    rule: R,
    layout: Layout,
    table: SuccessorTable,
    successor_prefixes: Option<PrefixTable>,
    lookahead_prefixes: Option<PrefixTable>,
}

impl<R: Rule> Expander<R> {
    pub fn new(rule: R, layout: Layout) -> Self {
        let table = SuccessorTable::new(&layout);
        let (successor_prefixes, lookahead_prefixes) = if layout.lookup_width > 0 {
            (
                Some(PrefixTable::new(&layout, layout.successor_window.clone())),
                layout
                    .lookahead
                    .then(|| PrefixTable::new(&layout, layout.lookahead_window.clone())),
            )
        } else {
            (None, None)
        };
        Expander {
            rule,
            layout,
            table,
            successor_prefixes,
            lookahead_prefixes,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Number of computed prefix table entries.
    pub fn prefix_entries(&self) -> usize {
        self.successor_prefixes.as_ref().map_or(0, PrefixTable::len)
            + self.lookahead_prefixes.as_ref().map_or(0, PrefixTable::len)
    }

    /// Every row that can follow `state`, in enumeration order.
    pub fn successors(&self, state: &Rc<State>) -> Vec<Rc<State>> {
        let layout = &self.layout;
        let n = state.depth() + 1;
        let centre = n - layout.ymax as usize * layout.period;
        let rows = state.rows(layout.history);
        let key = Key::new(layout, centre, n, |index| rows[n - 1 - index]);
        if !self.left_boundary(&key) {
            return Vec::new();
        }
        let prefixes = self.prefixes(self.successor_prefixes.as_ref(), &key);
        if prefixes.as_ref().map_or(false, |p| p.rows.is_empty()) {
            return Vec::new();
        }

        let mut children = Vec::new();
        self.enumerate(&key, layout.width, false, prefixes.as_deref(), |row| {
            if layout.lookahead {
                if let Err(failure) = self.lookahead(&rows, n, row) {
                    return self.skip_after(failure);
                }
            }
            children.push(State::new(Rc::clone(state), row.into()));
            Flow::Continue
        });
        children
    }

    /// Checks that a candidate for row `n` can be followed by one more row.
    ///
    /// On failure, returns the deepest column of the future row at which
    /// the search failed.
    fn lookahead(&self, rows: &[&[CellState]], n: usize, candidate: &[CellState]) -> Result<(), i32> {
        let layout = &self.layout;
        let centre = n - layout.shift;
        let unknown = centre + layout.ymax as usize * layout.period;
        let key = Key::new(layout, centre, unknown, |index| {
            if index == n {
                candidate
            } else {
                rows[n - 1 - index]
            }
        });
        if !self.left_boundary(&key) {
            return Err(-1);
        }
        let prefixes = self.prefixes(self.lookahead_prefixes.as_ref(), &key);
        if let Some(prefixes) = &prefixes {
            if prefixes.rows.is_empty() {
                return Err(prefixes.failure);
            }
        }
        let outcome = self.enumerate(&key, layout.width, true, prefixes.as_deref(), |_| Flow::Stop);
        if outcome.stopped {
            Ok(())
        } else {
            Err(outcome.failure)
        }
    }

    /// Turns a lookahead failure into the number of leading columns of the
    /// candidate which caused it.
    fn skip_after(&self, failure: i32) -> Flow {
        if failure == i32::MAX {
            return Flow::Continue;
        }
        let columns = failure + self.layout.lookahead_reach + 1;
        if columns <= 0 {
            Flow::Skip(0)
        } else if columns as usize >= self.layout.width {
            Flow::Continue
        } else {
            Flow::Skip(columns as usize)
        }
    }

    fn prefixes(&self, table: Option<&PrefixTable>, key: &Key) -> Option<Rc<Prefixes>> {
        let width = self.layout.lookup_width;
        table.map(|table| {
            table.get(key, || {
                let mut rows = Vec::new();
                let outcome = self.enumerate(key, width, false, None, |row| {
                    rows.push(row.into());
                    Flow::Continue
                });
                Prefixes {
                    rows,
                    failure: outcome.failure,
                }
            })
        })
    }

    /// Depth-first search over the first `limit` columns of a row.
    ///
    /// Full rows are passed to `visit`. With `probe`, the same partial
    /// row is never explored twice; this is only used when the result of
    /// a probe does not depend on which of them leads to a full row.
    fn enumerate<F>(
        &self,
        key: &Key,
        limit: usize,
        probe: bool,
        seeds: Option<&Prefixes>,
        mut visit: F,
    ) -> Outcome
    where
        F: FnMut(&[CellState]) -> Flow,
    {
        let layout = &self.layout;
        let full = limit == layout.width;
        let visited = probe && layout.extent() == layout.width;
        let mut memo = Memo::new(layout, limit, visited);
        let mut arena = Arena::default();
        let mut stack = Vec::new();
        let mut failure = -1;
        match seeds {
            None => stack.push(arena.root()),
            Some(prefixes) => {
                failure = prefixes.failure.max(layout.lookup_width as i32 - 1);
                for prefix in prefixes.rows.iter().rev() {
                    let mut id = NO_PARENT;
                    let mut recent = 0;
                    for (depth, &cell) in prefix.iter().enumerate() {
                        recent = layout.roll(recent, cell);
                        id = arena.push(id, depth as u32 + 1, cell, recent);
                    }
                    stack.push(id);
                }
            }
        }

        let mut row = vec![DEAD; limit];
        let mut skip: Option<(u32, u32)> = None;
        while let Some(id) = stack.pop() {
            let node = arena[id];
            if let Some((depth, anchor)) = skip {
                if node.depth > depth && arena.ancestor(id, depth) == anchor {
                    continue;
                }
                skip = None;
            }
            if let Some(memo) = &mut memo {
                if memo.visit(node.depth, node.recent) {
                    continue;
                }
            }

            if node.depth as usize == limit {
                arena.fill(id, &mut row);
                if full && !self.right_boundary(key, &row) {
                    failure = i32::MAX;
                    continue;
                }
                match visit(&row) {
                    Flow::Continue => {}
                    Flow::Stop => {
                        return Outcome {
                            stopped: true,
                            failure,
                        }
                    }
                    Flow::Skip(0) => {
                        return Outcome {
                            stopped: false,
                            failure,
                        }
                    }
                    Flow::Skip(depth) => {
                        let depth = depth as u32;
                        skip = Some((depth, arena.ancestor(id, depth)));
                    }
                }
                continue;
            }

            let mask = match &mut memo {
                Some(memo) => {
                    let slot = memo.slot(node.depth, node.recent);
                    if memo.masks[slot] == UNKNOWN {
                        memo.masks[slot] = self.column_mask(key, node.depth as usize, node.recent);
                    }
                    memo.masks[slot]
                }
                None => self.column_mask(key, node.depth as usize, node.recent),
            };
            if mask == 0 {
                failure = failure.max(node.depth as i32);
                if let Some(memo) = &mut memo {
                    memo.propagate(&arena, id);
                }
                continue;
            }
            for value in (0..layout.states as CellState).rev() {
                if mask >> value & 1 != 0 {
                    let recent = layout.roll(node.recent, value);
                    stack.push(arena.push(id, node.depth + 1, value, recent));
                }
            }
        }
        Outcome {
            stopped: false,
            failure,
        }
    }

    /// The values column `c` of the new row may take, given the columns before it.
    fn column_mask(&self, key: &Key, c: usize, recent: u64) -> u32 {
        let layout = &self.layout;
        let x = c as i32 - layout.ux;
        let new = |col: i32| layout.recent_cell(recent, c, col);
        let mut neighbors = [DEAD; MAX_NEIGHBORS];
        let neighbors = &mut neighbors[..layout.neighborhood.len()];
        let (index, state) = self.base_index(key, x, &new, neighbors);
        let generation = key.generation;
        match key.next(x) {
            Some(next) => {
                let mask = self.table_mask(index, state, next, neighbors, generation);
                layout.stored_mask(mask, generation)
            }
            None if layout.ux > 0 => {
                let mask = self.table_mask(index, state, new(x), neighbors, generation);
                layout.stored_mask(mask, generation)
            }
            // The new cell is both the bottom-right neighbor and the next state.
            None => (0..layout.states as CellState)
                .filter(|&value| {
                    let mask = self.table_mask(index, state, value, neighbors, generation);
                    mask >> layout.convert(value, generation) & 1 != 0
                })
                .fold(0, |mask, value| mask | 1 << value),
        }
    }

    /// Index into the successor table of the centre cell at `x`,
    /// without the next state, and the converted state of the centre cell.
    ///
    /// Cells of the new row are read through `new`.
    fn base_index<F>(
        &self,
        key: &Key,
        x: i32,
        new: &F,
        neighbors: &mut [CellState],
    ) -> (usize, CellState)
    where
        F: Fn(i32) -> CellState,
    {
        let layout = &self.layout;
        let generation = key.generation;
        let mut index = 0;
        for (i, coord) in layout.neighborhood.iter().enumerate() {
            if i == layout.decided {
                continue;
            }
            let stored = if coord.y == layout.ymax {
                new(x + coord.x)
            } else {
                key.get(coord.y, x + coord.x)
            };
            let state = layout.convert(stored, generation);
            neighbors[i] = state;
            index += state as usize * layout.places[i];
        }
        let state = layout.convert(key.get(0, x), generation);
        (index + state as usize * layout.place_state, state)
    }

    /// Looks up the successor table. `next` is a stored state.
    fn table_mask(
        &self,
        index: usize,
        state: CellState,
        next: CellState,
        neighbors: &mut [CellState],
        generation: usize,
    ) -> u32 {
        let layout = &self.layout;
        let next = layout.convert(next, generation + 1);
        let index = index + next as usize * layout.place_next;
        self.table.get(generation, index, || {
            self.rule
                .successor_mask(neighbors, layout.decided, state, next, generation)
        })
    }

    /// Checks the centre cell at `x`, with every cell known.
    fn satisfied<F>(&self, key: &Key, x: i32, new: &F) -> bool
    where
        F: Fn(i32) -> CellState,
    {
        let layout = &self.layout;
        let mut neighbors = [DEAD; MAX_NEIGHBORS];
        let neighbors = &mut neighbors[..layout.neighborhood.len()];
        let (index, state) = self.base_index(key, x, new, neighbors);
        let next = key.next(x).unwrap_or_else(|| new(x));
        let generation = key.generation;
        let mask = self.table_mask(index, state, next, neighbors, generation);
        let decided = layout.convert(new(x + layout.ux), generation);
        mask >> decided & 1 != 0
    }

    /// Checks the centre cells left of the searched columns whose
    /// neighbors in the new row are all dead.
    fn left_boundary(&self, key: &Key) -> bool {
        self.layout
            .left_centres()
            .all(|x| self.satisfied(key, x, &|_| DEAD))
    }

    /// Checks the centre cells which could not be checked while the row
    /// was being built.
    fn right_boundary(&self, key: &Key, row: &[CellState]) -> bool {
        let layout = &self.layout;
        let padded = layout.pad_row(row);
        let pad = layout.pad as i32;
        let new = |col: i32| padded[(col + pad) as usize];
        layout
            .right_centres()
            .all(|x| self.satisfied(key, x, &new))
    }
}
