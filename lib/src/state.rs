//! Rows of a partially built ship.

use crate::cells::{CellState, DEAD};
use std::rc::Rc;

/// One row of a partially built ship, together with all the rows before it.
///
/// Rows are shared between their successors, so the states of a search
/// form a tree rooted at a run of empty rows.
#[derive(Debug)]
pub struct State {
    cells: Box<[CellState]>,
    predecessor: Option<Rc<State>>,
    /// Index of this row. The first row has depth `0`.
    depth: usize,
    /// Whether this row or any earlier row has a nonzero cell.
    nonempty_history: bool,
}

/// What to do with a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The ship is finished.
    Complete,
    /// The state leads nowhere interesting.
    Prune,
    /// Keep extending the state.
    Continue,
}

/// The part of a state which decides all its extensions.
///
/// Two states with equal keys have the same successors, so only one
/// of them needs to be expanded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TranspositionKey(Box<[CellState]>);

impl State {
    /// A run of `rows` empty rows.
    pub fn empty(width: usize, rows: usize) -> Rc<Self> {
        let mut state = Rc::new(State {
            cells: vec![DEAD; width].into(),
            predecessor: None,
            depth: 0,
            nonempty_history: false,
        });
        for _ in 1..rows {
            state = State::new(state, vec![DEAD; width].into());
        }
        state
    }

    /// Appends a row to a state.
    pub fn new(predecessor: Rc<State>, cells: Box<[CellState]>) -> Rc<Self> {
        let depth = predecessor.depth + 1;
        let nonempty_history =
            predecessor.nonempty_history || cells.iter().any(|&cell| cell != DEAD);
        Rc::new(State {
            cells,
            predecessor: Some(predecessor),
            depth,
            nonempty_history,
        })
    }

    /// Cells of this row.
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Index of this row.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The previous row.
    pub fn predecessor(&self) -> Option<&Rc<State>> {
        self.predecessor.as_ref()
    }

    /// Whether every cell of this row is dead.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| cell == DEAD)
    }

    /// The row `n` rows before this one.
    pub fn ancestor(&self, n: usize) -> Option<&State> {
        let mut state = self;
        for _ in 0..n {
            state = state.predecessor.as_deref()?;
        }
        Some(state)
    }

    /// The cells of the last `n` rows, from this one backwards.
    ///
    /// Stops early at the first row.
    pub fn rows(&self, n: usize) -> Vec<&[CellState]> {
        let mut rows = Vec::with_capacity(n);
        let mut state = Some(self);
        while let Some(current) = state {
            if rows.len() == n {
                break;
            }
            rows.push(current.cells());
            state = current.predecessor.as_deref();
        }
        rows
    }

    /// Decides whether the ship ending at this row is finished.
    ///
    /// * [`Complete`](Completion::Complete): the last `n` rows are empty,
    ///   the state is deeper than `n`, and some earlier row is not empty.
    /// * [`Prune`](Completion::Prune): every row is empty and the state
    ///   is deeper than `n`, or the state is deeper than `max_depth`.
    /// * [`Continue`](Completion::Continue): otherwise.
    pub fn complete_ship(&self, n: usize, max_depth: Option<usize>) -> Completion {
        if !self.nonempty_history {
            return if self.depth > n {
                Completion::Prune
            } else {
                Completion::Continue
            };
        }
        let rows = self.rows(n);
        if self.depth > n
            && rows.len() == n
            && rows.iter().all(|row| row.iter().all(|&cell| cell == DEAD))
        {
            return Completion::Complete;
        }
        match max_depth {
            Some(max_depth) if self.depth > max_depth => Completion::Prune,
            _ => Completion::Continue,
        }
    }

    /// The transposition key of the last `n` rows, tagged with `phase`.
    pub fn transposition_key(&self, n: usize, phase: Option<usize>) -> TranspositionKey {
        let mut key: Vec<CellState> = self.rows(n).concat();
        if let Some(phase) = phase {
            key.extend((phase as u32).to_le_bytes());
        }
        TranspositionKey(key.into())
    }
}

/// Long chains are dropped iteratively.
impl Drop for State {
    fn drop(&mut self) {
        let mut predecessor = self.predecessor.take();
        while let Some(state) = predecessor {
            match Rc::try_unwrap(state) {
                Ok(mut state) => predecessor = state.predecessor.take(),
                Err(_) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(state: Rc<State>, cells: &[CellState]) -> Rc<State> {
        State::new(state, cells.into())
    }

    #[test]
    fn ancestors() {
        let mut state = State::empty(3, 2);
        state = push(state, &[0, 1, 0]);
        state = push(state, &[1, 1, 0]);
        assert_eq!(state.depth(), 3);
        assert_eq!(state.ancestor(1).map(State::cells), Some(&[0, 1, 0][..]));
        assert_eq!(state.ancestor(3).map(State::depth), Some(0));
        assert!(state.ancestor(4).is_none());
        assert_eq!(state.rows(2), vec![&[1, 1, 0][..], &[0, 1, 0][..]]);
        assert_eq!(state.rows(10).len(), 4);
    }

    #[test]
    fn completion() {
        let seed = State::empty(2, 3);
        assert_eq!(seed.complete_ship(2, None), Completion::Continue);
        let trivial = push(seed.clone(), &[0, 0]);
        assert_eq!(trivial.complete_ship(2, None), Completion::Prune);

        let mut state = push(seed, &[1, 1]);
        assert_eq!(state.complete_ship(2, None), Completion::Continue);
        assert_eq!(state.complete_ship(2, Some(2)), Completion::Prune);
        state = push(state, &[0, 0]);
        assert_eq!(state.complete_ship(2, None), Completion::Continue);
        state = push(state, &[0, 0]);
        assert_eq!(state.complete_ship(2, None), Completion::Complete);
    }

    #[test]
    fn transpositions() {
        let seed = State::empty(2, 3);
        let a = push(push(seed.clone(), &[1, 0]), &[0, 1]);
        let b = push(push(push(seed, &[1, 1]), &[1, 0]), &[0, 1]);
        assert_eq!(a.transposition_key(2, None), b.transposition_key(2, None));
        assert_ne!(a.transposition_key(3, None), b.transposition_key(3, None));
        assert_ne!(
            a.transposition_key(2, Some(0)),
            b.transposition_key(2, Some(1))
        );
    }

    #[test]
    fn long_chains_drop() {
        let mut state = State::empty(1, 1);
        for _ in 0..200_000 {
            state = push(state, &[1]);
        }
        assert_eq!(state.depth(), 200_000);
        drop(state);
    }
}
