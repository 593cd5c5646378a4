//! Found ships and their RLE.

use crate::cells::{CellState, DEAD};
use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximal length of a line of RLE.
const LINE_WIDTH: usize = 70;

/// A ship, or a partial result, in one generation.
///
/// Empty border rows and columns are trimmed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ship {
    /// The rule string of the cellular automaton.
    pub rule_string: String,
    /// Number of states of the rule.
    pub states: usize,
    /// Period.
    pub period: isize,
    /// Vertical displacement per period.
    pub dy: isize,
    /// Rows of cells, from top to bottom.
    pub cells: Vec<Vec<CellState>>,
}

impl Ship {
    /// Creates a ship from its rows, trimming empty borders.
    pub fn new(
        rule_string: String,
        states: usize,
        period: isize,
        dy: isize,
        rows: Vec<Vec<CellState>>,
    ) -> Self {
        let nonempty = |row: &Vec<CellState>| row.iter().any(|&cell| cell != DEAD);
        let top = rows.iter().position(nonempty);
        let bottom = rows.iter().rposition(nonempty);
        let cells = match (top, bottom) {
            (Some(top), Some(bottom)) => {
                let rows = &rows[top..=bottom];
                let left = rows
                    .iter()
                    .filter_map(|row| row.iter().position(|&cell| cell != DEAD))
                    .min()
                    .unwrap_or(0);
                let right = rows
                    .iter()
                    .filter_map(|row| row.iter().rposition(|&cell| cell != DEAD))
                    .max()
                    .unwrap_or(0);
                rows.iter().map(|row| row[left..=right].to_vec()).collect()
            }
            _ => Vec::new(),
        };
        Ship {
            rule_string,
            states,
            period,
            dy,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells which are not dead.
    pub fn population(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell != DEAD)
            .count()
    }

    /// The ship in [RLE](https://conwaylife.com/wiki/Rle) format.
    ///
    /// * **Dead** cells are represented by `b` for rules with 2 states,
    ///   `.` for rules with more states;
    /// * **Living** cells are represented by `o` for rules with 2 states,
    ///   `A` for rules with more states;
    /// * **Dying** cells are represented by uppercase letters starting from `B`.
    pub fn rle(&self) -> String {
        let mut writer = RleWriter::default();
        writer.out = format!(
            "x = {}, y = {}, rule = {}\n",
            self.width(),
            self.height(),
            self.rule_string
        );
        let mut pending_rows = 0;
        for (y, row) in self.cells.iter().enumerate() {
            if y > 0 {
                pending_rows += 1;
            }
            let mut runs: Vec<(CellState, usize)> = Vec::new();
            for &cell in row {
                match runs.last_mut() {
                    Some((state, count)) if *state == cell => *count += 1,
                    _ => runs.push((cell, 1)),
                }
            }
            if runs.last().map_or(false, |&(state, _)| state == DEAD) {
                runs.pop();
            }
            if runs.is_empty() {
                continue;
            }
            if pending_rows > 0 {
                writer.push(pending_rows, "$");
                pending_rows = 0;
            }
            for (state, count) in runs {
                writer.push(count, &self.symbol(state));
            }
        }
        writer.push(1, "!");
        writer.finish()
    }

    fn symbol(&self, state: CellState) -> String {
        let state = state as usize;
        if self.states == 2 {
            return String::from(if state == 0 { "b" } else { "o" });
        }
        match state {
            0 => String::from("."),
            1..=24 => ((b'A' + state as u8 - 1) as char).to_string(),
            _ => {
                let prefix = (b'p' + ((state - 25) / 24) as u8) as char;
                let letter = (b'A' + ((state - 25) % 24) as u8) as char;
                format!("{}{}", prefix, letter)
            }
        }
    }
}

impl Display for Ship {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.rle())
    }
}

#[derive(Default)]
struct RleWriter {
    out: String,
    line: String,
}

impl RleWriter {
    fn push(&mut self, count: usize, symbol: &str) {
        let token = if count > 1 {
            format!("{}{}", count, symbol)
        } else {
            symbol.to_string()
        };
        if self.line.len() + token.len() > LINE_WIDTH {
            self.out.push_str(&self.line);
            self.out.push('\n');
            self.line.clear();
        }
        self.line.push_str(&token);
    }

    fn finish(mut self) -> String {
        self.out.push_str(&self.line);
        self.out.push('\n');
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship(states: usize, rows: Vec<Vec<CellState>>) -> Ship {
        Ship::new(String::from("B3/S23"), states, 4, 2, rows)
    }

    #[test]
    fn trims_borders() {
        let ship = ship(
            2,
            vec![
                vec![0, 0, 0, 0],
                vec![0, 1, 0, 0],
                vec![0, 0, 1, 0],
                vec![0, 0, 0, 0],
            ],
        );
        assert_eq!(ship.cells, vec![vec![1, 0], vec![0, 1]]);
        assert_eq!((ship.width(), ship.height(), ship.population()), (2, 2, 2));
    }

    #[test]
    fn glider_rle() {
        let ship = ship(2, vec![vec![0, 1, 0], vec![0, 0, 1], vec![1, 1, 1]]);
        assert_eq!(ship.rle(), "x = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n");
    }

    #[test]
    fn blank_lines_and_states() {
        let ship = ship(
            3,
            vec![vec![1, 1, 0], vec![0, 0, 0], vec![0, 0, 0], vec![2, 0, 2]],
        );
        assert_eq!(ship.rle(), "x = 3, y = 4, rule = B3/S23\n2A3$B.B!\n");
    }

    #[test]
    fn empty_ship() {
        let ship = ship(2, vec![vec![0, 0]]);
        assert_eq!(ship.rle(), "x = 0, y = 0, rule = B3/S23\n!\n");
    }

    #[test]
    fn long_lines_wrap() {
        let row: Vec<CellState> = (0..100).map(|i| (i % 2) as CellState).collect();
        let rle = ship(2, vec![row]).rle();
        assert!(rle.lines().all(|line| line.len() <= LINE_WIDTH));
        assert!(rle.ends_with("!\n"));
    }
}
