//! Symmetries of the searched ships.
//!
//! Only the left `width` columns of a ship are searched. The symmetry
//! says what lies to the right of them.

use crate::cells::CellState;
use educe::Educe;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Symmetries of the searched ships.
///
/// The ship travels vertically; the axis of every symmetry is vertical.
#[derive(Clone, Copy, Debug, Educe, PartialEq, Eq, Hash)]
#[educe(Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Symmetry {
    /// No symmetry. Everything right of the searched columns is dead.
    #[educe(Default)]
    #[cfg_attr(feature = "serde", serde(rename = "asymmetric"))]
    Asymmetric,
    /// Mirror symmetry with an even total width.
    ///
    /// The searched columns are reflected across their right edge.
    #[cfg_attr(feature = "serde", serde(rename = "even"))]
    EvenSymmetric,
    /// Mirror symmetry with an odd total width.
    ///
    /// The right-most searched column is the axis.
    #[cfg_attr(feature = "serde", serde(rename = "odd"))]
    OddSymmetric,
    /// Mirror symmetry about an empty column.
    ///
    /// The column right of the searched columns stays dead,
    /// and the searched columns are reflected across it.
    #[cfg_attr(feature = "serde", serde(rename = "gutter"))]
    GutterSymmetric,
    /// Glide reflection.
    ///
    /// After half a period the ship becomes its own mirror image,
    /// moved by half the displacement. Requires an even period
    /// and an even displacement.
    #[cfg_attr(feature = "serde", serde(rename = "glide"))]
    GlideSymmetric,
}

impl FromStr for Symmetry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asymmetric" | "a" | "0" => Ok(Symmetry::Asymmetric),
            "even" | "e" | "1" => Ok(Symmetry::EvenSymmetric),
            "odd" | "o" | "2" => Ok(Symmetry::OddSymmetric),
            "gutter" | "g" | "3" => Ok(Symmetry::GutterSymmetric),
            "glide" | "4" => Ok(Symmetry::GlideSymmetric),
            _ => Err(String::from("invalid symmetry")),
        }
    }
}

impl Display for Symmetry {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        let s = match self {
            Symmetry::Asymmetric => "asymmetric",
            Symmetry::EvenSymmetric => "even",
            Symmetry::OddSymmetric => "odd",
            Symmetry::GutterSymmetric => "gutter",
            Symmetry::GlideSymmetric => "glide",
        };
        write!(f, "{}", s)?;
        Ok(())
    }
}

impl Symmetry {
    /// Whether this is a glide reflection.
    pub fn is_glide(self) -> bool {
        self == Symmetry::GlideSymmetric
    }

    /// The number of columns a row occupies once expanded,
    /// including the searched ones.
    pub fn extent(self, width: usize) -> usize {
        match self {
            Symmetry::Asymmetric | Symmetry::GlideSymmetric => width,
            Symmetry::EvenSymmetric => 2 * width,
            Symmetry::OddSymmetric => 2 * width - 1,
            Symmetry::GutterSymmetric => 2 * width + 1,
        }
    }

    /// The searched column whose value appears at column `col`,
    /// or `None` if that column is always dead.
    pub fn column(self, width: usize, col: i32) -> Option<usize> {
        let w = width as i32;
        if col < 0 {
            return None;
        }
        if col < w {
            return Some(col as usize);
        }
        let mirror = match self {
            Symmetry::Asymmetric | Symmetry::GlideSymmetric => return None,
            Symmetry::EvenSymmetric => 2 * w - 1 - col,
            Symmetry::OddSymmetric => 2 * w - 2 - col,
            Symmetry::GutterSymmetric if col == w => return None,
            Symmetry::GutterSymmetric => 2 * w - col,
        };
        (mirror >= 0).then_some(mirror as usize)
    }

    /// Expands a searched row to its full extent.
    pub fn expand(self, row: &[CellState]) -> Vec<CellState> {
        let width = row.len();
        (0..self.extent(width) as i32)
            .map(|col| self.column(width, col).map_or(0, |col| row[col]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        for symmetry in [
            Symmetry::Asymmetric,
            Symmetry::EvenSymmetric,
            Symmetry::OddSymmetric,
            Symmetry::GutterSymmetric,
            Symmetry::GlideSymmetric,
        ] {
            assert_eq!(symmetry.to_string().parse(), Ok(symmetry));
        }
        assert_eq!("2".parse(), Ok(Symmetry::OddSymmetric));
        assert!("diagonal".parse::<Symmetry>().is_err());
    }

    #[test]
    fn expansion() {
        let row = [1, 2, 3];
        assert_eq!(Symmetry::Asymmetric.expand(&row), vec![1, 2, 3]);
        assert_eq!(Symmetry::GlideSymmetric.expand(&row), vec![1, 2, 3]);
        assert_eq!(Symmetry::EvenSymmetric.expand(&row), vec![1, 2, 3, 3, 2, 1]);
        assert_eq!(Symmetry::OddSymmetric.expand(&row), vec![1, 2, 3, 2, 1]);
        assert_eq!(
            Symmetry::GutterSymmetric.expand(&row),
            vec![1, 2, 3, 0, 3, 2, 1]
        );
    }

    #[test]
    fn columns_beyond_the_mirror_are_dead() {
        assert_eq!(Symmetry::EvenSymmetric.column(3, 6), None);
        assert_eq!(Symmetry::OddSymmetric.column(3, 5), None);
        assert_eq!(Symmetry::GutterSymmetric.column(3, 3), None);
        assert_eq!(Symmetry::GutterSymmetric.column(3, 7), None);
        assert_eq!(Symmetry::EvenSymmetric.column(3, -1), None);
    }
}
