//! __cfind__ is a spaceship searcher for cellular automata,
//! in the style of David Eppstein's gfind.
//!
//! A ship is built one row at a time. Rows of all generations of the
//! period are interleaved, so that each new row is decided by rows that
//! are already known. Each row is built one column at a time, with the
//! help of lookup tables computed from the rule.
//!
//! # Example
//!
//! ```rust
//! use cfind_lib::{Config, Search, Status, Symmetry};
//!
//! // The lightweight spaceship: glide symmetric, period 4, speed c/2.
//! let config = Config::new(5, 4, 2).set_symmetry(Symmetry::GlideSymmetric);
//! let mut search = config.world().unwrap();
//!
//! assert_eq!(search.search_ships(1), Status::Found);
//! assert_eq!(search.ships()[0].population(), 9);
//! ```

mod cells;
mod config;
mod error;
pub mod rules;
mod search;
mod ship;
mod state;
mod traits;

pub use cells::{CellState, Coord, ALIVE, DEAD};
pub use config::{Config, Symmetry};
pub use error::Error;
pub use search::{ShipSearch, Status};
pub use ship::Ship;
pub use state::{Completion, State, TranspositionKey};
pub use traits::Search;
