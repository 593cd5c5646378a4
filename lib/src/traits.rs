//! A trait for `ShipSearch`.
use crate::{
    config::Config,
    error::Error,
    rules::Rule,
    search::{ShipSearch, Status},
    ship::Ship,
};
use std::{
    path::Path,
    sync::{atomic::AtomicBool, Arc},
};

/// A trait for `ShipSearch`.
///
/// So that we can switch between different rule types using trait objects.
pub trait Search {
    /// The search function.
    ///
    /// Returns `Found` when a new ship is found,
    /// `Partial` when a partial result is available,
    /// `None` if no more ships exist,
    /// `Stopped` if the stop flag is set,
    /// `Searching` if the number of steps exceeds `max_step`.
    fn search(&mut self, max_step: Option<u64>) -> Status;

    /// Search configuration.
    fn config(&self) -> &Config;

    /// Ships found so far.
    fn ships(&self) -> &[Ship];

    /// The latest partial result.
    fn partial(&self) -> Option<&Ship>;

    /// Number of queued states.
    fn frontier_len(&self) -> usize;

    /// A flag which stops the search when set.
    ///
    /// It can be shared with another thread, e.g. a timer.
    fn stop_flag(&self) -> Arc<AtomicBool>;

    /// Searches until `num` ships are found, the search space is
    /// exhausted, or the search is stopped.
    ///
    /// Partial results are skipped.
    fn search_ships(&mut self, num: usize) -> Status {
        let mut status = Status::Initial;
        let mut found = 0;
        while found < num {
            status = self.search(None);
            match status {
                Status::Found => found += 1,
                Status::Partial => {}
                _ => break,
            }
        }
        status
    }

    /// Searches with several threads.
    ///
    /// Not supported yet.
    fn search_threaded(&mut self, _threads: usize) -> Result<Status, Error> {
        Err(Error::Unsupported("multithreaded search"))
    }

    /// Writes the search state to a file.
    ///
    /// Not supported yet.
    fn write_to_file(&self, _path: &Path) -> Result<(), Error> {
        Err(Error::Unsupported("saving a search"))
    }
}

/// The `Search` trait is implemented for every `ShipSearch`.
impl<R: Rule> Search for ShipSearch<R> {
    fn search(&mut self, max_step: Option<u64>) -> Status {
        self.search(max_step)
    }

    fn config(&self) -> &Config {
        self.config()
    }

    fn ships(&self) -> &[Ship] {
        self.ships()
    }

    fn partial(&self) -> Option<&Ship> {
        self.partial()
    }

    fn frontier_len(&self) -> usize {
        self.frontier_len()
    }

    fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag()
    }
}
