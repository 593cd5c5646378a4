//! The search.
//!
//! States are expanded breadth-first. When the queue grows too large,
//! every queued state is pushed a few rows deeper by a depth-first search,
//! and states which cannot get that deep are dropped.

mod expand;
mod key;
mod layout;
mod node;
mod table;

use crate::{
    config::Config,
    error::Error,
    rules::Rule,
    ship::Ship,
    state::{Completion, State, TranspositionKey},
};
use expand::Expander;
use layout::Layout;
use lru::LruCache;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::{
    collections::{HashSet, VecDeque},
    num::NonZeroUsize,
    rc::Rc,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A partial result is reported every this many queue pops.
const PARTIAL_INTERVAL: u64 = 15000;

/// Search status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    /// Initial status. Waiting to start.
    Initial,
    /// A new ship is found.
    Found,
    /// A partial result is available.
    Partial,
    /// No more ships exist.
    None,
    /// Still searching.
    Searching,
    /// The search was asked to stop.
    Stopped,
}

/// A depth-first search below one queued state.
struct Dive {
    target: usize,
    stack: Vec<Rc<State>>,
}

/// A round of depth-first deepening over the whole queue.
#[derive(Default)]
struct Deepening {
    pending: VecDeque<Rc<State>>,
    advanced: VecDeque<Rc<State>>,
    dive: Option<Dive>,
    dropped: usize,
}

/// What one step of the search produced.
enum Step {
    Continue,
    Found,
    Partial,
    Exhausted,
}

/// The spaceship search.
pub struct ShipSearch<R: Rule> {
    config: Config,
    expander: Expander<R>,
    /// The breadth-first queue.
    frontier: VecDeque<Rc<State>>,
    deepening: Option<Deepening>,
    transpositions: LruCache<TranspositionKey, ()>,
    ships: Vec<Ship>,
    reported: HashSet<Vec<Vec<u8>>>,
    partial: Option<Ship>,
    pops: u64,
    increment: usize,
    max_depth: Option<usize>,
    rng: Option<StdRng>,
    stop: Arc<AtomicBool>,
    status: Status,
    started: Option<Instant>,
}

impl<R: Rule> ShipSearch<R> {
    /// Creates a new search.
    pub fn new(config: Config, rule: R) -> Result<Self, Error> {
        let layout = Layout::new(&config, &rule)?;
        let seed_depth = layout.history;
        let increment = config
            .min_deepening_increment
            .unwrap_or(layout.period)
            .max(1);
        let max_depth = config.max_length.map(|length| seed_depth + length);
        let rng = config.random_order.then(|| match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        });
        let capacity =
            NonZeroUsize::new(config.transposition_capacity).unwrap_or(NonZeroUsize::MIN);

        let mut frontier = VecDeque::new();
        if layout.feasible {
            frontier.push_back(State::empty(layout.width, seed_depth + 1));
        } else {
            log::warn!(
                "A {}c/{} ship is faster than the rule allows. No ships exist.",
                config.dy,
                config.period
            );
        }
        if config.lookahead && !layout.lookahead {
            log::warn!("Lookahead is disabled for this speed.");
        }
        log::info!(
            "Searching for a width {} {} {}c/{} ship in {}.",
            config.width,
            config.symmetry,
            config.dy,
            config.period,
            config.rule_string
        );

        Ok(ShipSearch {
            expander: Expander::new(rule, layout),
            frontier,
            deepening: None,
            transpositions: LruCache::new(capacity),
            ships: Vec::new(),
            reported: HashSet::new(),
            partial: None,
            pops: 0,
            increment,
            max_depth,
            rng,
            stop: Arc::new(AtomicBool::new(false)),
            status: Status::Initial,
            started: None,
            config,
        })
    }

    /// The search configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ships found so far.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// The latest partial result.
    pub fn partial(&self) -> Option<&Ship> {
        self.partial.as_ref()
    }

    /// Number of queued states, including those in a deepening round.
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
            + self
                .deepening
                .as_ref()
                .map_or(0, |round| round.pending.len() + round.advanced.len())
    }

    /// A flag which stops the search when set.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// The latest status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The search function.
    ///
    /// Returns `Found` when a new ship is found,
    /// `Partial` when a partial result is available,
    /// `None` if no more ships exist,
    /// `Stopped` if the stop flag is set,
    /// `Searching` if the number of steps exceeds `max_step`.
    pub fn search(&mut self, max_step: Option<u64>) -> Status {
        self.started.get_or_insert_with(Instant::now);
        let mut step_count = 0;
        let status = loop {
            if self.stop.load(Ordering::Relaxed) {
                break Status::Stopped;
            }
            if let Some(max) = max_step {
                if step_count >= max {
                    break Status::Searching;
                }
            }
            step_count += 1;
            match self.step() {
                Step::Continue => {}
                Step::Found => break Status::Found,
                Step::Partial => break Status::Partial,
                Step::Exhausted => break Status::None,
            }
        };
        if status == Status::None && self.status != Status::None {
            let elapsed = self.started.map_or(0.0, |start| start.elapsed().as_secs_f64());
            log::info!(
                "Search complete. Took {:.2} seconds, found {} ships.",
                elapsed,
                self.ships.len()
            );
        }
        self.status = status;
        status
    }

    fn step(&mut self) -> Step {
        if self.deepening.is_some() {
            return self.deepen();
        }
        if !self.frontier.is_empty() && self.frontier.len() >= self.config.max_queue_size {
            log::info!(
                "Beginning depth-first deepening, queue size {}.",
                self.frontier.len()
            );
            self.deepening = Some(Deepening {
                pending: std::mem::take(&mut self.frontier),
                ..Deepening::default()
            });
            return Step::Continue;
        }
        let state = if self.config.dfs {
            self.frontier.pop_back()
        } else {
            self.frontier.pop_front()
        };
        let state = match state {
            Some(state) => state,
            None => return Step::Exhausted,
        };
        let idle = self.popped(&state);

        let history = self.expander.layout().history;
        match state.complete_ship(history, self.max_depth) {
            Completion::Complete => {
                return if self.report(&state) {
                    Step::Found
                } else {
                    idle
                }
            }
            Completion::Prune => return idle,
            Completion::Continue => {}
        }
        let phase = self.expander.layout().transposition_phase(state.depth());
        let key = state.transposition_key(history, phase);
        if self.transpositions.put(key, ()).is_none() {
            let children = self.children(&state);
            self.frontier.extend(children);
        }
        idle
    }

    /// Counts a popped state, and keeps it as the partial result when one is due.
    fn popped(&mut self, state: &State) -> Step {
        self.pops += 1;
        if self.should_dump(state, self.pops % PARTIAL_INTERVAL == 0) {
            self.partial = Some(self.ship(state));
            Step::Partial
        } else {
            Step::Continue
        }
    }

    /// One step of a deepening round.
    fn deepen(&mut self) -> Step {
        let mut round = match self.deepening.take() {
            Some(round) => round,
            None => return Step::Continue,
        };
        let step = self.deepen_round(&mut round);
        if round.dive.is_none() && round.pending.is_empty() {
            log::info!(
                "Depth-first deepening complete, {} states dropped, queue size {}.",
                round.dropped,
                round.advanced.len()
            );
            self.frontier = round.advanced;
        } else {
            self.deepening = Some(round);
        }
        step
    }

    fn deepen_round(&mut self, round: &mut Deepening) -> Step {
        let mut dive = match round.dive.take() {
            Some(dive) => dive,
            None => match round.pending.pop_front() {
                Some(state) => Dive {
                    target: state.depth() + self.increment,
                    stack: vec![state],
                },
                None => return Step::Continue,
            },
        };
        let state = match dive.stack.pop() {
            Some(state) => state,
            None => {
                round.dropped += 1;
                return Step::Continue;
            }
        };
        let mut step = self.popped(&state);
        match state.complete_ship(self.expander.layout().history, self.max_depth) {
            Completion::Complete => {
                if self.report(&state) {
                    step = Step::Found;
                }
            }
            Completion::Prune => {}
            Completion::Continue => {
                let children = self.children(&state);
                dive.stack.extend(children);
            }
        }
        if state.depth() >= dive.target {
            round.advanced.extend(dive.stack.drain(..));
        } else {
            round.dive = Some(dive);
        }
        step
    }

    /// Successors of a state, shuffled if required.
    fn children(&mut self, state: &Rc<State>) -> Vec<Rc<State>> {
        let mut children = self.expander.successors(state);
        if let Some(rng) = &mut self.rng {
            children.shuffle(rng);
        }
        children
    }

    fn should_dump(&self, state: &State, periodic: bool) -> bool {
        let phase = self.expander.layout().phase(state.depth());
        !self.config.no_partials
            && phase.map_or(true, |phase| phase == 0)
            && (self.config.verbose || periodic)
    }

    /// Records a complete ship. Returns `false` if it was already found.
    fn report(&mut self, state: &State) -> bool {
        let ship = self.ship(state);
        if !self.reported.insert(ship.cells.clone()) {
            return false;
        }
        log::info!(
            "Found a ship with {} cells in a {}x{} bounding box.",
            ship.population(),
            ship.width(),
            ship.height()
        );
        self.ships.push(ship);
        true
    }

    /// Renders the rows of a state in the first generation of the period.
    fn ship(&self, state: &State) -> Ship {
        let layout = self.expander.layout();
        let depth = state.depth();
        let last = (0..=depth)
            .rev()
            .find(|&index| layout.phase(index).map_or(true, |phase| phase == 0))
            .unwrap_or(depth);
        let rows = state.rows(depth + 1);
        let mut cells: Vec<Vec<u8>> = (0..=last)
            .rev()
            .step_by(layout.period)
            .map(|index| layout.symmetry.expand(rows[depth - index]))
            .collect();
        cells.reverse();
        Ship::new(
            self.config.rule_string.clone(),
            layout.states,
            self.config.period,
            self.config.dy,
            cells,
        )
    }

    /// Number of lookup table entries computed so far.
    pub fn table_entries(&self) -> usize {
        self.expander.prefix_entries()
    }
}
