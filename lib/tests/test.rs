use cfind_lib::{
    rules::{Life, LifeGen, Rule},
    CellState, Coord, Config, Error, Search, Ship, Status, Symmetry, DEAD,
};
use std::{error, path::Path, sync::atomic::Ordering};

/// Runs the cells for some generations, and trims the result.
///
/// Cells outside the grid are background.
fn evolve<R: Rule>(rule: &R, ship: &Ship, generations: usize) -> Vec<Vec<CellState>> {
    let margin = generations as i32 + 2;
    let height = ship.height() as i32 + 2 * margin;
    let width = ship.width() as i32 + 2 * margin;
    let mut grid = vec![vec![0; width as usize]; height as usize];
    for (y, row) in ship.cells.iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            grid[y + margin as usize][x + margin as usize] = cell;
        }
    }
    for generation in 0..generations {
        let background = rule.convert_state(DEAD, generation);
        let get = |x: i32, y: i32| {
            if (0..width).contains(&x) && (0..height).contains(&y) {
                grid[y as usize][x as usize]
            } else {
                background
            }
        };
        let next: Vec<Vec<CellState>> = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| {
                        let neighbors: Vec<CellState> = rule
                            .neighborhood()
                            .iter()
                            .map(|coord| get(x + coord.x, y + coord.y))
                            .collect();
                        rule.transition(&neighbors, get(x, y), generation)
                    })
                    .collect::<Vec<CellState>>()
            })
            .collect();
        grid = next;
    }
    Ship::new(String::new(), ship.states, ship.period, ship.dy, grid).cells
}

#[test]
fn brians_brain() -> Result<(), Box<dyn error::Error>> {
    let config = Config::new(2, 1, 1).set_rule_string("B2/S/C3");
    let mut search = config.world()?;
    assert_eq!(search.search(None), Status::Found);
    assert_eq!(
        search.ships()[0].rle(),
        String::from("x = 2, y = 2, rule = B2/S/C3\n2A$2B!\n")
    );
    assert_eq!(search.search(None), Status::None);
    assert_eq!(search.ships().len(), 1);
    Ok(())
}

#[test]
fn brians_brain_even() -> Result<(), Box<dyn error::Error>> {
    let config = Config::new(1, 1, 1)
        .set_rule_string("B2/S/C3")
        .set_symmetry(Symmetry::EvenSymmetric);
    let mut search = config.world()?;
    assert_eq!(search.search(None), Status::Found);
    assert_eq!(search.ships()[0].cells, vec![vec![1, 1], vec![2, 2]]);
    Ok(())
}

#[test]
fn brians_brain_odd() -> Result<(), Box<dyn error::Error>> {
    let config = Config::new(1, 1, 1)
        .set_rule_string("B2/S/C3")
        .set_symmetry(Symmetry::OddSymmetric);
    let mut search = config.world()?;
    assert_eq!(search.search(None), Status::None);
    assert!(search.ships().is_empty());
    Ok(())
}

#[test]
fn even_rows_are_palindromes() -> Result<(), Box<dyn error::Error>> {
    let rule = LifeGen::new(vec![2], vec![], 3);
    let config = Config::new(2, 1, 1).set_symmetry(Symmetry::EvenSymmetric);
    let mut search = config.ship_search(rule.clone())?;
    assert_eq!(search.search(None), Status::Found);
    let ship = &search.ships()[0];
    for row in &ship.cells {
        let reversed: Vec<CellState> = row.iter().rev().copied().collect();
        assert_eq!(row, &reversed);
    }
    assert_eq!(evolve(&rule, ship, 1), ship.cells);
    Ok(())
}

#[test]
fn lwss() -> Result<(), Box<dyn error::Error>> {
    let config = Config::new(5, 4, 2).set_symmetry(Symmetry::GlideSymmetric);
    let mut search = config.world()?;
    assert_eq!(search.search_ships(1), Status::Found);
    let ship = &search.ships()[0];
    assert_eq!((ship.width(), ship.height(), ship.population()), (4, 5, 9));

    let life: Life = "B3/S23".parse()?;
    assert_eq!(evolve(&life, ship, 4), ship.cells);
    let mirrored: Vec<Vec<CellState>> = ship
        .cells
        .iter()
        .map(|row| row.iter().rev().copied().collect())
        .collect();
    assert_eq!(evolve(&life, ship, 2), mirrored);
    Ok(())
}

/// Life, seen through a background which flips every generation.
struct Strobe(Life);

impl Rule for Strobe {
    fn neighborhood(&self) -> &[Coord] {
        self.0.neighborhood()
    }

    fn num_states(&self) -> usize {
        2
    }

    fn alternating_period(&self) -> usize {
        2
    }

    fn convert_state(&self, state: CellState, generation: usize) -> CellState {
        if generation % 2 == 1 {
            1 - state
        } else {
            state
        }
    }

    fn transition(
        &self,
        neighbors: &[CellState],
        state: CellState,
        generation: usize,
    ) -> CellState {
        if generation % 2 == 0 {
            1 - self.0.transition(neighbors, state, 0)
        } else {
            let flipped: Vec<CellState> = neighbors.iter().map(|&cell| 1 - cell).collect();
            self.0.transition(&flipped, 1 - state, 0)
        }
    }
}

#[test]
fn strobing_background() -> Result<(), Box<dyn error::Error>> {
    let life: Life = "B3/S23".parse()?;
    let config = Config::new(5, 4, 2).set_symmetry(Symmetry::GlideSymmetric);
    let mut search = config.ship_search(Strobe(life.clone()))?;
    assert_eq!(search.search_ships(1), Status::Found);
    let ship = &search.ships()[0];
    assert_eq!(ship.population(), 9);
    assert_eq!(evolve(&life, ship, 4), ship.cells);
    Ok(())
}

#[test]
fn b0_ship() -> Result<(), Box<dyn error::Error>> {
    let config = Config::new(2, 2, 1)
        .set_rule_string("B01468/S23")
        .set_symmetry(Symmetry::EvenSymmetric);
    let mut search = config.world()?;
    assert_eq!(search.search_ships(1), Status::Found);
    let ship = &search.ships()[0];
    assert_eq!(
        ship.cells,
        vec![vec![0, 1, 1, 0], vec![0, 1, 1, 0], vec![1, 0, 0, 1]]
    );
    let rule: Life = "B01468/S23".parse()?;
    assert_eq!(evolve(&rule, ship, 2), ship.cells);
    Ok(())
}

#[test]
fn depth_first() -> Result<(), Box<dyn error::Error>> {
    let config = Config::new(5, 4, 2)
        .set_symmetry(Symmetry::GlideSymmetric)
        .set_dfs(true)
        .set_max_length(30);
    let mut search = config.world()?;
    assert_eq!(search.search_ships(1), Status::Found);
    assert_eq!(search.ships()[0].population(), 9);
    Ok(())
}

#[test]
fn too_fast() -> Result<(), Box<dyn error::Error>> {
    let config = Config::new(1, 1, 10);
    let mut search = config.world()?;
    assert_eq!(search.search(None), Status::None);
    assert!(search.ships().is_empty());
    assert_eq!(search.frontier_len(), 0);
    Ok(())
}

#[test]
fn too_narrow() -> Result<(), Box<dyn error::Error>> {
    let config = Config::new(1, 4, 1);
    let mut search = config.world()?;
    assert_eq!(search.search_ships(1), Status::None);
    assert!(search.ships().is_empty());
    Ok(())
}

#[test]
fn deterministic() -> Result<(), Box<dyn error::Error>> {
    let config = Config::new(5, 4, 2).set_symmetry(Symmetry::GlideSymmetric);
    let mut first = config.world()?;
    let mut second = config.world()?;
    assert_eq!(first.search_ships(1), Status::Found);
    assert_eq!(second.search_ships(1), Status::Found);
    assert_eq!(first.ships(), second.ships());
    Ok(())
}

#[test]
fn random_order() -> Result<(), Box<dyn error::Error>> {
    let config = Config::new(5, 4, 2)
        .set_symmetry(Symmetry::GlideSymmetric)
        .set_random_order(true)
        .set_seed(42);
    let mut first = config.world()?;
    let mut second = config.world()?;
    assert_eq!(first.search_ships(1), Status::Found);
    assert_eq!(second.search_ships(1), Status::Found);
    assert_eq!(first.ships(), second.ships());
    assert_eq!(first.ships()[0].population(), 9);
    Ok(())
}

#[test]
fn max_step() -> Result<(), Box<dyn error::Error>> {
    let config = Config::new(5, 4, 2).set_symmetry(Symmetry::GlideSymmetric);
    let mut search = config.world()?;
    assert_eq!(search.search(Some(1)), Status::Searching);
    assert!(search.frontier_len() > 0);
    assert_eq!(search.search_ships(1), Status::Found);
    Ok(())
}

#[test]
fn stop() -> Result<(), Box<dyn error::Error>> {
    let config = Config::new(5, 4, 2).set_symmetry(Symmetry::GlideSymmetric);
    let mut search = config.world()?;
    let flag = search.stop_flag();
    flag.store(true, Ordering::Relaxed);
    assert_eq!(search.search(None), Status::Stopped);
    flag.store(false, Ordering::Relaxed);
    assert_eq!(search.search_ships(1), Status::Found);
    Ok(())
}

#[test]
fn max_length() -> Result<(), Box<dyn error::Error>> {
    let config = Config::new(5, 4, 2)
        .set_symmetry(Symmetry::GlideSymmetric)
        .set_max_length(4);
    let mut search = config.world()?;
    assert_eq!(search.search_ships(1), Status::None);
    Ok(())
}

#[test]
fn partial_results() -> Result<(), Box<dyn error::Error>> {
    let config = Config::new(5, 4, 2)
        .set_symmetry(Symmetry::GlideSymmetric)
        .set_verbose(true);
    let mut search = config.world()?;
    assert_eq!(search.search(None), Status::Partial);
    assert!(search.partial().is_some());
    assert_eq!(search.search_ships(1), Status::Found);
    Ok(())
}

#[test]
fn errors() {
    assert_eq!(
        Config::new(0, 4, 2).world().err(),
        Some(Error::NonPositiveError)
    );
    assert_eq!(
        Config::new(5, 3, 2)
            .set_symmetry(Symmetry::GlideSymmetric)
            .world()
            .err(),
        Some(Error::GlideError)
    );
    assert!(Config::new(5, 4, 2)
        .set_rule_string("not a rule")
        .world()
        .is_err());
    assert_eq!("B0/S8".parse::<Life>().err(), Some(Error::B0Error));
}

#[test]
fn unsupported() -> Result<(), Box<dyn error::Error>> {
    let mut search = Config::new(5, 4, 2).world()?;
    assert!(matches!(
        search.search_threaded(4),
        Err(Error::Unsupported(_))
    ));
    assert!(matches!(
        search.write_to_file(Path::new("ship.json")),
        Err(Error::Unsupported(_))
    ));
    Ok(())
}
