//! Running the search without a user interface.

use crate::args::{Args, Format};
use cfind_lib::{Error, Search, Ship, Status};
use std::{sync::atomic::Ordering, thread};

fn print_ship(ship: &Ship, format: Format) {
    match format {
        Format::Rle => print!("{}", ship.rle()),
        Format::Json => match serde_json::to_string(ship) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Unable to serialize the ship: {}", e),
        },
    }
}

fn print_partial(ship: &Ship, format: Format) {
    match format {
        Format::Rle => print!("#C Partial result, {} rows.\n{}", ship.height(), ship.rle()),
        Format::Json => match serde_json::to_string(&serde_json::json!({ "partial": ship })) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Unable to serialize the partial result: {}", e),
        },
    }
}

/// Searches until enough ships are found, printing them as they come.
pub(crate) fn search(args: Args) -> Result<(), Error> {
    let mut search: Box<dyn Search> = args.config.world()?;

    if let Some(limit) = args.time_limit {
        let flag = search.stop_flag();
        thread::spawn(move || {
            thread::sleep(limit);
            flag.store(true, Ordering::Relaxed);
        });
    }

    let mut found = 0;
    loop {
        match search.search(None) {
            Status::Found => {
                if let Some(ship) = search.ships().last() {
                    print_ship(ship, args.format);
                }
                found += 1;
                if found == args.num {
                    break;
                }
            }
            Status::Partial => {
                if let Some(ship) = search.partial() {
                    print_partial(ship, args.format);
                }
            }
            Status::None => {
                if found == 0 {
                    log::info!("No ships found.");
                }
                break;
            }
            Status::Stopped => {
                log::warn!("Time limit reached, {} ships found.", found);
                break;
            }
            Status::Initial | Status::Searching => {}
        }
    }
    Ok(())
}
