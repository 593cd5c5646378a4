//! Parsing command-line arguments.

use cfind_lib::{Config, Symmetry};
use clap::{error::ErrorKind, value_parser, Arg, ArgAction, ArgMatches, Command, Error};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// How ships are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Format {
    Rle,
    Json,
}

/// A struct to store the parse results.
pub(crate) struct Args {
    pub(crate) config: Config,
    /// Number of ships to find. `0` means all of them.
    pub(crate) num: usize,
    pub(crate) time_limit: Option<Duration>,
    pub(crate) format: Format,
    pub(crate) quiet: bool,
}

fn command() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .long_about(
            "Searching for spaceships in cellular automata\n\
             \n\
             The program is based on David Eppstein's gfind. Ships travel \
             vertically; only the left WIDTH columns are searched, and the \
             symmetry decides what lies right of them.\n\
             \n\
             Ships are printed in RLE format.\n\
             * Dead cells are represented by `b` for rules with 2 states, \
             `.` for rules with more states;\n\
             * Living cells are represented by `o` for rules with 2 states, \
             `A` for rules with more states;\n\
             * Dying cells are represented by uppercase letters starting from `B`.\n",
        )
        .arg(
            Arg::new("PERIOD")
                .help("Period of the ship")
                .short('p')
                .long("period")
                .value_parser(value_parser!(i64).range(1..)),
        )
        .arg(
            Arg::new("DY")
                .help("Vertical displacement of the ship per period")
                .short('k')
                .long("dy")
                .value_parser(value_parser!(i64).range(1..)),
        )
        .arg(
            Arg::new("WIDTH")
                .help("Number of searched columns")
                .short('w')
                .long("width")
                .value_parser(value_parser!(i64).range(1..)),
        )
        .arg(
            Arg::new("RULE")
                .help("Rule of the cellular automaton")
                .long_help(
                    "Rule of the cellular automaton\n\
                     Supports Life-like and isotropic non-totalistic rules, \
                     and their corresponding Generations rules.\n\
                     Rules with B0 are supported without S8, except for Generations rules.\n",
                )
                .short('r')
                .long("rule"),
        )
        .arg(
            Arg::new("SYMMETRY")
                .help("Symmetry of the ship")
                .long_help(
                    "Symmetry of the ship\n\
                     \"even\" and \"odd\" mirror the searched columns across their \
                     right edge or their right-most column.\n\
                     \"gutter\" mirrors them across an empty column.\n\
                     \"glide\" mirrors the ship after half a period; \
                     the period and the displacement must be even.\n",
                )
                .short('s')
                .long("symmetry")
                .value_parser(|s: &str| s.parse::<Symmetry>()),
        )
        .arg(
            Arg::new("NUM")
                .help("Number of ships to find, 0 for all of them")
                .short('n')
                .long("num")
                .value_parser(value_parser!(u64))
                .default_value("1"),
        )
        .arg(
            Arg::new("QUEUE")
                .help("Queue size before depth-first deepening, as a power of 2")
                .short('q')
                .long("queue-bits")
                .value_parser(value_parser!(u32).range(1..i64::from(usize::BITS))),
        )
        .arg(
            Arg::new("INCREMENT")
                .help("Minimal number of rows added by each depth-first deepening")
                .short('i')
                .long("increment")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("LOOKUP")
                .help("Number of columns covered by the lookup tables")
                .short('l')
                .long("lookup-width")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("NOLOOKAHEAD")
                .help("Disables lookahead")
                .long("no-lookahead")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("DFS")
                .help("Explores the queue depth-first")
                .long("dfs")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("VERBOSE")
                .help("Prints a partial result for every expanded state")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("NOPARTIALS")
                .help("Never prints partial results")
                .long("no-partials")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("RANDOM")
                .help("Explores the successors of each state in a random order")
                .long("random")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("SEED")
                .help("Seed of the random order")
                .long("seed")
                .value_parser(value_parser!(u64))
                .requires("RANDOM"),
        )
        .arg(
            Arg::new("MAXLENGTH")
                .help("Maximal number of rows of a ship, counting all phases")
                .long("max-length")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("CACHE")
                .help("Capacity of the transposition table")
                .long("cache-size")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("TIME")
                .help("Stops the search after this many seconds")
                .long("time-limit")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("CONFIG")
                .help("Reads the search configuration from a JSON, YAML or TOML file")
                .long_help(
                    "Reads the search configuration from a JSON, YAML or TOML file\n\
                     The format is decided by the file extension. \
                     Options given on the command line take precedence.\n",
                )
                .long("config")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("FORMAT")
                .help("Output format")
                .short('f')
                .long("format")
                .value_parser(["rle", "json"])
                .default_value("rle"),
        )
        .arg(
            Arg::new("QUIET")
                .help("Only logs warnings and errors")
                .long("quiet")
                .action(ArgAction::SetTrue),
        )
}

/// Reads a configuration file.
fn read_config(path: &Path) -> Result<Config, Error> {
    let text = fs::read_to_string(path).map_err(|e| {
        Error::raw(
            ErrorKind::Io,
            format!("Unable to read {}: {}\n", path.display(), e),
        )
    })?;
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&text).map_err(|e| e.to_string()),
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text).map_err(|e| e.to_string()),
        Some("toml") => toml::from_str(&text).map_err(|e| e.to_string()),
        _ => Err(String::from("unknown file extension")),
    };
    config.map_err(|e| {
        Error::raw(
            ErrorKind::InvalidValue,
            format!("Invalid config file {}: {}\n", path.display(), e),
        )
    })
}

/// Applies the options given on the command line.
fn apply(mut config: Config, matches: &ArgMatches) -> Config {
    if let Some(&period) = matches.get_one::<i64>("PERIOD") {
        config.period = period as isize;
    }
    if let Some(&dy) = matches.get_one::<i64>("DY") {
        config.dy = dy as isize;
    }
    if let Some(&width) = matches.get_one::<i64>("WIDTH") {
        config.width = width as isize;
    }
    if let Some(rule_string) = matches.get_one::<String>("RULE") {
        config = config.set_rule_string(rule_string);
    }
    if let Some(&symmetry) = matches.get_one::<Symmetry>("SYMMETRY") {
        config = config.set_symmetry(symmetry);
    }
    if let Some(&bits) = matches.get_one::<u32>("QUEUE") {
        config = config.set_max_queue_size(1 << bits);
    }
    if let Some(&increment) = matches.get_one::<u64>("INCREMENT") {
        config = config.set_min_deepening_increment(increment as usize);
    }
    if let Some(&width) = matches.get_one::<u64>("LOOKUP") {
        config = config.set_lookup_table_width(width as usize);
    }
    if let Some(&seed) = matches.get_one::<u64>("SEED") {
        config = config.set_seed(seed);
    }
    if let Some(&length) = matches.get_one::<u64>("MAXLENGTH") {
        config = config.set_max_length(length as usize);
    }
    if let Some(&capacity) = matches.get_one::<u64>("CACHE") {
        config = config.set_transposition_capacity(capacity as usize);
    }
    if matches.get_flag("NOLOOKAHEAD") {
        config = config.set_lookahead(false);
    }
    if matches.get_flag("DFS") {
        config = config.set_dfs(true);
    }
    if matches.get_flag("VERBOSE") {
        config = config.set_verbose(true);
    }
    if matches.get_flag("NOPARTIALS") {
        config = config.set_no_partials(true);
    }
    if matches.get_flag("RANDOM") {
        config = config.set_random_order(true);
    }
    config
}

impl Args {
    /// Parses the command-line arguments.
    pub(crate) fn parse() -> Result<Self, Error> {
        let matches = command().try_get_matches()?;

        let config = match matches.get_one::<PathBuf>("CONFIG") {
            Some(path) => read_config(path)?,
            None => Config::default(),
        };
        let config = apply(config, &matches);

        let num = matches.get_one::<u64>("NUM").copied().unwrap_or(1) as usize;
        let time_limit = matches
            .get_one::<u64>("TIME")
            .map(|&secs| Duration::from_secs(secs));
        let format = match matches.get_one::<String>("FORMAT").map(String::as_str) {
            Some("json") => Format::Json,
            _ => Format::Rle,
        };
        let quiet = matches.get_flag("QUIET");

        Ok(Args {
            config,
            num,
            time_limit,
            format,
            quiet,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, Error> {
        let matches = command().try_get_matches_from(args)?;
        Ok(apply(Config::default(), &matches))
    }

    #[test]
    fn command_is_valid() {
        command().debug_assert();
    }

    #[test]
    fn options() -> Result<(), Error> {
        let config = parse(&[
            "cfind", "-p", "4", "-k", "2", "-w", "5", "-s", "glide", "-q", "10", "--dfs",
        ])?;
        assert_eq!((config.period, config.dy, config.width), (4, 2, 5));
        assert_eq!(config.symmetry, Symmetry::GlideSymmetric);
        assert_eq!(config.max_queue_size, 1024);
        assert!(config.dfs);
        assert!(config.lookahead);
        Ok(())
    }

    #[test]
    fn defaults_come_from_the_config() -> Result<(), Error> {
        assert_eq!(parse(&["cfind"])?, Config::default());
        Ok(())
    }

    #[test]
    fn invalid_values() {
        assert!(parse(&["cfind", "-p", "0"]).is_err());
        assert!(parse(&["cfind", "-s", "diagonal"]).is_err());
        assert!(parse(&["cfind", "--seed", "3"]).is_err());
        let bits = usize::BITS.to_string();
        assert!(parse(&["cfind", "-q", bits.as_str()]).is_err());
    }
}
