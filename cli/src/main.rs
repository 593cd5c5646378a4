mod args;
mod cli;

use args::Args;
use tracing_subscriber::EnvFilter;

/// Logs to stderr. `RUST_LOG` overrides the default level.
fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse().unwrap_or_else(|e| e.exit());
    init_logging(args.quiet);
    if let Err(e) = cli::search(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
