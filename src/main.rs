//! Arcade Engine CLI
//!
//! Loads attractions and customers, replays a day's transactions and prints
//! the venue report.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- games.txt customers.txt transactions.txt [customers-out.csv]
//! ```
//!
//! # Environment Variables
//!
//! - `ARCADE_VENUE_NAME`: Venue name shown in the report (default `Level Up!`)
//! - `RUST_LOG`: Logging verbosity (default `warn`, which shows skipped lines)

use arcade_engine::{EngineError, Result, VenueRegistry};
use log::info;
use std::env;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::process;

const DEFAULT_VENUE_NAME: &str = "Level Up!";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        return Err(EngineError::MissingArgument);
    }

    let venue_name = env::var("ARCADE_VENUE_NAME").unwrap_or_else(|_| DEFAULT_VENUE_NAME.into());
    let mut registry = VenueRegistry::new(venue_name);

    let skipped = registry.load_attractions(BufReader::new(File::open(&args[1])?))?;
    info!("Attractions: {} line(s) skipped", skipped.len());

    let skipped = registry.load_customers(BufReader::new(File::open(&args[2])?))?;
    info!("Customers: {} line(s) skipped", skipped.len());

    let failed = registry.process_commands(BufReader::new(File::open(&args[3])?))?;
    info!("Transactions: {} line(s) failed", failed.len());

    let stdout = io::stdout();
    registry.write_summary(stdout.lock())?;

    if let Some(output_path) = args.get(4) {
        let file = File::create(output_path)?;
        registry.write_customers(BufWriter::new(file))?;
    }

    Ok(())
}
