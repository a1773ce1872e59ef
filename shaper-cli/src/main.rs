//! Shaper CLI
//!
//! Finds the host-side veth interfaces that carry a Docker container's
//! traffic, so shaping rules can be attached to them.

use clap::Parser;
use shaper_core::EXIT_FAILURE;
use std::process;
use tracing::Level;

mod cli;
mod commands;

use cli::Cli;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Handle errors
    if let Err(e) = commands::dispatch(cli).await {
        eprintln!("❌ Error: {e:#}");
        let code = e
            .downcast_ref::<shaper_core::Error>()
            .map_or(EXIT_FAILURE, shaper_core::Error::exit_code);
        process::exit(code);
    }
}
