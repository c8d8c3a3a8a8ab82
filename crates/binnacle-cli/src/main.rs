//! Binnacle CLI - Detect diagram types with evidence-weighted confidence

mod cli;

use binnacle::core::logging::init_logging;
use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    // Initialize logging early; run() reinitializes with CLI flags
    if let Err(e) = init_logging(None, None) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let app = cli::BinnacleApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
