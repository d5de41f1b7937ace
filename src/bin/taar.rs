//! TAAR CLI Binary
//!
//! Command-line entry point for running the recommendation manager.

use clap::Parser;
use std::process;
use taar::cli::{build_logging_config, Cli, RunContext};
use taar::logging::init_logging;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("TAAR CLI starting");

    let context = match RunContext::new(cli.workspace.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing context: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
