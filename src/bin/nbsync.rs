//! nbsync CLI binary.
//!
//! Thin wrapper: parse, build the invocation context, initialize logging,
//! execute, and map errors to exit codes.

use clap::Parser;
use nbsync::cli::{Cli, CliContext};
use nbsync::error::SyncError;
use nbsync::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(cli.root.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let logging = context.logging_config(cli.log_level.clone(), cli.log_format.clone());
    if let Err(e) = init_logging(&logging) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    match context.execute(&cli.command).await {
        Ok(output) => {
            println!("{}", output);
        }
        Err(SyncError::Aborted) => {
            eprintln!("No problem - aborting");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
