//! GeoGate CLI - Command-line interface
//!
//! Drives the proximity gates against the facility API, with the current
//! position supplied on the command line.

mod cli;
mod commands;
mod config_loader;
mod errors;
mod output;
mod output_types;
mod targets;

use clap::Parser;
use cli::Cli;
use output::OutputWriter;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let output = OutputWriter::new(cli.json);

    // Create async runtime
    let result = tokio::runtime::Runtime::new()
        .map_err(anyhow::Error::from)
        .and_then(|runtime| runtime.block_on(commands::execute(cli, &output)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let error = errors::from_anyhow(&e);
            if output.is_json() {
                output.error(&error, error.kind);
            } else {
                error.display();
            }
            error.exit_code()
        }
    }
}
