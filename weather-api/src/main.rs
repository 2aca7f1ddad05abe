//! Binary crate for the `weather-api` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and environment overrides
//! - Running the selected service variant
//! - Printing forecasts, OpenAPI documents and configuration

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    weather_api::logging::init_logging(&cmd.log_level, cmd.json_logs);
    cmd.run().await
}
