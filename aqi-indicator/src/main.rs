//! Binary crate for the `aqi` indicator tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Writing the on-disk configuration
//! - Running the poll loop against a console indicator surface

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod console;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
