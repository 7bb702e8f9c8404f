//! Critique - aggregated code review CLI
//!
//! Thin entry point: initialize logging, parse arguments, dispatch.

use anyhow::Result;
use clap::Parser;
use critique::cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    // Parse CLI args and run
    let cli = cli::Cli::parse();
    cli::run(cli)
}
