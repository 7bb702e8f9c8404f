//! CLI command definitions and handlers
//!
//! The CLI is thin marshalling over the library: it reads input, calls the
//! engine or the bridge, and prints what comes back.

mod chat;
mod doctor;
mod review;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Critique - aggregated code review for Python snippets
#[derive(Parser, Debug)]
#[command(name = "critique")]
#[command(
    version,
    about = "Aggregated code review: static analysis fan-out, quality scoring, and AI chat",
    after_help = "\
Examples:
  critique review snippet.py               Analyze a file
  critique review - < snippet.py           Analyze stdin
  critique review snippet.py --format json JSON output for scripting
  critique chat \"why is this slow?\"        Ask the AI about code
  critique doctor                          Check analysis tools and providers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a Python snippet and print the aggregated review
    Review {
        /// Path to the snippet, or "-" for stdin
        file: PathBuf,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Run the snippet and include its output in the review
        #[arg(long)]
        run: bool,
    },

    /// Chat with the configured AI providers about code
    Chat {
        /// The message to send
        message: Vec<String>,

        /// Read a JSON conversation history from stdin instead
        #[arg(long)]
        stdin: bool,
    },

    /// Check which analysis tools and AI providers are available
    Doctor,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Review {
            file,
            format,
            output,
            run,
        } => review::run(&file, &format, output.as_deref(), run),
        Commands::Chat { message, stdin } => chat::run(&message.join(" "), stdin),
        Commands::Doctor => doctor::run(),
    }
}
