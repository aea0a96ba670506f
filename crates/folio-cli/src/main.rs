//! Folio CLI - Portfolio transaction normalization
//!
//! Usage:
//!   folio parse --job-id ID --directory DIR file1 [file2 ...]
//!   folio classify "Dividend payment AAPL"

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Parse {
            job_id,
            directory,
            files,
            output,
            pretty,
        } => commands::cmd_parse(
            &job_id,
            &directory,
            files,
            cli.config.as_deref(),
            output.as_deref(),
            pretty,
        ),
        Commands::Classify { description } => {
            commands::cmd_classify(&description, cli.config.as_deref())
        }
    }
}
