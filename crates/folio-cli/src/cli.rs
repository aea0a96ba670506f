//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Folio - Normalize uploaded portfolio files
#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio transaction normalization pipeline", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Pipeline config file (rule order, column map overrides)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a normalization job over files in a directory
    Parse {
        /// Job identifier carried into the output
        #[arg(long)]
        job_id: String,

        /// Directory containing the uploaded files
        #[arg(short, long)]
        directory: PathBuf,

        /// File names to process, in arrival order
        #[arg(required = true)]
        files: Vec<String>,

        /// Write the JSON result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },

    /// Show which category the rule table assigns to a description
    Classify {
        /// Description text to classify
        description: String,
    },
}
