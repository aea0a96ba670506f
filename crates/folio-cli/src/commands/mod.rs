//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `parse` - Run a normalization job and emit the JSON result
//! - `classify` - Test the categorizer rule table against a description

pub mod classify;
pub mod parse;

// Re-export command functions for main.rs
pub use classify::*;
pub use parse::*;

use std::path::Path;

use anyhow::{Context, Result};
use folio_core::{PipelineConfig, PipelineOptions};

/// Resolve pipeline options from an optional config file
pub fn load_options(config: Option<&Path>) -> Result<PipelineOptions> {
    match config {
        Some(path) => {
            let config = PipelineConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            Ok(config.into_options())
        }
        None => Ok(PipelineOptions::default()),
    }
}
