//! Parse command implementation

use std::path::Path;

use anyhow::{Context, Result};
use folio_core::{process_job, JobRequest};

use super::load_options;

pub fn cmd_parse(
    job_id: &str,
    directory: &Path,
    files: Vec<String>,
    config: Option<&Path>,
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let options = load_options(config)?;

    let request = JobRequest {
        job_id: job_id.to_string(),
        directory: directory.to_string_lossy().into_owned(),
        files,
    };

    let result = process_job(&request, &options)?;

    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            println!("✅ Job {} complete", result.job_id);
            println!("   Records: {}", result.record_count());
            println!("   Errors: {}", result.errors.len());
            println!("   Result written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
