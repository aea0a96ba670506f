//! Job orchestration
//!
//! Drives per-file assembly and merging across a job's file list, in the
//! order supplied. Files are processed strictly sequentially: the merge
//! fast paths and the tie-break rule both depend on deterministic file
//! arrival order. Reprocessing the same job descriptor yields the same
//! result.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use crate::assemble::{assemble_file, FileOutcome};
use crate::categorize::RuleSet;
use crate::error::{Error, Result};
use crate::merge::merge_sorted;
use crate::models::{CanonicalRecord, Category, ErrorDescriptor, JobRequest, JobResult};
use crate::transform::ColumnMap;

/// Tunable pipeline behavior: categorizer rule order and column layout
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub rules: RuleSet,
    pub columns: ColumnMap,
}

/// Running merged state for one job
///
/// Owned by the orchestrator for the lifetime of a single job and
/// converted into the final result at the end; never shared across jobs.
#[derive(Debug, Default)]
pub struct JobAccumulator {
    by_category: BTreeMap<Category, Vec<CanonicalRecord>>,
    errors: Vec<ErrorDescriptor>,
}

impl JobAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one file's outcome into the running state
    pub fn absorb(&mut self, outcome: FileOutcome) {
        for (category, incoming) in outcome.records {
            let existing = self.by_category.remove(&category).unwrap_or_default();
            self.by_category
                .insert(category, merge_sorted(existing, incoming));
        }
        self.errors.extend(outcome.errors);
    }

    /// Convert the accumulated state into the output contract
    pub fn into_result(mut self, job_id: impl Into<String>) -> JobResult {
        JobResult {
            job_id: job_id.into(),
            purchases: self.take(Category::Purchase),
            sales: self.take(Category::Sale),
            dividends: self.take(Category::Dividend),
            taxes: self.take(Category::Tax),
            transfers: self.take(Category::Transfer),
            errors: self.errors,
        }
    }

    fn take(&mut self, category: Category) -> Vec<CanonicalRecord> {
        self.by_category.remove(&category).unwrap_or_default()
    }
}

/// Process a complete job: every file, in order, into one unified result
///
/// Only a malformed descriptor fails the job; every file- and row-level
/// problem is folded into the result's error list.
pub fn process_job(request: &JobRequest, options: &PipelineOptions) -> Result<JobResult> {
    if request.job_id.trim().is_empty() {
        return Err(Error::InvalidJob("missing job id".to_string()));
    }
    if request.files.is_empty() {
        return Err(Error::InvalidJob("empty file list".to_string()));
    }

    info!(
        "Starting job {}: processing {} files",
        request.job_id,
        request.files.len()
    );

    let directory = Path::new(&request.directory);
    let mut accumulator = JobAccumulator::new();

    for file_name in &request.files {
        let outcome = assemble_file(directory, file_name, &options.rules, &options.columns);
        if !outcome.errors.is_empty() {
            warn!(
                "File {}: {} errors recorded",
                file_name,
                outcome.errors.len()
            );
        }
        accumulator.absorb(outcome);
    }

    let result = accumulator.into_result(&request.job_id);

    info!(
        "Job {} complete: {} purchases, {} sales, {} dividends, {} taxes, {} transfers, {} errors",
        result.job_id,
        result.purchases.len(),
        result.sales.len(),
        result.dividends.len(),
        result.taxes.len(),
        result.transfers.len(),
        result.errors.len()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorKind;
    use chrono::NaiveDate;

    fn record(date: &str) -> CanonicalRecord {
        CanonicalRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            company_symbol: None,
            quantity: None,
            unit_price: None,
            currency: None,
            transaction_fee: 0.0,
            proceeds_foreign: None,
            proceeds_local: None,
        }
    }

    #[test]
    fn test_rejects_missing_job_id() {
        let request = JobRequest {
            job_id: "  ".to_string(),
            directory: "/tmp".to_string(),
            files: vec!["a.csv".to_string()],
        };
        let err = process_job(&request, &PipelineOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidJob(_)));
    }

    #[test]
    fn test_rejects_empty_file_list() {
        let request = JobRequest {
            job_id: "job-1".to_string(),
            directory: "/tmp".to_string(),
            files: vec![],
        };
        let err = process_job(&request, &PipelineOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidJob(_)));
    }

    #[test]
    fn test_missing_files_become_errors_not_failures() {
        let dir = tempfile::tempdir().unwrap();
        let request = JobRequest {
            job_id: "job-1".to_string(),
            directory: dir.path().to_string_lossy().into_owned(),
            files: vec!["ghost.csv".to_string(), "phantom.csv".to_string()],
        };
        let result = process_job(&request, &PipelineOptions::default()).unwrap();
        assert_eq!(result.record_count(), 0);
        assert_eq!(result.errors.len(), 2);
        assert!(result
            .errors
            .iter()
            .all(|e| e.kind == ErrorKind::LoadError));
    }

    #[test]
    fn test_accumulator_absorbs_and_merges() {
        let mut accumulator = JobAccumulator::new();

        let mut first = FileOutcome::default();
        first.records.insert(
            Category::Purchase,
            vec![record("2023-02-01"), record("2023-03-01")],
        );
        accumulator.absorb(first);

        let mut second = FileOutcome::default();
        second.records.insert(
            Category::Purchase,
            vec![record("2023-01-01"), record("2023-02-15")],
        );
        second.errors.push(ErrorDescriptor::load("b.csv", "oops"));
        accumulator.absorb(second);

        let result = accumulator.into_result("job-1");
        let dates: Vec<String> = result
            .purchases
            .iter()
            .map(|r| r.date.to_string())
            .collect();
        assert_eq!(
            dates,
            vec!["2023-01-01", "2023-02-01", "2023-02-15", "2023-03-01"]
        );
        assert_eq!(result.errors.len(), 1);
        assert!(result.sales.is_empty());
    }

    #[test]
    fn test_into_result_covers_all_categories() {
        let result = JobAccumulator::new().into_result("job-1");
        assert_eq!(result.job_id, "job-1");
        assert!(result.purchases.is_empty());
        assert!(result.sales.is_empty());
        assert!(result.dividends.is_empty());
        assert!(result.taxes.is_empty());
        assert!(result.transfers.is_empty());
        assert!(result.errors.is_empty());
    }
}
