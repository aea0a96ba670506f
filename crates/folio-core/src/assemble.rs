//! Per-file assembly: load, categorize, transform, sort
//!
//! One file in, one `FileOutcome` out. Failures stay inside the outcome
//! as error descriptors; nothing raised here can take down the job.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::categorize::RuleSet;
use crate::loader::load_rows;
use crate::models::{CanonicalRecord, Category, ErrorDescriptor};
use crate::transform::{transform_row, ColumnMap};

/// Everything produced from one processed file
///
/// Records are partitioned by category and sorted ascending by date.
/// Consumed once by the merge step, then discarded.
#[derive(Debug, Default)]
pub struct FileOutcome {
    pub records: BTreeMap<Category, Vec<CanonicalRecord>>,
    pub errors: Vec<ErrorDescriptor>,
}

impl FileOutcome {
    fn failed(error: ErrorDescriptor) -> Self {
        Self {
            records: BTreeMap::new(),
            errors: vec![error],
        }
    }

    /// Total records across categories
    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

/// Process a single file through the load → categorize → transform
/// pipeline
///
/// A loader failure yields an empty outcome carrying one descriptor;
/// later files in the job are unaffected.
pub fn assemble_file(
    directory: &Path,
    file_name: &str,
    rules: &RuleSet,
    columns: &ColumnMap,
) -> FileOutcome {
    let rows = match load_rows(directory, file_name) {
        Ok(rows) => rows,
        Err(descriptor) => return FileOutcome::failed(descriptor),
    };

    let mut outcome = FileOutcome::default();

    for row in &rows {
        let description = match row.cell(columns.description).as_text() {
            Some(text) => text,
            None => {
                outcome.errors.push(ErrorDescriptor::row_validation(
                    file_name,
                    row.row,
                    "unclassified row (no description cell)",
                ));
                continue;
            }
        };

        let category = match rules.classify(&description) {
            Some(category) => category,
            None => {
                outcome.errors.push(ErrorDescriptor::row_validation(
                    file_name,
                    row.row,
                    format!("unclassified row: '{}'", description),
                ));
                continue;
            }
        };

        match transform_row(row, category, columns) {
            Ok(record) => outcome.records.entry(category).or_default().push(record),
            Err(descriptor) => outcome.errors.push(descriptor),
        }
    }

    // Stable sort: rows sharing a date keep their file order
    for records in outcome.records.values_mut() {
        records.sort_by_key(|record| record.date);
    }

    debug!(
        "Assembled {}: {} records, {} errors",
        file_name,
        outcome.record_count(),
        outcome.errors.len()
    );

    outcome
}
