//! Folio Core Library
//!
//! The transaction normalization pipeline for uploaded portfolio files:
//! - File loading with format detection and encoding fallback
//! - Content-based row categorization via an ordered rule table
//! - Transformation into the canonical record schema
//! - Per-file assembly with row-level failure isolation
//! - Chronological merging across files without re-sorting
//! - Job orchestration producing the unified per-job result
//!
//! Recoverable problems (unreadable file, unparseable row) are carried
//! as error descriptors in the job result; only a malformed job
//! descriptor is an actual `Err`.

pub mod assemble;
pub mod categorize;
pub mod config;
pub mod error;
pub mod loader;
pub mod merge;
pub mod models;
pub mod orchestrator;
pub mod transform;

pub use assemble::{assemble_file, FileOutcome};
pub use categorize::{Rule, RuleSet};
pub use config::{ColumnOverrides, PipelineConfig, RuleConfig};
pub use error::{Error, Result};
pub use loader::{detect_format, load_rows, FileFormat};
pub use merge::merge_sorted;
pub use models::{
    CanonicalRecord, Category, Cell, ErrorDescriptor, ErrorKind, JobRequest, JobResult, RawRow,
};
pub use orchestrator::{process_job, JobAccumulator, PipelineOptions};
pub use transform::{transform_row, ColumnMap};
