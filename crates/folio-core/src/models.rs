//! Domain models for Folio

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Transaction categories a row can be classified into
///
/// The set is closed: a row either matches one of these by content or is
/// rejected as unclassified. Deposit and fee rows both classify as
/// `Transfer`; the sub-kind is never split in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Purchase,
    Sale,
    Dividend,
    Tax,
    Transfer,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Sale => "sale",
            Self::Dividend => "dividend",
            Self::Tax => "tax",
            Self::Transfer => "transfer",
        }
    }

    /// All categories, in output order
    pub fn all() -> &'static [Category] {
        &[
            Self::Purchase,
            Self::Sale,
            Self::Dividend,
            Self::Tax,
            Self::Transfer,
        ]
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "purchase" => Ok(Self::Purchase),
            "sale" => Ok(Self::Sale),
            "dividend" => Ok(Self::Dividend),
            "tax" => Ok(Self::Tax),
            "transfer" => Ok(Self::Transfer),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single cell value as found in a source file
///
/// CSV cells arrive as text; spreadsheet cells keep their native type so
/// Excel dates and numbers survive until transformation.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Cell content as trimmed text, or None for empty cells
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    Some(s.to_string())
                }
            }
            Self::Number(n) => Some(if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }),
            Self::Date(d) => Some(d.to_string()),
        }
    }
}

/// One row of raw file data, as produced by the loader
///
/// `row` is the 1-based position among the file's data rows (the header
/// row is excluded and not counted), used in error messages.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub file: String,
    pub row: usize,
    pub cells: Vec<Cell>,
}

impl RawRow {
    /// Cell at a zero-based column index, `Empty` if out of range
    pub fn cell(&self, index: usize) -> &Cell {
        self.cells.get(index).unwrap_or(&Cell::Empty)
    }
}

/// The normalized representation of one transaction row
///
/// Every field except `date` tolerates absence; a row with no resolvable
/// date is rejected during transformation and never becomes a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub date: NaiveDate,
    pub company_symbol: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub transaction_fee: f64,
    pub proceeds_foreign: Option<f64>,
    pub proceeds_local: Option<f64>,
}

/// Error taxonomy for recoverable processing failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EncodingError,
    LoadError,
    ValidationError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EncodingError => "encoding_error",
            Self::LoadError => "load_error",
            Self::ValidationError => "validation_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recoverable file- or row-level failure, reported as data
///
/// Descriptors are append-only: they accumulate across the job and are
/// returned alongside the normalized records, never thrown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub file: String,
    pub error: String,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
}

impl ErrorDescriptor {
    pub fn load(file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            error: error.into(),
            kind: ErrorKind::LoadError,
        }
    }

    pub fn encoding(file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            error: error.into(),
            kind: ErrorKind::EncodingError,
        }
    }

    pub fn validation(file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            error: error.into(),
            kind: ErrorKind::ValidationError,
        }
    }

    /// Validation error for a specific data row
    pub fn row_validation(file: impl Into<String>, row: usize, error: impl Into<String>) -> Self {
        Self::validation(file, format!("row {}: {}", row, error.into()))
    }
}

/// Job descriptor delivered by the external transport layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub job_id: String,
    pub directory: String,
    pub files: Vec<String>,
}

/// The unified output of one job
///
/// All five record arrays are ascending-sorted by date. An absent
/// category is an empty array, never a missing field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub job_id: String,
    pub purchases: Vec<CanonicalRecord>,
    pub sales: Vec<CanonicalRecord>,
    pub dividends: Vec<CanonicalRecord>,
    pub taxes: Vec<CanonicalRecord>,
    pub transfers: Vec<CanonicalRecord>,
    pub errors: Vec<ErrorDescriptor>,
}

impl JobResult {
    /// Total number of normalized records across all categories
    pub fn record_count(&self) -> usize {
        self.purchases.len()
            + self.sales.len()
            + self.dividends.len()
            + self.taxes.len()
            + self.transfers.len()
    }
}
