//! Row transformation into the canonical record schema
//!
//! Columns are addressed by fixed zero-based positions, not header names —
//! header labels are not reliable across source files. The default map
//! matches the documented upload schema and can be overridden through
//! pipeline configuration.

use chrono::{NaiveDate, NaiveDateTime};

use crate::loader::excel_serial_to_date;
use crate::models::{CanonicalRecord, Category, Cell, ErrorDescriptor, RawRow};

/// Positional column map for the transformer and categorizer
///
/// Zero-based offsets into each raw row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    /// Description cell read by the categorizer
    pub description: usize,
    pub date: usize,
    pub symbol: usize,
    pub quantity: usize,
    pub unit_price: usize,
    pub currency: usize,
    pub transaction_fee: usize,
    pub proceeds_foreign: usize,
    pub proceeds_local: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            description: 1,
            date: 0,
            symbol: 3,
            quantity: 4,
            unit_price: 5,
            currency: 6,
            transaction_fee: 7,
            proceeds_foreign: 9,
            proceeds_local: 10,
        }
    }
}

/// Date formats tried in order when a date arrives as text
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2023-01-15
    "%m/%d/%Y", // 01/15/2023
    "%d/%m/%Y", // 15/01/2023
    "%Y/%m/%d", // 2023/01/15
    "%d-%m-%Y", // 15-01-2023
    "%m-%d-%Y", // 01-15-2023
    "%m/%d/%y", // 01/15/23
];

/// Datetime formats for timestamp-style cells (time part discarded)
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Transform a classified row into a canonical record
///
/// Missing or out-of-range cells become None (partial records are valid);
/// an unresolvable date or a non-numeric amount rejects the whole row.
pub fn transform_row(
    row: &RawRow,
    category: Category,
    columns: &ColumnMap,
) -> std::result::Result<CanonicalRecord, ErrorDescriptor> {
    let date = parse_date_cell(row.cell(columns.date)).ok_or_else(|| {
        ErrorDescriptor::row_validation(&row.file, row.row, "unparseable or missing date")
    })?;

    let mut company_symbol = row.cell(columns.symbol).as_text();
    if company_symbol.is_none() && category == Category::Dividend {
        // Dividend statements often carry the symbol right of the
        // description cell instead of in the symbol column
        company_symbol = row.cell(columns.description + 1).as_text();
    }

    let quantity = numeric_field(row, columns.quantity, "quantity")?;
    let unit_price = numeric_field(row, columns.unit_price, "unit price")?;
    let currency = row.cell(columns.currency).as_text();
    let transaction_fee = numeric_field(row, columns.transaction_fee, "transaction fee")?;
    let proceeds_foreign = numeric_field(row, columns.proceeds_foreign, "foreign proceeds")?;
    let proceeds_local = numeric_field(row, columns.proceeds_local, "local proceeds")?;

    Ok(CanonicalRecord {
        date,
        company_symbol,
        quantity,
        unit_price,
        currency,
        transaction_fee: transaction_fee.unwrap_or(0.0),
        proceeds_foreign,
        proceeds_local,
    })
}

fn numeric_field(
    row: &RawRow,
    index: usize,
    field: &str,
) -> std::result::Result<Option<f64>, ErrorDescriptor> {
    parse_number_cell(row.cell(index)).map_err(|value| {
        ErrorDescriptor::row_validation(
            &row.file,
            row.row,
            format!("non-numeric {}: '{}'", field, value),
        )
    })
}

/// Parse a cell into a calendar date, if possible
fn parse_date_cell(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::Number(serial) => excel_serial_to_date(*serial),
        Cell::Text(s) => parse_date_str(s),
        Cell::Empty => None,
    }
}

/// Try the known text date formats in order, first success wins
fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
            return Some(datetime.date());
        }
    }

    None
}

/// Parse a cell into a decimal number
///
/// Ok(None) for empty cells; Err carries the offending text for the
/// error message.
fn parse_number_cell(cell: &Cell) -> std::result::Result<Option<f64>, String> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(n) => Ok(Some(*n)),
        Cell::Date(d) => Err(d.to_string()),
        Cell::Text(s) => parse_number_str(s),
    }
}

/// Parse a numeric string, handling currency symbols, thousands
/// separators and accounting-style negatives
fn parse_number_str(s: &str) -> std::result::Result<Option<f64>, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let cleaned: String = trimmed
        .replace(['$', '€', '£', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    if cleaned.is_empty() {
        return Ok(None);
    }

    cleaned
        .parse::<f64>()
        .map(Some)
        .map_err(|_| trimmed.to_string())
}
