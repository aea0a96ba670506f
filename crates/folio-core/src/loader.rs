//! File loading for delimited-text and spreadsheet portfolio files
//!
//! Every failure mode is returned as an `ErrorDescriptor` — a missing or
//! corrupt file must never abort the job that references it.

use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use tracing::debug;

use crate::models::{Cell, ErrorDescriptor, RawRow};

/// Supported file formats, detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

/// Detect the file format from the extension, None if unsupported
pub fn detect_format(path: &Path) -> Option<FileFormat> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "csv" => Some(FileFormat::Csv),
        "xlsx" | "xls" => Some(FileFormat::Xlsx),
        _ => None,
    }
}

/// Load every data row of a file (header row excluded)
///
/// Resolves `file_name` against `directory`. Rows whose cells are all
/// empty carry no data and are skipped, but still counted so row numbers
/// in error messages match the source file.
pub fn load_rows(
    directory: &Path,
    file_name: &str,
) -> std::result::Result<Vec<RawRow>, ErrorDescriptor> {
    let path = directory.join(file_name);

    if !path.exists() {
        return Err(ErrorDescriptor::load(
            file_name,
            format!("File not found: {}", path.display()),
        ));
    }

    let format = detect_format(&path).ok_or_else(|| {
        ErrorDescriptor::load(
            file_name,
            "Unsupported file type (must be .csv, .xlsx or .xls)",
        )
    })?;

    let rows = match format {
        FileFormat::Csv => load_csv(&path, file_name)?,
        FileFormat::Xlsx => load_xlsx(&path, file_name)?,
    };

    if rows.is_empty() {
        return Err(ErrorDescriptor::load(file_name, "File has no data rows"));
    }

    debug!("Loaded {}: {} data rows", file_name, rows.len());
    Ok(rows)
}

/// Read file bytes as UTF-8, falling back to Windows-1252
///
/// Windows-1252 covers the Latin-1 range and is what Excel exports use
/// when a CSV is not UTF-8. If even the fallback reports mangled bytes
/// the file is not decodable under any attempted encoding.
fn read_file_as_utf8(path: &Path, file_name: &str) -> std::result::Result<String, ErrorDescriptor> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| ErrorDescriptor::load(file_name, format!("Failed to open file: {}", e)))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| ErrorDescriptor::load(file_name, format!("Failed to read file: {}", e)))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, had_errors) = encoding_rs::WINDOWS_1252.decode(&bytes);
            if had_errors {
                Err(ErrorDescriptor::encoding(
                    file_name,
                    "File is not decodable as UTF-8 or Windows-1252",
                ))
            } else {
                debug!("Decoded {} with Windows-1252 fallback", file_name);
                Ok(decoded.into_owned())
            }
        }
    }
}

fn load_csv(path: &Path, file_name: &str) -> std::result::Result<Vec<RawRow>, ErrorDescriptor> {
    let content = read_file_as_utf8(path, file_name)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| ErrorDescriptor::load(file_name, format!("CSV parse error: {}", e)))?;

        let cells: Vec<Cell> = record
            .iter()
            .map(|field| {
                if field.trim().is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();

        if cells.iter().all(Cell::is_empty) {
            continue;
        }

        rows.push(RawRow {
            file: file_name.to_string(),
            row: index + 1,
            cells,
        });
    }

    Ok(rows)
}

fn load_xlsx(path: &Path, file_name: &str) -> std::result::Result<Vec<RawRow>, ErrorDescriptor> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        ErrorDescriptor::load(file_name, format!("Failed to open workbook: {}", e))
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ErrorDescriptor::load(file_name, "Workbook has no sheets"))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ErrorDescriptor::load(file_name, format!("Failed to read sheet: {}", e)))?;

    let mut rows = Vec::new();
    // Skip the header row; calamine ranges start at the first used cell
    for (index, row) in range.rows().skip(1).enumerate() {
        let cells: Vec<Cell> = row.iter().map(convert_cell).collect();

        if cells.iter().all(Cell::is_empty) {
            continue;
        }

        rows.push(RawRow {
            file: file_name.to_string(),
            row: index + 1,
            cells,
        });
    }

    Ok(rows)
}

/// Map a calamine cell onto the loader's cell model
fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => {
            if s.trim().is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => {
            // calamine exposes the raw serial; convert via the 1900 epoch
            match excel_serial_to_date(dt.as_f64()) {
                Some(date) => Cell::Date(date),
                None => Cell::Number(dt.as_f64()),
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        // Formula errors (#REF! etc.) carry no usable value
        Data::Error(_) => Cell::Empty,
    }
}

/// Convert an Excel serial date (1900 date system) to a calendar date
///
/// Excel day 1 is 1900-01-01, with the epoch shifted to 1899-12-30 to
/// absorb the fictitious 1900-02-29. Serials outside a plausible range
/// are not dates.
pub(crate) fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=2_958_465.0).contains(&serial) {
        // 2958465 = 9999-12-31
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(chrono::Days::new(serial.trunc() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("a.csv")), Some(FileFormat::Csv));
        assert_eq!(detect_format(Path::new("a.CSV")), Some(FileFormat::Csv));
        assert_eq!(detect_format(Path::new("a.xlsx")), Some(FileFormat::Xlsx));
        assert_eq!(detect_format(Path::new("a.xls")), Some(FileFormat::Xlsx));
        assert_eq!(detect_format(Path::new("a.pdf")), None);
        assert_eq!(detect_format(Path::new("noext")), None);
    }

    #[test]
    fn test_excel_serial_to_date() {
        // 2023-01-15 is serial 44941
        assert_eq!(
            excel_serial_to_date(44941.0),
            NaiveDate::from_ymd_opt(2023, 1, 15)
        );
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(excel_serial_to_date(-5.0), None);
        assert_eq!(excel_serial_to_date(99_999_999.0), None);
    }

    #[test]
    fn test_load_csv_skips_header_and_blank_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(
            &path,
            "Date,Type,Memo\n2023-01-15,Buy,first\n,,\n2023-01-16,Sell,second\n",
        )
        .unwrap();

        let rows = load_rows(dir.path(), "data.csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 1);
        // The blank row is skipped but still counted
        assert_eq!(rows[1].row, 3);
        assert_eq!(
            rows[0].cell(0),
            &Cell::Text("2023-01-15".to_string())
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_rows(dir.path(), "nope.csv").unwrap_err();
        assert_eq!(err.kind, crate::models::ErrorKind::LoadError);
        assert_eq!(err.file, "nope.csv");
    }

    #[test]
    fn test_load_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.pdf");
        std::fs::write(&path, "whatever").unwrap();
        let err = load_rows(dir.path(), "data.pdf").unwrap_err();
        assert_eq!(err.kind, crate::models::ErrorKind::LoadError);
    }

    #[test]
    fn test_load_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "Date,Type,Memo\n").unwrap();
        let err = load_rows(dir.path(), "empty.csv").unwrap_err();
        assert_eq!(err.kind, crate::models::ErrorKind::LoadError);
        assert!(err.error.contains("no data rows"));
    }

    #[test]
    fn test_load_windows_1252_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        // "Café" in Windows-1252: é = 0xE9, invalid as UTF-8
        file.write_all(b"Date,Description\n2023-01-15,Caf\xe9 dividend\n")
            .unwrap();
        drop(file);

        let rows = load_rows(dir.path(), "latin.csv").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].cell(1),
            &Cell::Text("Café dividend".to_string())
        );
    }

    #[test]
    fn test_load_corrupt_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.xlsx");
        std::fs::write(&path, b"this is not a zip container").unwrap();
        let err = load_rows(dir.path(), "corrupt.xlsx").unwrap_err();
        assert_eq!(err.kind, crate::models::ErrorKind::LoadError);
        assert_eq!(err.file, "corrupt.xlsx");
    }
}
