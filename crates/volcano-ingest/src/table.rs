//! Delimited table reading for the registry and mapping files.
//!
//! Registry exports sometimes carry a title line above the real header, so the
//! header row is located by looking for a required column among the first rows.

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

/// Rows probed when looking for the header.
const HEADER_PROBE_ROWS: usize = 5;

/// A small in-memory table of trimmed string cells.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Index of a column, matched case-insensitively on normalized headers.
    pub fn column(&self, name: &str) -> Option<usize> {
        let wanted = normalize_header(name);
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(&wanted))
    }

    /// Index of a column that must exist.
    pub fn require_column(&self, name: &str, path: &Path) -> Result<usize> {
        self.column(name).ok_or_else(|| IngestError::MissingColumn {
            column: name.to_string(),
            path: path.to_path_buf(),
        })
    }

    /// Cell value, empty when the row is short.
    pub fn cell<'a>(row: &'a [String], index: usize) -> &'a str {
        row.get(index).map(String::as_str).unwrap_or("")
    }

    /// Cell value for an optional column.
    pub fn optional_cell<'a>(row: &'a [String], index: Option<usize>) -> &'a str {
        index.map_or("", |idx| Self::cell(row, idx))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Picks the first probed row that contains `required_column`.
fn detect_header_row(rows: &[Vec<String>], required_column: &str) -> Option<usize> {
    let wanted = normalize_header(required_column);
    rows.iter().take(HEADER_PROBE_ROWS).position(|row| {
        row.iter()
            .any(|cell| normalize_header(cell).eq_ignore_ascii_case(&wanted))
    })
}

/// Reads a delimited file whose header row contains `required_column`.
pub fn read_csv_table(path: &Path, delimiter: u8, required_column: &str) -> Result<CsvTable> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::file_read(path, e))?;
    read_csv_bytes(&bytes, path, delimiter, required_column)
}

pub(crate) fn read_csv_bytes(
    bytes: &[u8],
    path: &Path,
    delimiter: u8,
    required_column: &str,
) -> Result<CsvTable> {
    let text = crate::encoding::decode_text(bytes);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    if raw_rows.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    let header_index =
        detect_header_row(&raw_rows, required_column).ok_or_else(|| {
            IngestError::NoHeaderDetected {
                path: path.to_path_buf(),
                column: required_column.to_string(),
            }
        })?;
    let headers: Vec<String> = raw_rows[header_index]
        .iter()
        .map(|value| normalize_header(value))
        .collect();
    let rows = raw_rows
        .into_iter()
        .skip(header_index + 1)
        .map(|mut row| {
            row.resize(headers.len(), String::new());
            row
        })
        .collect();
    Ok(CsvTable { headers, rows })
}
