//! Workbook importer - spreadsheet bytes → rows

use crate::error::{SieveError, SieveResult};
use crate::types::{CellValue, Row, Rows};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::Arc;

/// Placeholder name for a blank header cell
const EMPTY_HEADER: &str = "__EMPTY";

/// A parsed workbook: its sheet names plus the raw bytes it came from.
///
/// Sheets are read on demand by re-opening the raw bytes, so the struct is
/// cheap to clone and never mutated after construction.
#[derive(Debug, Clone)]
pub struct LoadedWorkbook {
    bytes: Arc<[u8]>,
    sheet_names: Vec<String>,
}

impl LoadedWorkbook {
    /// Parse workbook bytes (xlsx, xlsm, xlsb, xls or ods)
    pub fn from_bytes(bytes: Vec<u8>) -> SieveResult<Self> {
        let sheet_names = open_workbook_auto_from_rs(Cursor::new(bytes.as_slice()))
            .map_err(|e| SieveError::Parse(format!("Failed to open workbook: {}", e)))?
            .sheet_names();
        if sheet_names.is_empty() {
            return Err(SieveError::Parse("Workbook has no sheets".to_string()));
        }

        Ok(Self {
            bytes: bytes.into(),
            sheet_names,
        })
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// The first sheet
    pub fn primary_sheet(&self) -> &str {
        self.sheet_names.first().map(String::as_str).unwrap_or_default()
    }

    /// Every sheet except the primary one
    pub fn subsheet_names(&self) -> Vec<String> {
        self.sheet_names.iter().skip(1).cloned().collect()
    }

    /// Read a sheet's rows, re-parsing the raw bytes.
    pub fn sheet_rows(&self, name: &str) -> SieveResult<Rows> {
        if !self.sheet_names.iter().any(|s| s == name) {
            return Err(SieveError::UnknownSheet(name.to_string()));
        }

        let mut workbook = open_workbook_auto_from_rs(Cursor::new(&self.bytes[..]))
            .map_err(|e| SieveError::Parse(format!("Failed to open workbook: {}", e)))?;
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| SieveError::Parse(format!("Failed to read sheet '{}': {}", name, e)))?;

        Ok(range_to_rows(&range))
    }
}

/// Convert a sheet range to rows keyed by the header row.
///
/// Every data row carries every header key; empty cells become
/// [`CellValue::Absent`]. Rows with no non-empty cell are skipped.
pub fn range_to_rows(range: &Range<Data>) -> Rows {
    let mut lines = range.rows();
    let headers = match lines.next() {
        Some(header) => header_names(header),
        None => return Vec::new(),
    };

    lines
        .filter_map(|line| {
            let row: Row = headers
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    let value = line.get(idx).map(convert_cell).unwrap_or(CellValue::Absent);
                    (name.clone(), value)
                })
                .collect();
            if row.values().all(CellValue::is_absent) {
                None
            } else {
                Some(row)
            }
        })
        .collect()
}

/// Header names with blanks filled in and duplicates suffixed (`X`, `X_1`, ...).
///
/// A suffix is skipped when a column already carries that name, so every
/// header stays unique.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .map(|cell| {
            let base = match convert_cell(cell) {
                CellValue::Absent => EMPTY_HEADER.to_string(),
                value => value.to_string(),
            };
            let mut name = base.clone();
            if used.contains(&name) {
                let suffix = next_suffix.entry(base.clone()).or_insert(1);
                loop {
                    name = format!("{}_{}", base, suffix);
                    *suffix += 1;
                    if !used.contains(&name) {
                        break;
                    }
                }
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

/// Convert a calamine cell to a [`CellValue`]
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Absent,
        Data::String(s) if s.is_empty() => CellValue::Absent,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // Date serials stay numeric
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        other => CellValue::Text(other.to_string()),
    }
}
