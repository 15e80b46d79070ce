//! Presence/absence row filter

use crate::types::{cell, CellValue, Row};
use std::fmt;
use tracing::{debug, trace};

/// Which state every operation column must be in for a row to be kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Keep rows where every operation column is absent
    Null,
    /// Keep rows where every operation column is present
    #[default]
    NotNull,
}

impl FilterMode {
    /// `null` selects [`FilterMode::Null`]; any other value is non-null.
    pub fn parse(s: &str) -> Self {
        if s.trim() == "null" {
            FilterMode::Null
        } else {
            FilterMode::NotNull
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Null => write!(f, "null"),
            FilterMode::NotNull => write!(f, "not-null"),
        }
    }
}

/// One filter request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSpec {
    /// Read for every row but does not decide inclusion
    pub primary_column: String,
    pub operation_columns: Vec<String>,
    pub mode: FilterMode,
    /// Treat zero, `""` and `false` as absent
    pub coerce_falsy: bool,
}

impl FilterSpec {
    pub fn new(primary_column: &str, operation_columns: &str, mode: FilterMode) -> Self {
        Self {
            primary_column: primary_column.trim().to_string(),
            operation_columns: split_columns(operation_columns),
            mode,
            coerce_falsy: false,
        }
    }

    pub fn with_coerce_falsy(mut self, coerce: bool) -> Self {
        self.coerce_falsy = coerce;
        self
    }

    /// Whether `row` passes every operation column check
    pub fn matches(&self, row: &Row) -> bool {
        let primary = self.read(row, &self.primary_column);
        trace!(column = %self.primary_column, value = ?primary, "primary value");

        self.operation_columns.iter().all(|col| {
            let absent = self.read(row, col).is_absent();
            match self.mode {
                FilterMode::Null => absent,
                FilterMode::NotNull => !absent,
            }
        })
    }

    fn read<'a>(&self, row: &'a Row, column: &str) -> &'a CellValue {
        static ABSENT: CellValue = CellValue::Absent;
        let value = cell(row, column);
        if self.coerce_falsy && value.is_falsy() {
            &ABSENT
        } else {
            value
        }
    }
}

/// Split a comma-separated column list, trimming each name.
///
/// Empty input gives a single empty name, which reads as absent in every row.
pub fn split_columns(list: &str) -> Vec<String> {
    list.split(',').map(|c| c.trim().to_string()).collect()
}

/// Keep the rows of `rows` that match `spec`, preserving order.
pub fn apply(rows: &[Row], spec: &FilterSpec) -> Vec<Row> {
    let kept: Vec<Row> = rows.iter().filter(|r| spec.matches(r)).cloned().collect();
    debug!(
        mode = %spec.mode,
        columns = ?spec.operation_columns,
        kept = kept.len(),
        total = rows.len(),
        "filter applied"
    );
    kept
}
