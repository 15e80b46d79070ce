use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

//==============================================================================
// Cell values
//==============================================================================

/// A single cell read from a sheet.
///
/// `Absent` is the explicit absence marker: a missing or empty cell is stored
/// as `Absent` rather than being left out of the row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Absent,
}

impl CellValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }

    /// Zero, the empty string and `false`, plus the absence marker itself.
    pub fn is_falsy(&self) -> bool {
        match self {
            CellValue::Absent => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(n) => *n == 0.0 || n.is_nan(),
            CellValue::Bool(b) => !b,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Absent => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// Format a number for display, dropping a trailing `.0` on whole values
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

//==============================================================================
// Rows and tables
//==============================================================================

/// Column name → value, in header order
pub type Row = IndexMap<String, CellValue>;

/// An ordered sequence of rows from one sheet
pub type Rows = Vec<Row>;

/// Build a row from `(column, value)` pairs, keeping their order.
pub fn row<K, V, I>(cells: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<CellValue>,
{
    cells
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Read a column from a row. Unknown columns read as the absence marker.
pub fn cell<'a>(row: &'a Row, column: &str) -> &'a CellValue {
    static ABSENT: CellValue = CellValue::Absent;
    row.get(column).unwrap_or(&ABSENT)
}

/// Union of the keys of all rows, in first-appearance order.
pub fn column_union(rows: &[Row]) -> Vec<String> {
    let mut columns: IndexMap<&str, ()> = IndexMap::new();
    for r in rows {
        for key in r.keys() {
            columns.entry(key.as_str()).or_insert(());
        }
    }
    columns.into_keys().map(str::to_string).collect()
}
