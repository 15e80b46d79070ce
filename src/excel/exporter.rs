//! Table exporter - rows → xlsx or csv bytes

use crate::error::{SieveError, SieveResult};
use crate::types::{cell, column_union, CellValue, Row};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::fmt;
use tracing::debug;

/// Worksheet name used for xlsx exports
pub const EXPORT_SHEET_NAME: &str = "Sheet1";

/// File stem used when no filename is given
pub const DEFAULT_FILE_STEM: &str = "download";

/// Output file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    /// `None` for anything other than `xlsx` or `csv`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "xlsx" => Some(ExportFormat::Xlsx),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv;charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// A serialized export ready to hand to the user
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

/// `<filename>.<ext>`, with `download` standing in for an empty name
pub fn file_name(filename: &str, format: ExportFormat) -> String {
    let stem = filename.trim();
    let stem = if stem.is_empty() { DEFAULT_FILE_STEM } else { stem };
    format!("{}.{}", stem, format.extension())
}

/// Serializes rows to the supported output formats
pub struct TableExporter<'a> {
    rows: &'a [Row],
    columns: Vec<String>,
}

impl<'a> TableExporter<'a> {
    pub fn new(rows: &'a [Row]) -> Self {
        Self {
            rows,
            columns: column_union(rows),
        }
    }

    /// Serialize to `format` and name the result after `filename`
    pub fn export(&self, filename: &str, format: ExportFormat) -> SieveResult<Download> {
        let bytes = match format {
            ExportFormat::Xlsx => self.to_xlsx()?,
            ExportFormat::Csv => self.to_csv()?,
        };
        let file_name = file_name(filename, format);
        debug!(%file_name, rows = self.rows.len(), bytes = bytes.len(), "export ready");
        Ok(Download {
            file_name,
            format,
            bytes,
        })
    }

    /// One `Sheet1` worksheet: header row, then one row per record
    pub fn to_xlsx(&self) -> SieveResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(EXPORT_SHEET_NAME)
            .map_err(|e| SieveError::Export(format!("Failed to set worksheet name: {}", e)))?;

        if !self.rows.is_empty() {
            for (col_idx, name) in self.columns.iter().enumerate() {
                worksheet
                    .write_string(0, column_index(col_idx)?, name)
                    .map_err(|e| SieveError::Export(format!("Failed to write header: {}", e)))?;
            }
        }

        for (row_idx, row) in self.rows.iter().enumerate() {
            let excel_row = u32::try_from(row_idx + 1)
                .map_err(|_| SieveError::Export("Too many rows for a worksheet".to_string()))?;
            for (col_idx, name) in self.columns.iter().enumerate() {
                write_cell(worksheet, excel_row, column_index(col_idx)?, cell(row, name))?;
            }
        }

        workbook
            .save_to_buffer()
            .map_err(|e| SieveError::Export(format!("Failed to save workbook: {}", e)))
    }

    /// Comma-delimited with standard quoting; absent cells are empty
    pub fn to_csv(&self) -> SieveResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if !self.rows.is_empty() {
            writer.write_record(&self.columns)?;
        }
        for row in self.rows {
            writer.write_record(self.columns.iter().map(|name| cell(row, name).to_string()))?;
        }
        writer
            .into_inner()
            .map_err(|e| SieveError::Export(format!("Failed to flush CSV: {}", e)))
    }
}

fn column_index(idx: usize) -> SieveResult<u16> {
    u16::try_from(idx).map_err(|_| SieveError::Export("Too many columns for a worksheet".to_string()))
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> SieveResult<()> {
    let result = match value {
        CellValue::Absent => return Ok(()),
        CellValue::Text(s) => worksheet.write_string(row, col, s),
        CellValue::Number(n) => worksheet.write_number(row, col, *n),
        CellValue::Bool(b) => worksheet.write_boolean(row, col, *b),
    };
    result
        .map(|_| ())
        .map_err(|e| SieveError::Export(format!("Failed to write cell: {}", e)))
}
