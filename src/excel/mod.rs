//! Spreadsheet import/export
//!
//! - Import: workbook bytes (.xlsx, .xls, .ods, ...) → rows
//! - Export: rows → .xlsx or .csv

mod exporter;
mod importer;

pub use exporter::{file_name, Download, ExportFormat, TableExporter, DEFAULT_FILE_STEM};
pub use importer::{range_to_rows, LoadedWorkbook};
