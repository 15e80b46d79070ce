//! Sheet Sieve - view, filter and export spreadsheet rows
//!
//! Loads a workbook from a URL or a local path, shows the first sheet as a
//! table, keeps the rows whose chosen columns are all absent (or all
//! present), and exports the result as `.xlsx` or `.csv`.
//!
//! # Example
//!
//! ```no_run
//! use sheet_sieve::controller::Controller;
//! use sheet_sieve::filter::{FilterMode, FilterSpec};
//! use sheet_sieve::render::TerminalRenderer;
//! use sheet_sieve::source::Source;
//!
//! let mut controller = Controller::new(TerminalRenderer::stdout());
//! controller.load(&Source::parse("inventory.xlsx"))?;
//! controller.apply_filter(&FilterSpec::new("sku", "price,stock", FilterMode::Null))?;
//!
//! if let Some(download) = controller.export("missing", "csv")? {
//!     std::fs::write(&download.file_name, &download.bytes)?;
//! }
//! # Ok::<(), sheet_sieve::error::SieveError>(())
//! ```

pub mod api;
pub mod cli;
pub mod controller;
pub mod error;
pub mod excel;
pub mod filter;
pub mod loader;
pub mod render;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use controller::{Controller, Phase};
pub use error::{SieveError, SieveResult};
pub use types::{CellValue, Row, Rows};
