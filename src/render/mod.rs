//! Table views and the renderers that draw them
//!
//! [`TableView::from_rows`] is the pure rows → view mapping; a [`Renderer`]
//! turns a view into output. The controller calls its renderer after every
//! state change, and each call replaces whatever was drawn before.

pub mod html;
mod terminal;

pub use html::HtmlRenderer;
pub use terminal::TerminalRenderer;

use crate::error::SieveResult;
use crate::types::{CellValue, Row};

/// Shown in place of an absent cell
pub const ABSENT_PLACEHOLDER: &str = "N/A";

/// Shown instead of a table when there are no rows
pub const NO_DATA_MESSAGE: &str = "No data available.";

/// What a renderer draws
#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    Empty,
    Grid {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl TableView {
    /// Headers come from the first row; later rows are read in that key
    /// order without reconciling their key sets.
    pub fn from_rows(rows: &[Row]) -> Self {
        let Some(first) = rows.first() else {
            return TableView::Empty;
        };

        let headers: Vec<String> = first.keys().cloned().collect();
        let rows = rows
            .iter()
            .map(|row| row.values().map(display_cell).collect())
            .collect();

        TableView::Grid { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        match self {
            TableView::Empty => &[],
            TableView::Grid { headers, .. } => headers,
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            TableView::Empty => 0,
            TableView::Grid { rows, .. } => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TableView::Empty)
    }
}

fn display_cell(value: &CellValue) -> String {
    match value {
        CellValue::Absent => ABSENT_PLACEHOLDER.to_string(),
        other => other.to_string(),
    }
}

/// A view layer the controller draws through
pub trait Renderer {
    fn render(&mut self, view: &TableView) -> SieveResult<()>;
}
