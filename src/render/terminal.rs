use super::{Renderer, TableView, NO_DATA_MESSAGE};
use crate::error::SieveResult;
use colored::Colorize;
use std::io::Write;

/// Renders a view as an aligned plain-text table
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl TerminalRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &TableView) -> SieveResult<()> {
        let (headers, rows) = match view {
            TableView::Empty => {
                writeln!(self.out, "{}", NO_DATA_MESSAGE.yellow())?;
                return Ok(());
            }
            TableView::Grid { headers, rows } => (headers, rows),
        };

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (idx, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(idx) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let header_line = headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:<w$}", h, w = *w))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(self.out, "{}", header_line.bold().cyan())?;

        let rule: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        writeln!(self.out, "{}", "─".repeat(rule))?;

        for row in rows {
            let line = row
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<w$}", c, w = *w))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(self.out, "{}", line.trim_end())?;
        }
        let noun = if rows.len() == 1 { "row" } else { "rows" };
        writeln!(self.out, "\n{} {}", rows.len(), noun)?;
        Ok(())
    }
}
