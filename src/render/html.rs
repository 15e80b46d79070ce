use super::{Renderer, TableView, NO_DATA_MESSAGE};
use crate::error::SieveResult;

/// Renders a view as an HTML fragment.
///
/// The fragment is kept in memory and replaced on each render.
#[derive(Debug, Default, Clone)]
pub struct HtmlRenderer {
    content: String,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently rendered fragment
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Renderer for HtmlRenderer {
    fn render(&mut self, view: &TableView) -> SieveResult<()> {
        self.content = to_html(view);
        Ok(())
    }
}

/// Render a view to an HTML `<table>`, or a paragraph when it is empty
pub fn to_html(view: &TableView) -> String {
    let (headers, rows) = match view {
        TableView::Empty => return format!("<p>{}</p>", NO_DATA_MESSAGE),
        TableView::Grid { headers, rows } => (headers, rows),
    };

    let mut out = String::from("<table>\n<tr>");
    for header in headers {
        out.push_str(&format!("<th>{}</th>", escape(header)));
    }
    out.push_str("</tr>\n");

    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>");
    out
}

/// Wrap a body fragment in a standalone HTML document
pub fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        STYLE,
        body
    )
}

const STYLE: &str = "table{border-collapse:collapse}th,td{border:1px solid #ccc;padding:4px 8px}th{background:#f4f4f4}";

/// Escape text for HTML element and attribute content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
