use crate::controller::Controller;
use crate::error::SieveResult;
use crate::excel::ExportFormat;
use crate::filter::FilterSpec;
use crate::render::{html, HtmlRenderer, Renderer, TableView, TerminalRenderer};
use crate::source::Source;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

/// Keeps only the most recent view, so a command draws once at the end
#[derive(Debug, Default)]
struct LatestView(Option<TableView>);

impl Renderer for LatestView {
    fn render(&mut self, view: &TableView) -> SieveResult<()> {
        self.0 = Some(view.clone());
        Ok(())
    }
}

/// Load `source` into a fresh controller
fn open(source: &str, verbose: bool) -> SieveResult<Controller<LatestView>> {
    let source = Source::parse(source);
    if verbose {
        println!("{}", format!("📖 Loading {}...", source).cyan());
    }
    let mut controller = Controller::new(LatestView::default());
    controller.load(&source)?;
    Ok(controller)
}

/// Draw the controller's latest view to the terminal, or to an HTML file
fn present(
    controller: Controller<LatestView>,
    title: &str,
    html_out: Option<PathBuf>,
) -> SieveResult<()> {
    let view = controller.into_renderer().0.unwrap_or(TableView::Empty);

    match html_out {
        Some(path) => {
            let mut renderer = HtmlRenderer::new();
            renderer.render(&view)?;
            fs::write(&path, html::document(title, renderer.content()))?;
            println!("{}", "✅ HTML written".bold().green());
            println!("   File: {}\n", path.display());
        }
        None => TerminalRenderer::stdout().render(&view)?,
    }
    Ok(())
}

/// Execute the sheets command - list the primary sheet and subsheets
pub fn sheets(source: String) -> SieveResult<()> {
    println!("{}", "📚 Sieve - Sheets".bold().green());
    println!("   Source: {}\n", source);

    let controller = open(&source, false)?;
    if let Some(session) = controller.session() {
        println!(
            "   Primary:  {}",
            session.workbook().primary_sheet().bright_blue().bold()
        );
        for name in session.subsheet_names() {
            println!("   Subsheet: {}", name.cyan());
        }
        println!();
    }
    Ok(())
}

/// Execute the view command - show the primary sheet or a subsheet
pub fn view(
    source: String,
    sheet: Option<String>,
    html_out: Option<PathBuf>,
    verbose: bool,
) -> SieveResult<()> {
    println!("{}", "📊 Sieve - View".bold().green());
    println!("   Source: {}", source);
    if let Some(ref name) = sheet {
        println!("   Sheet:  {}", name.bright_yellow());
    }
    println!();

    let mut controller = open(&source, verbose)?;
    if let Some(ref name) = sheet {
        controller.select_subsheet(Some(name))?;
    }
    present(controller, &source, html_out)
}

/// Execute the filter command - keep rows by column presence/absence
pub fn filter(
    source: String,
    spec: FilterSpec,
    html_out: Option<PathBuf>,
    verbose: bool,
) -> SieveResult<()> {
    println!("{}", "🔎 Sieve - Filter".bold().green());
    println!("   Source:  {}", source);
    println!(
        "   Columns: {}",
        spec.operation_columns.join(", ").bright_blue()
    );
    println!("   Mode:    {}\n", spec.mode.to_string().bright_yellow());

    let mut controller = open(&source, verbose)?;
    controller.apply_filter(&spec)?;

    if verbose {
        if let Some(session) = controller.session() {
            println!(
                "   Kept {} of {} rows\n",
                session.filtered().len(),
                session.data().len()
            );
        }
    }
    present(controller, &source, html_out)
}

/// Execute the export command - write the (optionally filtered) rows to a file
pub fn export(
    source: String,
    spec: Option<FilterSpec>,
    format: String,
    filename: String,
    out_dir: PathBuf,
    verbose: bool,
) -> SieveResult<()> {
    println!("{}", "💾 Sieve - Export".bold().green());
    println!("   Source: {}", source);
    println!("   Format: {}\n", format);

    let mut controller = open(&source, verbose)?;

    if let Some(ref spec) = spec {
        if verbose {
            println!("{}", "🔎 Applying filter...".cyan());
        }
        controller.apply_filter(spec)?;
    }

    let Some(download) = controller.export(&filename, &format)? else {
        if verbose && ExportFormat::parse(&format).is_none() {
            println!("{}", format!("⚠️  Unrecognized format '{}'", format).yellow());
        }
        return Ok(());
    };

    fs::create_dir_all(&out_dir)?;
    let path = out_dir.join(&download.file_name);
    fs::write(&path, &download.bytes)?;

    if let Some(session) = controller.session() {
        let count = session.filtered().len();
        let noun = if count == 1 { "row" } else { "rows" };
        println!(
            "{}",
            format!("✅ Exported {} {}", count, noun).bold().green()
        );
    }
    println!("   File: {}\n", path.display());
    Ok(())
}
