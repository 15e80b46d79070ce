//! Session state and the operations that move it forward
//!
//! A [`Controller`] owns everything one viewing session needs: the loaded
//! workbook, the primary table, the current filter result and the renderer.
//! It starts out [`Phase::Pending`]; filter, select and export are refused
//! until a workbook has been installed.

use crate::error::{SieveError, SieveResult};
use crate::excel::{Download, ExportFormat, LoadedWorkbook, TableExporter};
use crate::filter::{self, FilterSpec};
use crate::loader;
use crate::render::{Renderer, TableView};
use crate::source::Source;
use crate::types::Rows;
use tracing::{debug, error, info};

/// Whether a workbook has been loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Ready,
}

/// What is currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Displayed {
    /// The filter result (initially the whole primary table)
    Filtered,
    /// The unfiltered primary table
    Primary,
    /// A subsheet's raw rows
    Subsheet(String),
}

/// State of a loaded session
#[derive(Debug, Clone)]
pub struct Session {
    workbook: LoadedWorkbook,
    data: Rows,
    filtered: Rows,
    subsheet_names: Vec<String>,
    displayed: Displayed,
}

impl Session {
    fn new(workbook: LoadedWorkbook) -> SieveResult<Self> {
        let data = workbook.sheet_rows(workbook.primary_sheet())?;
        let subsheet_names = workbook.subsheet_names();
        Ok(Self {
            filtered: data.clone(),
            workbook,
            data,
            subsheet_names,
            displayed: Displayed::Filtered,
        })
    }

    pub fn workbook(&self) -> &LoadedWorkbook {
        &self.workbook
    }

    /// Rows of the primary sheet
    pub fn data(&self) -> &Rows {
        &self.data
    }

    /// Result of the last filter run
    pub fn filtered(&self) -> &Rows {
        &self.filtered
    }

    pub fn subsheet_names(&self) -> &[String] {
        &self.subsheet_names
    }

    pub fn displayed(&self) -> &Displayed {
        &self.displayed
    }
}

/// Drives one session and draws each state through `R`
pub struct Controller<R: Renderer> {
    renderer: R,
    session: Option<Session>,
}

impl<R: Renderer> Controller<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            session: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.session.is_some() {
            Phase::Ready
        } else {
            Phase::Pending
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase() == Phase::Ready
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Fetch, parse and install the workbook at `source`.
    ///
    /// Failures are logged and leave the controller untouched.
    pub fn load(&mut self, source: &Source) -> SieveResult<()> {
        let result = loader::load(source).and_then(|workbook| self.install(workbook));
        if let Err(e) = &result {
            error!(%source, error = %e, "failed to load workbook");
        }
        result
    }

    /// Read the primary sheet of an already parsed workbook and show it.
    pub fn install(&mut self, workbook: LoadedWorkbook) -> SieveResult<()> {
        let session = Session::new(workbook)?;
        info!(
            rows = session.data.len(),
            subsheets = session.subsheet_names.len(),
            "session ready"
        );
        let view = TableView::from_rows(&session.filtered);
        self.session = Some(session);
        self.renderer.render(&view)
    }

    /// Replace the filter result with the rows of the primary table that
    /// match `spec`, then show it.
    pub fn apply_filter(&mut self, spec: &FilterSpec) -> SieveResult<()> {
        let session = self.session.as_mut().ok_or(SieveError::NotReady)?;
        session.filtered = filter::apply(&session.data, spec);
        session.displayed = Displayed::Filtered;
        let view = TableView::from_rows(&session.filtered);
        self.renderer.render(&view)
    }

    /// Show a subsheet's rows, or the unfiltered primary table for `None`
    /// or an empty name. Names are matched exactly. The filter result is
    /// left alone.
    pub fn select_subsheet(&mut self, name: Option<&str>) -> SieveResult<()> {
        let session = self.session.as_mut().ok_or(SieveError::NotReady)?;

        let view = match name.filter(|n| !n.is_empty()) {
            Some(name) => {
                let rows = session.workbook.sheet_rows(name).map_err(|e| {
                    error!(sheet = name, error = %e, "failed to read subsheet");
                    e
                })?;
                debug!(sheet = name, rows = rows.len(), "subsheet selected");
                session.displayed = Displayed::Subsheet(name.to_string());
                TableView::from_rows(&rows)
            }
            None => {
                session.displayed = Displayed::Primary;
                TableView::from_rows(&session.data)
            }
        };
        self.renderer.render(&view)
    }

    /// Serialize the filter result.
    ///
    /// Returns `Ok(None)` without doing anything when `format` is not
    /// `xlsx` or `csv`.
    pub fn export(&self, filename: &str, format: &str) -> SieveResult<Option<Download>> {
        let session = self.session.as_ref().ok_or(SieveError::NotReady)?;
        let Some(format) = ExportFormat::parse(format) else {
            debug!(format, "unrecognized export format, nothing exported");
            return Ok(None);
        };
        TableExporter::new(&session.filtered)
            .export(filename, format)
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterMode;
    use crate::types::CellValue;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::Workbook;

    /// Keeps every view it is asked to draw
    #[derive(Default)]
    struct Recorder {
        views: Vec<TableView>,
    }

    impl Renderer for Recorder {
        fn render(&mut self, view: &TableView) -> SieveResult<()> {
            self.views.push(view.clone());
            Ok(())
        }
    }

    impl Recorder {
        fn last(&self) -> &TableView {
            self.views.last().unwrap()
        }
    }

    /// Primary sheet `Main` (A, B) plus `Extra` with one row and an empty `Blank`
    fn workbook() -> LoadedWorkbook {
        let mut wb = Workbook::new();
        let main = wb.add_worksheet().set_name("Main").unwrap();
        main.write_string(0, 0, "A").unwrap();
        main.write_string(0, 1, "B").unwrap();
        main.write_number(1, 0, 1.0).unwrap();
        main.write_number(2, 0, 2.0).unwrap();
        main.write_number(2, 1, 3.0).unwrap();

        let extra = wb.add_worksheet().set_name("Extra").unwrap();
        extra.write_string(0, 0, "C").unwrap();
        extra.write_string(1, 0, "hello").unwrap();

        wb.add_worksheet().set_name("Blank").unwrap();

        LoadedWorkbook::from_bytes(wb.save_to_buffer().unwrap()).unwrap()
    }

    fn ready() -> Controller<Recorder> {
        let mut controller = Controller::new(Recorder::default());
        controller.install(workbook()).unwrap();
        controller
    }

    #[test]
    fn test_pending_until_installed() {
        let controller = Controller::new(Recorder::default());
        assert_eq!(controller.phase(), Phase::Pending);
        assert!(controller.session().is_none());
    }

    #[test]
    fn test_operations_refused_before_load() {
        let mut controller = Controller::new(Recorder::default());
        let spec = FilterSpec::new("A", "B", FilterMode::Null);
        assert!(matches!(controller.apply_filter(&spec), Err(SieveError::NotReady)));
        assert!(matches!(controller.select_subsheet(None), Err(SieveError::NotReady)));
        assert!(matches!(controller.export("x", "csv"), Err(SieveError::NotReady)));
        assert!(controller.renderer().views.is_empty());
    }

    #[test]
    fn test_install_renders_primary() {
        let controller = ready();
        let session = controller.session().unwrap();

        assert!(controller.is_ready());
        assert_eq!(session.data().len(), 2);
        assert_eq!(session.filtered(), session.data());
        assert_eq!(session.subsheet_names(), &["Extra".to_string(), "Blank".to_string()]);
        assert_eq!(session.data()[0]["B"], CellValue::Absent);
        assert_eq!(controller.renderer().last().headers(), &["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_load_failure_leaves_pending() {
        let mut controller = Controller::new(Recorder::default());
        let result = controller.load(&Source::parse("no/such/book.xlsx"));
        assert!(result.is_err());
        assert_eq!(controller.phase(), Phase::Pending);
        assert!(controller.renderer().views.is_empty());
    }

    #[test]
    fn test_filter_scenario() {
        let mut controller = ready();
        controller
            .apply_filter(&FilterSpec::new("A", "B", FilterMode::Null))
            .unwrap();

        let session = controller.session().unwrap();
        assert_eq!(session.filtered().len(), 1);
        assert_eq!(session.filtered()[0]["A"], CellValue::Number(1.0));
        assert_eq!(session.displayed(), &Displayed::Filtered);
        assert_eq!(controller.renderer().last().row_count(), 1);
    }

    #[test]
    fn test_filter_always_starts_from_primary_table() {
        let mut controller = ready();
        controller
            .apply_filter(&FilterSpec::new("A", "B", FilterMode::Null))
            .unwrap();
        controller
            .apply_filter(&FilterSpec::new("A", "B", FilterMode::NotNull))
            .unwrap();
        let session = controller.session().unwrap();
        assert_eq!(session.filtered().len(), 1);
        assert_eq!(session.filtered()[0]["A"], CellValue::Number(2.0));
    }

    #[test]
    fn test_select_subsheet() {
        let mut controller = ready();
        controller.select_subsheet(Some("Extra")).unwrap();

        let view = controller.renderer().last();
        assert_eq!(view.headers(), &["C".to_string()]);
        assert_eq!(view.row_count(), 1);
        assert_eq!(
            controller.session().unwrap().displayed(),
            &Displayed::Subsheet("Extra".to_string())
        );
        // filter result untouched
        assert_eq!(controller.session().unwrap().filtered().len(), 2);
    }

    #[test]
    fn test_select_empty_subsheet_shows_no_data() {
        let mut controller = ready();
        controller.select_subsheet(Some("Blank")).unwrap();
        assert_eq!(controller.renderer().last(), &TableView::Empty);
    }

    #[test]
    fn test_clear_selection_shows_unfiltered_primary() {
        let mut controller = ready();
        controller
            .apply_filter(&FilterSpec::new("A", "B", FilterMode::Null))
            .unwrap();
        controller.select_subsheet(Some("")).unwrap();
        assert_eq!(controller.renderer().last().row_count(), 2);
        assert_eq!(controller.session().unwrap().displayed(), &Displayed::Primary);
    }

    #[test]
    fn test_select_unknown_subsheet() {
        let mut controller = ready();
        let views_before = controller.renderer().views.len();
        let result = controller.select_subsheet(Some("Nope"));
        assert!(matches!(result, Err(SieveError::UnknownSheet(_))));
        assert_eq!(controller.renderer().views.len(), views_before);
    }

    #[test]
    fn test_select_subsheet_with_padded_name() {
        let mut wb = Workbook::new();
        let main = wb.add_worksheet().set_name("Main").unwrap();
        main.write_string(0, 0, "A").unwrap();
        main.write_number(1, 0, 1.0).unwrap();
        let padded = wb.add_worksheet().set_name(" Q1 ").unwrap();
        padded.write_string(0, 0, "Q").unwrap();
        padded.write_string(1, 0, "spring").unwrap();
        let workbook = LoadedWorkbook::from_bytes(wb.save_to_buffer().unwrap()).unwrap();

        let mut controller = Controller::new(Recorder::default());
        controller.install(workbook).unwrap();
        controller.select_subsheet(Some(" Q1 ")).unwrap();

        assert_eq!(controller.renderer().last().headers(), &["Q".to_string()]);
        assert_eq!(
            controller.session().unwrap().displayed(),
            &Displayed::Subsheet(" Q1 ".to_string())
        );
        assert!(matches!(
            controller.select_subsheet(Some("Q1")),
            Err(SieveError::UnknownSheet(_))
        ));
    }

    #[test]
    fn test_export_unknown_format_is_noop() {
        let controller = ready();
        assert_eq!(controller.export("out", "pdf").unwrap(), None);
    }

    #[test]
    fn test_export_filtered_csv() {
        let mut controller = ready();
        controller
            .apply_filter(&FilterSpec::new("A", "B", FilterMode::NotNull))
            .unwrap();
        let download = controller.export("", "csv").unwrap().unwrap();
        assert_eq!(download.file_name, "download.csv");
        assert_eq!(String::from_utf8(download.bytes).unwrap(), "A,B\n2,3\n");
    }
}
