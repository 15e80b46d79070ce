//! Workbook load/export tests against generated .xlsx files

use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use sheet_sieve::controller::Controller;
use sheet_sieve::excel::{ExportFormat, LoadedWorkbook, TableExporter};
use sheet_sieve::filter::{FilterMode, FilterSpec};
use sheet_sieve::render::{HtmlRenderer, TableView};
use sheet_sieve::source::Source;
use sheet_sieve::types::{row, CellValue, Row};
use std::path::PathBuf;
use tempfile::TempDir;

/// `Orders` (id, email, phone, qty) + `Customers` + empty `Notes`
fn write_fixture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("orders.xlsx");
    let mut wb = Workbook::new();

    let orders = wb.add_worksheet().set_name("Orders").unwrap();
    for (col, name) in ["id", "email", "phone", "qty"].iter().enumerate() {
        orders.write_string(0, col as u16, *name).unwrap();
    }
    // id=1: email only
    orders.write_number(1, 0, 1.0).unwrap();
    orders.write_string(1, 1, "a@example.com").unwrap();
    orders.write_number(1, 3, 0.0).unwrap();
    // id=2: phone only
    orders.write_number(2, 0, 2.0).unwrap();
    orders.write_string(2, 2, "555-0100").unwrap();
    orders.write_number(2, 3, 4.0).unwrap();
    // id=3: neither
    orders.write_number(3, 0, 3.0).unwrap();
    // id=4: both, with a comma to exercise CSV quoting
    orders.write_number(4, 0, 4.0).unwrap();
    orders.write_string(4, 1, "d@example.com").unwrap();
    orders.write_string(4, 2, "555-0199, ext 2").unwrap();
    orders.write_boolean(4, 3, true).unwrap();

    let customers = wb.add_worksheet().set_name("Customers").unwrap();
    customers.write_string(0, 0, "name").unwrap();
    customers.write_string(1, 0, "Ada").unwrap();
    customers.write_string(2, 0, "Grace").unwrap();

    wb.add_worksheet().set_name("Notes").unwrap();

    wb.save(&path).unwrap();
    path
}

fn loaded(dir: &TempDir) -> Controller<HtmlRenderer> {
    let path = write_fixture(dir);
    let mut controller = Controller::new(HtmlRenderer::new());
    controller
        .load(&Source::Path(path))
        .expect("fixture should load");
    controller
}

fn ids(rows: &[Row]) -> Vec<f64> {
    rows.iter()
        .map(|r| match r["id"] {
            CellValue::Number(n) => n,
            _ => -1.0,
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// LOADING
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_load_reads_primary_and_subsheets() {
    let dir = TempDir::new().unwrap();
    let controller = loaded(&dir);
    let session = controller.session().unwrap();

    assert_eq!(session.workbook().primary_sheet(), "Orders");
    assert_eq!(
        session.subsheet_names(),
        &["Customers".to_string(), "Notes".to_string()]
    );
    assert_eq!(session.data().len(), 4);
    assert_eq!(session.data()[2]["email"], CellValue::Absent);
    assert_eq!(session.data()[2]["phone"], CellValue::Absent);
    assert_eq!(session.data()[3]["qty"], CellValue::Bool(true));
}

#[test]
fn test_every_row_carries_every_column() {
    let dir = TempDir::new().unwrap();
    let controller = loaded(&dir);
    for r in controller.session().unwrap().data() {
        assert_eq!(
            r.keys().cloned().collect::<Vec<_>>(),
            vec!["id", "email", "phone", "qty"]
        );
    }
}

#[test]
fn test_initial_render_is_primary_table() {
    let dir = TempDir::new().unwrap();
    let controller = loaded(&dir);
    let html = controller.renderer().content();
    assert!(html.contains("<th>id</th><th>email</th><th>phone</th><th>qty</th>"));
    assert!(html.contains("<td>3</td><td>N/A</td><td>N/A</td><td>N/A</td>"));
}

#[test]
fn test_load_from_bytes_matches_path() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir);
    let workbook = LoadedWorkbook::from_bytes(std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(workbook.sheet_names().len(), 3);
    assert_eq!(workbook.sheet_rows("Customers").unwrap().len(), 2);
    assert!(workbook.sheet_rows("Notes").unwrap().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// FILTERING
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_filter_null_single_column() {
    let dir = TempDir::new().unwrap();
    let mut controller = loaded(&dir);
    controller
        .apply_filter(&FilterSpec::new("id", "email", FilterMode::Null))
        .unwrap();
    assert_eq!(ids(controller.session().unwrap().filtered()), vec![2.0, 3.0]);
}

#[test]
fn test_filter_null_and_not_null_partition_rows() {
    let dir = TempDir::new().unwrap();
    let mut controller = loaded(&dir);

    controller
        .apply_filter(&FilterSpec::new("id", "phone", FilterMode::Null))
        .unwrap();
    let null = ids(controller.session().unwrap().filtered());

    controller
        .apply_filter(&FilterSpec::new("id", "phone", FilterMode::NotNull))
        .unwrap();
    let not_null = ids(controller.session().unwrap().filtered());

    assert_eq!(null, vec![1.0, 3.0]);
    assert_eq!(not_null, vec![2.0, 4.0]);
}

#[test]
fn test_filter_multiple_columns_require_all() {
    let dir = TempDir::new().unwrap();
    let mut controller = loaded(&dir);
    controller
        .apply_filter(&FilterSpec::new("id", "email,phone", FilterMode::NotNull))
        .unwrap();
    assert_eq!(ids(controller.session().unwrap().filtered()), vec![4.0]);
}

#[test]
fn test_zero_quantity_is_a_value_unless_coerced() {
    let dir = TempDir::new().unwrap();
    let mut controller = loaded(&dir);

    controller
        .apply_filter(&FilterSpec::new("id", "qty", FilterMode::Null))
        .unwrap();
    assert_eq!(ids(controller.session().unwrap().filtered()), vec![3.0]);

    controller
        .apply_filter(&FilterSpec::new("id", "qty", FilterMode::Null).with_coerce_falsy(true))
        .unwrap();
    assert_eq!(ids(controller.session().unwrap().filtered()), vec![1.0, 3.0]);
}

// ═══════════════════════════════════════════════════════════════════════════
// SUBSHEETS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_select_subsheet_renders_its_rows() {
    let dir = TempDir::new().unwrap();
    let mut controller = loaded(&dir);
    controller.select_subsheet(Some("Customers")).unwrap();
    let html = controller.renderer().content();
    assert!(html.contains("<th>name</th>"));
    assert!(html.contains("<td>Grace</td>"));
}

#[test]
fn test_select_empty_subsheet_renders_placeholder() {
    let dir = TempDir::new().unwrap();
    let mut controller = loaded(&dir);
    controller.select_subsheet(Some("Notes")).unwrap();
    assert_eq!(controller.renderer().content(), "<p>No data available.</p>");
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_csv_round_trip_preserves_rows_and_columns() {
    let dir = TempDir::new().unwrap();
    let controller = loaded(&dir);
    let download = controller.export("orders", "csv").unwrap().unwrap();
    assert_eq!(download.file_name, "orders.csv");

    let mut reader = csv::Reader::from_reader(download.bytes.as_slice());
    let headers: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();

    assert_eq!(headers, vec!["id", "email", "phone", "qty"]);
    assert_eq!(records.len(), 4);
    assert_eq!(&records[3][2], "555-0199, ext 2");
    assert_eq!(&records[2][1], "");
}

#[test]
fn test_xlsx_export_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut controller = loaded(&dir);
    controller
        .apply_filter(&FilterSpec::new("id", "email", FilterMode::NotNull))
        .unwrap();

    let download = controller.export("", "xlsx").unwrap().unwrap();
    assert_eq!(download.file_name, "download.xlsx");

    let reimported = LoadedWorkbook::from_bytes(download.bytes).unwrap();
    assert_eq!(reimported.sheet_names(), &["Sheet1".to_string()]);
    let rows = reimported.sheet_rows("Sheet1").unwrap();
    assert_eq!(rows, *controller.session().unwrap().filtered());
}

#[test]
fn test_export_empty_filter_result() {
    let rows: Vec<Row> = Vec::new();
    let download = TableExporter::new(&rows)
        .export("empty", ExportFormat::Xlsx)
        .unwrap();
    let reimported = LoadedWorkbook::from_bytes(download.bytes).unwrap();
    assert!(reimported.sheet_rows("Sheet1").unwrap().is_empty());
}

#[test]
fn test_scenario_from_two_row_table() {
    let rows = vec![
        row([("A", CellValue::Number(1.0)), ("B", CellValue::Absent)]),
        row([("A", CellValue::Number(2.0)), ("B", CellValue::Number(3.0))]),
    ];
    let kept = sheet_sieve::filter::apply(&rows, &FilterSpec::new("A", "B", FilterMode::Null));
    assert_eq!(
        kept,
        vec![row([("A", CellValue::Number(1.0)), ("B", CellValue::Absent)])]
    );
    assert_eq!(
        TableView::from_rows(&kept).headers(),
        &["A".to_string(), "B".to_string()]
    );
}
