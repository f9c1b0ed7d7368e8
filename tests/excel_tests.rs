//! Spreadsheet decoding tests against real .xlsx files

use easyreg::core::Session;
use easyreg::excel::{ExcelImporter, Workbook};
use easyreg::{CellValue, EasyRegError};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Two sheets: "People" with a header and three rows, "Empty" with nothing
fn write_people_xlsx(dir: &Path) -> PathBuf {
    let path = dir.join("people.xlsx");
    let mut book = XlsxWorkbook::new();

    let people = book.add_worksheet();
    people.set_name("People").unwrap();
    people.write_string(0, 0, "Name").unwrap();
    people.write_string(0, 1, "Age").unwrap();
    people.write_string(0, 2, "Member").unwrap();
    people.write_string(1, 0, "Ann").unwrap();
    people.write_number(1, 1, 30).unwrap();
    people.write_boolean(1, 2, true).unwrap();
    people.write_string(2, 0, "Bo").unwrap();
    people.write_number(2, 1, 0).unwrap();
    people.write_boolean(2, 2, false).unwrap();
    // Row 3 left blank on purpose
    people.write_string(4, 0, "Cy").unwrap();
    people.write_number(4, 1, 41.5).unwrap();

    let empty = book.add_worksheet();
    empty.set_name("Empty").unwrap();

    book.save(&path).unwrap();
    path
}

fn write_single_sheet_xlsx(dir: &Path) -> PathBuf {
    let path = dir.join("single.xlsx");
    let mut book = XlsxWorkbook::new();
    let sheet = book.add_worksheet();
    sheet.write_string(0, 0, "Name").unwrap();
    sheet.write_string(0, 2, "Name").unwrap();
    sheet.write_string(1, 0, "Ann").unwrap();
    sheet.write_string(1, 1, "middle").unwrap();
    sheet.write_string(1, 2, "Again").unwrap();
    book.save(&path).unwrap();
    path
}

// ═══════════════════════════════════════════════════════════════════════════
// IMPORTER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_import_sheet_names_in_order() {
    let dir = TempDir::new().unwrap();
    let workbook = ExcelImporter::new(write_people_xlsx(dir.path()))
        .import()
        .unwrap();
    assert_eq!(workbook.sheet_names(), vec!["People", "Empty"]);
    assert_eq!(workbook.single_sheet(), None);
}

#[test]
fn test_import_rows() {
    let dir = TempDir::new().unwrap();
    let workbook = Workbook::open(write_people_xlsx(dir.path())).unwrap();
    let rows = workbook.sheet_to_rows("People").unwrap();

    // The blank spreadsheet row is skipped
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["Name"], CellValue::from("Ann"));
    assert_eq!(rows[0]["Age"], CellValue::Number(30.0));
    assert_eq!(rows[0]["Member"], CellValue::Bool(true));
    assert_eq!(rows[1]["Age"], CellValue::Number(0.0));
    assert_eq!(rows[2].keys().collect::<Vec<_>>(), vec!["Name", "Age"]);
}

#[test]
fn test_import_empty_sheet() {
    let dir = TempDir::new().unwrap();
    let workbook = Workbook::open(write_people_xlsx(dir.path())).unwrap();
    assert!(workbook.sheet_to_rows("Empty").unwrap().is_empty());
}

#[test]
fn test_import_header_rules() {
    let dir = TempDir::new().unwrap();
    let workbook = Workbook::open(write_single_sheet_xlsx(dir.path())).unwrap();
    let rows = workbook.sheet_to_rows("Sheet1").unwrap();
    assert_eq!(
        rows[0].keys().collect::<Vec<_>>(),
        vec!["Name", "__EMPTY", "Name_1"]
    );
}

#[test]
fn test_import_corrupt_file() {
    let result = Workbook::open("test-data/broken.xlsx");
    assert!(matches!(result, Err(EasyRegError::Decode(_))));
}

#[test]
fn test_import_from_bytes() {
    let dir = TempDir::new().unwrap();
    let bytes = std::fs::read(write_people_xlsx(dir.path())).unwrap();
    let workbook = Workbook::from_bytes(bytes, "upload.xlsx").unwrap();
    assert_eq!(workbook.sheet_names(), vec!["People", "Empty"]);
    assert_eq!(workbook.sheet_to_rows("People").unwrap().len(), 3);
}

#[test]
fn test_unsupported_extension() {
    assert!(matches!(
        Workbook::open("test-data/greeting.txt"),
        Err(EasyRegError::UnsupportedFormat(_))
    ));
}

// ═══════════════════════════════════════════════════════════════════════════
// SESSION OVER REAL FILES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_session_render_xlsx() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new();
    session.open_file(write_people_xlsx(dir.path())).unwrap();
    session.choose_sheet("People").unwrap();
    session.set_template("{Name}: {Age} ({Member})");

    assert_eq!(
        session.rendered_output(),
        vec!["Ann: 30 (true)", "Bo: - (-)", "Cy: 41.5 (-)"]
    );

    session.toggle_row(1).unwrap();
    assert_eq!(
        session.output_text(),
        "Ann: 30 (true)\nCy: 41.5 (-)"
    );
}

#[test]
fn test_session_single_sheet_auto_chosen() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new();
    session.open_file(write_single_sheet_xlsx(dir.path())).unwrap();
    assert_eq!(session.sheet_name(), Some("Sheet1"));
}

#[test]
fn test_session_failed_open_keeps_previous_data() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new();
    session.open_file(write_people_xlsx(dir.path())).unwrap();
    session.choose_sheet("People").unwrap();
    session.set_all(false).unwrap();

    assert!(session.open_file("test-data/broken.xlsx").is_err());
    assert_eq!(session.sheet_name(), Some("People"));
    assert_eq!(session.worksheet().len(), 3);
    assert_eq!(session.worksheet().selected_count(), 0);
}

#[test]
fn test_session_json_and_yaml_documents_agree() {
    let mut from_json = Session::new();
    from_json.open_file("test-data/people.json").unwrap();
    let mut from_yaml = Session::new();
    from_yaml.open_file("test-data/people.yaml").unwrap();

    for session in [&mut from_json, &mut from_yaml] {
        session.set_template("{Name} <{Email}>");
    }
    assert_eq!(from_json.rendered_output(), from_yaml.rendered_output());
    assert_eq!(
        from_json.rendered_output(),
        vec!["Ann <ann@example.com>", "Bo <->", "Cy <->"]
    );
}
