//! Spreadsheet importer - xlsx/xls/xlsb/ods → Workbook

use super::workbook::{SheetData, Workbook};
use crate::error::{EasyRegError, EasyRegResult};
use crate::types::{CellValue, RawRow};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Header used for blank header cells
const EMPTY_HEADER: &str = "__EMPTY";

/// Spreadsheet importer for reading every sheet of a file
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read all sheets. Nothing is returned unless every sheet decodes.
    pub fn import(&self) -> EasyRegResult<Workbook> {
        let source = self.path.display().to_string();
        let mut sheets = open_workbook_auto(&self.path)
            .map_err(|e| EasyRegError::Decode(format!("{}: {}", source, e)))?;
        read_sheets(&mut sheets, &source)
    }
}

/// Decode a spreadsheet held in memory
pub fn import_bytes(bytes: Vec<u8>, filename: &str) -> EasyRegResult<Workbook> {
    let mut sheets = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| EasyRegError::Decode(format!("{}: {}", filename, e)))?;
    read_sheets(&mut sheets, filename)
}

fn read_sheets<RS: Read + Seek>(sheets: &mut Sheets<RS>, source: &str) -> EasyRegResult<Workbook> {
    let mut workbook = Workbook::new(source);

    for sheet_name in sheets.sheet_names() {
        let range = sheets
            .worksheet_range(&sheet_name)
            .map_err(|e| EasyRegError::Decode(format!("{}, sheet '{}': {}", source, sheet_name, e)))?;
        debug!(sheet = %sheet_name, size = ?range.get_size(), "decoded sheet");
        workbook.add_sheet(sheet_name, SheetData::Cells(range));
    }

    Ok(workbook)
}

/// Convert a cell grid to rows keyed by the header row.
///
/// Blank cells are left out of a row's mapping and rows with no
/// non-blank cell are dropped entirely.
pub fn range_to_rows(range: &Range<Data>) -> Vec<RawRow> {
    let mut rows = range.rows();
    let Some(header_cells) = rows.next() else {
        return Vec::new();
    };
    let headers = header_names(header_cells);

    rows.filter_map(|cells| {
        let row: RawRow = headers
            .iter()
            .zip(cells)
            .filter_map(|(header, cell)| cell_value(cell).map(|value| (header.clone(), value)))
            .collect();
        (!row.is_empty()).then_some(row)
    })
    .collect()
}

/// Header names for the first row: blanks become `__EMPTY`, repeats get `_1`, `_2`, ...
fn header_names(cells: &[Data]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    cells
        .iter()
        .map(|cell| {
            let text = match cell {
                Data::Error(e) => e.to_string(),
                _ => cell_value(cell).map(|v| v.to_string()).unwrap_or_default(),
            };
            let base = if text.is_empty() {
                EMPTY_HEADER.to_string()
            } else {
                text
            };

            let Some(mut next) = counts.get(&base).copied() else {
                counts.insert(base.clone(), 1);
                return base;
            };

            let mut name = format!("{}_{}", base, next);
            next += 1;
            while counts.contains_key(&name) {
                name = format!("{}_{}", base, next);
                next += 1;
            }
            counts.insert(base, next);
            counts.insert(name.clone(), 1);
            name
        })
        .collect()
}

/// Convert one calamine cell; `None` for blanks
fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        // Dates stay as their serial number
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        // Error cells carry no value, like blanks
        Data::Error(_) => None,
    }
}
