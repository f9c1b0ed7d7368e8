//! Spreadsheet decoding
//!
//! Opens xlsx/xls/xlsb/ods files (and JSON/YAML row documents) into a
//! [`Workbook`] whose sheets can be turned into keyed rows.

mod importer;
mod workbook;

pub use importer::{import_bytes, range_to_rows, ExcelImporter};
pub use workbook::{SheetData, SourceFormat, Workbook};
