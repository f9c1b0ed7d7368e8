//! Decoded workbook: sheet names mapped to sheet contents

use super::importer::{self, ExcelImporter};
use crate::error::{EasyRegError, EasyRegResult};
use crate::parser;
use crate::types::RawRow;
use calamine::{Data, Range};
use indexmap::IndexMap;
use std::path::Path;
use tracing::debug;

/// Per-sheet contents, as handed over by a decoder
#[derive(Debug, Clone)]
pub enum SheetData {
    /// Cell grid from a spreadsheet; first row is the header
    Cells(Range<Data>),
    /// Rows that are already keyed by column name (JSON/YAML documents)
    Rows(Vec<RawRow>),
}

/// Input format, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Spreadsheet,
    Json,
    Yaml,
}

impl SourceFormat {
    pub fn from_filename(filename: &str) -> EasyRegResult<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "xla" | "xlam" | "ods" => Ok(Self::Spreadsheet),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(EasyRegError::UnsupportedFormat(filename.to_string())),
        }
    }
}

/// Every sheet of one opened file, in workbook order
#[derive(Debug, Clone)]
pub struct Workbook {
    source: String,
    sheets: IndexMap<String, SheetData>,
}

impl Workbook {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            sheets: IndexMap::new(),
        }
    }

    /// Single-sheet workbook from rows that are already decoded
    pub fn from_rows(source: impl Into<String>, sheet: impl Into<String>, rows: Vec<RawRow>) -> Self {
        let mut workbook = Self::new(source);
        workbook.add_sheet(sheet, SheetData::Rows(rows));
        workbook
    }

    /// Open a spreadsheet or row document from disk
    pub fn open<P: AsRef<Path>>(path: P) -> EasyRegResult<Self> {
        let path = path.as_ref();
        let filename = path.display().to_string();
        debug!(file = %filename, "opening workbook");

        match SourceFormat::from_filename(&filename)? {
            SourceFormat::Spreadsheet => ExcelImporter::new(path).import(),
            SourceFormat::Json => {
                let content = std::fs::read_to_string(path)?;
                let rows = parser::parse_json_rows(&content)?;
                Ok(Self::from_rows(&filename, parser::sheet_name_for(path), rows))
            }
            SourceFormat::Yaml => {
                let content = std::fs::read_to_string(path)?;
                let rows = parser::parse_yaml_rows(&content)?;
                Ok(Self::from_rows(&filename, parser::sheet_name_for(path), rows))
            }
        }
    }

    /// Decode an in-memory file, e.g. one received through an upload
    pub fn from_bytes(bytes: Vec<u8>, filename: &str) -> EasyRegResult<Self> {
        let sheet = parser::sheet_name_for(Path::new(filename));
        match SourceFormat::from_filename(filename)? {
            SourceFormat::Spreadsheet => importer::import_bytes(bytes, filename),
            SourceFormat::Json => {
                let content = String::from_utf8(bytes)
                    .map_err(|e| EasyRegError::Decode(format!("{filename}: {e}")))?;
                Ok(Self::from_rows(filename, sheet, parser::parse_json_rows(&content)?))
            }
            SourceFormat::Yaml => {
                let content = String::from_utf8(bytes)
                    .map_err(|e| EasyRegError::Decode(format!("{filename}: {e}")))?;
                Ok(Self::from_rows(filename, sheet, parser::parse_yaml_rows(&content)?))
            }
        }
    }

    pub fn add_sheet(&mut self, name: impl Into<String>, data: SheetData) {
        self.sheets.insert(name.into(), data);
    }

    /// Where the workbook came from (file name)
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    /// The only sheet, when there is exactly one
    pub fn single_sheet(&self) -> Option<&str> {
        match self.sheets.len() {
            1 => self.sheets.keys().next().map(String::as_str),
            _ => None,
        }
    }

    /// Rows of one sheet keyed by header name
    pub fn sheet_to_rows(&self, name: &str) -> EasyRegResult<Vec<RawRow>> {
        match self.sheets.get(name) {
            Some(SheetData::Cells(range)) => Ok(importer::range_to_rows(range)),
            Some(SheetData::Rows(rows)) => Ok(rows.clone()),
            None => Err(EasyRegError::UnknownSheet(name.to_string())),
        }
    }
}
