use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

//==============================================================================
// Cell Values
//==============================================================================

/// A loosely-typed spreadsheet cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Blank cell or explicit `null` in a row document
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Whether the value counts as present for template substitution.
    ///
    /// Empty text, zero, NaN, `false` and `Empty` are all falsy and render
    /// as the fallback marker rather than their literal form.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Bool(b) => *b,
            CellValue::Number(n) => *n != 0.0 && !n.is_nan(),
            CellValue::Text(s) => !s.is_empty(),
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "Empty",
            CellValue::Bool(_) => "Boolean",
            CellValue::Number(_) => "Number",
            CellValue::Text(_) => "Text",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Number(n) => f.write_str(&number_to_string(*n)),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Shortest round-trip form of a number, switching to exponent notation
/// outside `1e-6 <= |n| < 1e21` (`1e+21`, `1.5e-10`).
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // Covers -0 as well
        return "0".to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        // f64 Display drops a trailing ".0" (30.0 -> "30")
        return n.to_string();
    }

    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

//==============================================================================
// Rows
//==============================================================================

/// One decoded worksheet row: column name to cell value, in column order.
///
/// Blank cells are not present as keys at all.
pub type RawRow = IndexMap<String, CellValue>;

/// A worksheet row plus its selection flag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRecord {
    pub cells: RawRow,
    pub selected: bool,
}

impl RowRecord {
    /// Create a selected row from decoded cells
    pub fn new(cells: RawRow) -> Self {
        Self {
            cells,
            selected: true,
        }
    }

    /// Look up a cell by column name
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Column names present in this row, in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(CellValue::from("Ann").is_truthy());
        assert!(CellValue::from("0").is_truthy());
        assert!(CellValue::from(30.0).is_truthy());
        assert!(CellValue::from(-1.5).is_truthy());
        assert!(CellValue::from(true).is_truthy());

        assert!(!CellValue::from("").is_truthy());
        assert!(!CellValue::from(0.0).is_truthy());
        assert!(!CellValue::from(-0.0).is_truthy());
        assert!(!CellValue::Number(f64::NAN).is_truthy());
        assert!(!CellValue::from(false).is_truthy());
        assert!(!CellValue::Empty.is_truthy());
    }

    #[test]
    fn test_display_numbers() {
        assert_eq!(CellValue::from(30.0).to_string(), "30");
        assert_eq!(CellValue::from(1.5).to_string(), "1.5");
        assert_eq!(CellValue::from(-2_i64).to_string(), "-2");
        assert_eq!(CellValue::Number(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(CellValue::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(CellValue::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(CellValue::from(-0.0).to_string(), "0");
    }

    #[test]
    fn test_display_exponent_range() {
        assert_eq!(CellValue::from(1e21).to_string(), "1e+21");
        assert_eq!(CellValue::from(-2.5e22).to_string(), "-2.5e+22");
        assert_eq!(CellValue::from(1e-7).to_string(), "1e-7");
        assert_eq!(CellValue::from(-1.5e-10).to_string(), "-1.5e-10");

        // Just inside the plain range
        assert_eq!(CellValue::from(123456789012345680000.0).to_string(), "123456789012345680000");
        assert_eq!(CellValue::from(0.000001).to_string(), "0.000001");
        assert_eq!(CellValue::from(0.1 + 0.2).to_string(), "0.30000000000000004");
    }

    #[test]
    fn test_display_other() {
        assert_eq!(CellValue::from("Ann").to_string(), "Ann");
        assert_eq!(CellValue::from(true).to_string(), "true");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_deserialize_untagged() {
        let values: Vec<CellValue> =
            serde_json::from_str(r#"["Ann", 30, 1.5, true, null]"#).unwrap();
        assert_eq!(
            values,
            vec![
                CellValue::from("Ann"),
                CellValue::from(30.0),
                CellValue::from(1.5),
                CellValue::from(true),
                CellValue::Empty,
            ]
        );
    }

    #[test]
    fn test_row_record_defaults_selected() {
        let mut cells = RawRow::new();
        cells.insert("Name".to_string(), CellValue::from("Ann"));
        let row = RowRecord::new(cells);
        assert!(row.selected);
        assert_eq!(row.get("Name"), Some(&CellValue::from("Ann")));
        assert_eq!(row.get("Age"), None);
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["Name"]);
    }
}
