use crate::error::{EasyRegError, EasyRegResult};
use crate::types::{CellValue, RawRow};
use std::path::Path;

/// Parse a JSON row document: an array of objects, one object per row.
///
/// Object keys become column names in document order. `null` is an empty
/// cell; nested arrays and objects are kept as their JSON text.
///
/// # Example
/// ```
/// use easyreg::parser::parse_json_rows;
///
/// let rows = parse_json_rows(r#"[{"Name": "Ann", "Age": 30}]"#)?;
/// assert_eq!(rows[0]["Name"].to_string(), "Ann");
/// # Ok::<(), easyreg::error::EasyRegError>(())
/// ```
pub fn parse_json_rows(content: &str) -> EasyRegResult<Vec<RawRow>> {
    let document: serde_json::Value = serde_json::from_str(content)?;
    let serde_json::Value::Array(items) = document else {
        return Err(EasyRegError::Decode(
            "expected a JSON array of row objects".to_string(),
        ));
    };

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| match item {
            serde_json::Value::Object(fields) => Ok(fields
                .iter()
                .map(|(key, value)| (key.clone(), json_cell(value)))
                .collect()),
            other => Err(EasyRegError::Decode(format!(
                "row {} is not an object: {}",
                idx, other
            ))),
        })
        .collect()
}

/// Parse a YAML row document: a sequence of mappings, one mapping per row.
pub fn parse_yaml_rows(content: &str) -> EasyRegResult<Vec<RawRow>> {
    let document: serde_yaml::Value = serde_yaml::from_str(content)?;
    let items = match document {
        serde_yaml::Value::Sequence(items) => items,
        // An empty file parses as null
        serde_yaml::Value::Null => Vec::new(),
        _ => {
            return Err(EasyRegError::Decode(
                "expected a YAML sequence of row mappings".to_string(),
            ))
        }
    };

    let mut rows = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let serde_yaml::Value::Mapping(fields) = item else {
            return Err(EasyRegError::Decode(format!(
                "row {} is not a mapping",
                idx
            )));
        };

        let mut row = RawRow::new();
        for (key, value) in fields {
            let key = match yaml_scalar_text(key) {
                Some(key) => key,
                None => {
                    return Err(EasyRegError::Decode(format!(
                        "row {} has a non-scalar key",
                        idx
                    )))
                }
            };
            row.insert(key, yaml_cell(value));
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Sheet name for a single-sheet document: the file stem
pub fn sheet_name_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("Sheet1")
        .to_string()
}

fn json_cell(value: &serde_json::Value) -> CellValue {
    match value {
        serde_json::Value::Null => CellValue::Empty,
        serde_json::Value::Bool(b) => CellValue::Bool(*b),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(n.to_string())),
        serde_json::Value::String(s) => CellValue::Text(s.clone()),
        nested => CellValue::Text(nested.to_string()),
    }
}

fn yaml_cell(value: &serde_yaml::Value) -> CellValue {
    match value {
        serde_yaml::Value::Null => CellValue::Empty,
        serde_yaml::Value::Bool(b) => CellValue::Bool(*b),
        serde_yaml::Value::Number(n) => n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(n.to_string())),
        serde_yaml::Value::String(s) => CellValue::Text(s.clone()),
        serde_yaml::Value::Tagged(tagged) => yaml_cell(&tagged.value),
        nested => serde_json::to_string(nested)
            .map(CellValue::Text)
            .unwrap_or(CellValue::Empty),
    }
}

fn yaml_scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
