//! Template interpolation
//!
//! A template is plain text with `{Column}` placeholders. The key is the
//! text between the braces, verbatim (surrounding whitespace included). A
//! placeholder whose cell is missing or falsy renders as [`FALLBACK_MARKER`].
//! Rendering never fails.

use super::worksheet::Worksheet;
use crate::types::RowRecord;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Substituted for missing, empty, zero or `false` cells
pub const FALLBACK_MARKER: &str = "-";

// Shortest span between braces. The key may not contain a line terminator
// (`\n`, `\r`, U+2028, U+2029), so a placeholder cannot cross a line break
// and an unclosed `{` stays literal.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([^\n\r\x{2028}\x{2029}]*?)\}").expect("placeholder pattern is valid")
});

/// Render one row through a template
pub fn render(template: &str, row: &RowRecord) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match row.get(&caps[1]) {
            Some(value) if value.is_truthy() => value.to_string(),
            _ => FALLBACK_MARKER.to_string(),
        })
        .into_owned()
}

/// Render every selected row, in worksheet order
pub fn render_all(template: &str, worksheet: &Worksheet) -> Vec<String> {
    worksheet
        .selected_rows()
        .map(|row| render(template, row))
        .collect()
}

/// Placeholder keys in order of appearance (duplicates kept)
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// The user's template text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Replace the whole template text
    pub fn set(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    /// Append a `{name}` placeholder at the end
    pub fn append_placeholder(&mut self, name: &str) {
        self.source.push('{');
        self.source.push_str(name);
        self.source.push('}');
    }

    pub fn placeholders(&self) -> Vec<&str> {
        placeholders(&self.source)
    }

    /// Placeholders that name no known column; these always render the fallback
    pub fn unknown_placeholders(&self, columns: &[String]) -> Vec<&str> {
        let mut unknown: Vec<&str> = Vec::new();
        for key in self.placeholders() {
            if !columns.iter().any(|c| c == key) && !unknown.contains(&key) {
                unknown.push(key);
            }
        }
        unknown
    }

    pub fn render(&self, row: &RowRecord) -> String {
        render(&self.source, row)
    }

    pub fn render_all(&self, worksheet: &Worksheet) -> Vec<String> {
        render_all(&self.source, worksheet)
    }
}
