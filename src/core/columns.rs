//! Column registry and per-column inclusion flags

use super::worksheet::Worksheet;
use indexmap::IndexMap;
use tracing::warn;

/// Column names of a worksheet, taken from the first row's keys.
///
/// Later rows are not consulted, so a key that only appears further down
/// is not offered as a placeholder.
pub fn columns(worksheet: &Worksheet) -> Vec<String> {
    worksheet
        .row(0)
        .map(|row| row.keys().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Which columns are active in the current worksheet.
///
/// Inclusion is advisory: rendering ignores it, only the preview table reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInclusion {
    flags: IndexMap<String, bool>,
}

impl ColumnInclusion {
    /// Every column starts included
    pub fn init(columns: &[String]) -> Self {
        Self {
            flags: columns.iter().map(|name| (name.clone(), true)).collect(),
        }
    }

    /// Flip exactly one column's flag
    pub fn toggle(&self, name: &str) -> Self {
        let mut next = self.clone();
        match next.flags.get_mut(name) {
            Some(flag) => *flag = !*flag,
            None => warn!(column = name, "ignoring toggle of unknown column"),
        }
        next
    }

    /// `false` for unknown columns
    pub fn is_included(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Included column names, in column order
    pub fn included(&self) -> Vec<&str> {
        self.flags
            .iter()
            .filter(|&(_, &on)| on)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(name, &on)| (name.as_str(), on))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
