//! Tabular model and row selection
//!
//! A [`Worksheet`] is an immutable value: selection changes return a new
//! worksheet and leave the original untouched. Cell contents never change
//! after [`Worksheet::load`].

use crate::error::{EasyRegError, EasyRegResult};
use crate::types::{RawRow, RowRecord};
use tracing::debug;

/// Ordered sequence of row records derived from one sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    rows: Vec<RowRecord>,
}

impl Worksheet {
    /// Build a worksheet from decoded rows, every row selected.
    ///
    /// Never fails: an empty input is an empty worksheet.
    pub fn load(raw_rows: Vec<RawRow>) -> Self {
        debug!(rows = raw_rows.len(), "loading worksheet");
        Self {
            rows: raw_rows.into_iter().map(RowRecord::new).collect(),
        }
    }

    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&RowRecord> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows currently selected
    pub fn selected_count(&self) -> usize {
        self.rows.iter().filter(|row| row.selected).count()
    }

    /// Selected rows in worksheet order
    pub fn selected_rows(&self) -> impl Iterator<Item = &RowRecord> {
        self.rows.iter().filter(|row| row.selected)
    }

    /// Flip the selection flag of a single row.
    ///
    /// An out-of-range index is a caller error; `self` is left as it was.
    pub fn toggle_row(&self, index: usize) -> EasyRegResult<Worksheet> {
        if index >= self.rows.len() {
            return Err(EasyRegError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }

        let mut next = self.clone();
        next.rows[index].selected = !next.rows[index].selected;
        Ok(next)
    }

    /// Force every row to the same selection state
    pub fn set_all(&self, selected: bool) -> Worksheet {
        Self {
            rows: self
                .rows
                .iter()
                .map(|row| RowRecord {
                    cells: row.cells.clone(),
                    selected,
                })
                .collect(),
        }
    }

    /// Select exactly the given rows, deselecting everything else
    pub fn select_only(&self, indices: &[usize]) -> EasyRegResult<Worksheet> {
        let mut next = self.set_all(false);
        for &index in indices {
            // Duplicates would toggle back off
            if next.row(index).is_some_and(|row| row.selected) {
                continue;
            }
            next = next.toggle_row(index)?;
        }
        Ok(next)
    }
}
