//! Session state
//!
//! [`Session`] owns the open workbook, the chosen worksheet, the column
//! inclusion flags and the template. Its methods are the only way to change
//! any of them; everything else reads.

use super::columns::{columns, ColumnInclusion};
use super::template::Template;
use super::worksheet::Worksheet;
use crate::clipboard::ClipboardSink;
use crate::error::{EasyRegError, EasyRegResult};
use crate::excel::Workbook;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Default)]
pub struct Session {
    workbook: Option<Workbook>,
    sheet: Option<String>,
    worksheet: Worksheet,
    inclusion: ColumnInclusion,
    template: Template,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a file and make it the open workbook.
    ///
    /// On a decode error the session keeps its previous state.
    pub fn open_file<P: AsRef<Path>>(&mut self, path: P) -> EasyRegResult<()> {
        let workbook = Workbook::open(path)?;
        self.open_workbook(workbook)
    }

    /// Replace the open workbook.
    ///
    /// The previous worksheet and column flags are dropped; the template is
    /// kept. A workbook with a single sheet has it chosen right away.
    pub fn open_workbook(&mut self, workbook: Workbook) -> EasyRegResult<()> {
        debug!(source = workbook.source(), sheets = workbook.sheet_count(), "workbook opened");

        let single = workbook.single_sheet().map(str::to_string);
        self.workbook = Some(workbook);
        self.sheet = None;
        self.worksheet = Worksheet::default();
        self.inclusion = ColumnInclusion::default();

        match single {
            Some(name) => self.choose_sheet(&name),
            None => Ok(()),
        }
    }

    /// Load one sheet of the open workbook, selecting every row and column
    pub fn choose_sheet(&mut self, name: &str) -> EasyRegResult<()> {
        let workbook = self.workbook.as_ref().ok_or_else(|| {
            EasyRegError::Validation("no workbook is open".to_string())
        })?;
        let rows = workbook.sheet_to_rows(name)?;

        let worksheet = Worksheet::load(rows);
        self.inclusion = ColumnInclusion::init(&columns(&worksheet));
        self.worksheet = worksheet;
        self.sheet = Some(name.to_string());
        debug!(sheet = name, rows = self.worksheet.len(), "worksheet chosen");
        Ok(())
    }

    pub fn workbook(&self) -> Option<&Workbook> {
        self.workbook.as_ref()
    }

    pub fn sheet_name(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    pub fn worksheet(&self) -> &Worksheet {
        &self.worksheet
    }

    pub fn inclusion(&self) -> &ColumnInclusion {
        &self.inclusion
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Placeholder names available for the chosen worksheet
    pub fn columns(&self) -> Vec<String> {
        columns(&self.worksheet)
    }

    fn require_sheet(&self) -> EasyRegResult<()> {
        match self.sheet {
            Some(_) => Ok(()),
            None => Err(EasyRegError::NoWorksheet),
        }
    }

    pub fn toggle_row(&mut self, index: usize) -> EasyRegResult<()> {
        self.require_sheet()?;
        self.worksheet = self.worksheet.toggle_row(index)?;
        Ok(())
    }

    pub fn set_all(&mut self, selected: bool) -> EasyRegResult<()> {
        self.require_sheet()?;
        self.worksheet = self.worksheet.set_all(selected);
        Ok(())
    }

    pub fn select_only(&mut self, indices: &[usize]) -> EasyRegResult<()> {
        self.require_sheet()?;
        self.worksheet = self.worksheet.select_only(indices)?;
        Ok(())
    }

    pub fn toggle_column(&mut self, name: &str) -> EasyRegResult<()> {
        self.require_sheet()?;
        self.inclusion = self.inclusion.toggle(name);
        Ok(())
    }

    pub fn set_template(&mut self, source: impl Into<String>) {
        self.template.set(source);
    }

    /// Append `{name}` to the template
    pub fn append_variable(&mut self, name: &str) {
        self.template.append_placeholder(name);
    }

    /// Rendered line per selected row; recomputed on every call
    pub fn rendered_output(&self) -> Vec<String> {
        self.template.render_all(&self.worksheet)
    }

    /// Rendered output as the newline-joined text that gets copied
    pub fn output_text(&self) -> String {
        self.rendered_output().join("\n")
    }

    /// Copy the rendered output, returning how many lines were copied
    pub fn copy_output(&self, clipboard: &mut dyn ClipboardSink) -> EasyRegResult<usize> {
        let lines = self.rendered_output();
        clipboard.copy_text(&lines.join("\n"))?;
        Ok(lines.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::excel::SheetData;
    use crate::types::{CellValue, RawRow};
    use pretty_assertions::assert_eq;

    fn row(pairs: &[(&str, CellValue)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn people_workbook() -> Workbook {
        Workbook::from_rows(
            "people.json",
            "people",
            vec![
                row(&[("Name", "Ann".into()), ("Age", 30.0.into())]),
                row(&[("Name", "Bo".into()), ("Age", 0.0.into())]),
            ],
        )
    }

    fn two_sheet_workbook() -> Workbook {
        let mut workbook = Workbook::new("book.xlsx");
        workbook.add_sheet(
            "Staff",
            SheetData::Rows(vec![row(&[("Name", "Ann".into())])]),
        );
        workbook.add_sheet(
            "Guests",
            SheetData::Rows(vec![
                row(&[("Guest", "Cy".into())]),
                row(&[("Guest", "Di".into())]),
            ]),
        );
        workbook
    }

    #[test]
    fn test_single_sheet_chosen_automatically() {
        let mut session = Session::new();
        session.open_workbook(people_workbook()).unwrap();
        assert_eq!(session.sheet_name(), Some("people"));
        assert_eq!(session.columns(), vec!["Name", "Age"]);
        assert_eq!(session.inclusion().len(), 2);
    }

    #[test]
    fn test_multi_sheet_waits_for_choice() {
        let mut session = Session::new();
        session.open_workbook(two_sheet_workbook()).unwrap();
        assert_eq!(session.sheet_name(), None);
        assert!(session.rendered_output().is_empty());
        assert!(matches!(session.toggle_row(0), Err(EasyRegError::NoWorksheet)));

        session.choose_sheet("Guests").unwrap();
        session.set_template("{Guest}");
        assert_eq!(session.rendered_output(), vec!["Cy", "Di"]);
    }

    #[test]
    fn test_choose_unknown_sheet_keeps_state() {
        let mut session = Session::new();
        session.open_workbook(two_sheet_workbook()).unwrap();
        session.choose_sheet("Staff").unwrap();
        assert!(matches!(
            session.choose_sheet("Nope"),
            Err(EasyRegError::UnknownSheet(_))
        ));
        assert_eq!(session.sheet_name(), Some("Staff"));
        assert_eq!(session.worksheet().len(), 1);
    }

    #[test]
    fn test_choose_sheet_without_workbook() {
        let mut session = Session::new();
        assert!(session.choose_sheet("Sheet1").is_err());
    }

    #[test]
    fn test_rechoosing_sheet_resets_selection() {
        let mut session = Session::new();
        session.open_workbook(two_sheet_workbook()).unwrap();
        session.choose_sheet("Guests").unwrap();
        session.set_all(false).unwrap();
        session.toggle_column("Guest").unwrap();

        session.choose_sheet("Guests").unwrap();
        assert_eq!(session.worksheet().selected_count(), 2);
        assert!(session.inclusion().is_included("Guest"));
    }

    #[test]
    fn test_render_scenario() {
        let mut session = Session::new();
        session.open_workbook(people_workbook()).unwrap();
        session.set_template("Hi {Name}, age {Age}");
        assert_eq!(
            session.rendered_output(),
            vec!["Hi Ann, age 30", "Hi Bo, age -"]
        );

        session.toggle_row(0).unwrap();
        assert_eq!(session.rendered_output(), vec!["Hi Bo, age -"]);
    }

    #[test]
    fn test_template_survives_new_workbook() {
        let mut session = Session::new();
        session.open_workbook(people_workbook()).unwrap();
        session.append_variable("Name");
        session.open_workbook(two_sheet_workbook()).unwrap();
        assert_eq!(session.template().as_str(), "{Name}");
        assert_eq!(session.sheet_name(), None);
        assert!(session.worksheet().is_empty());
    }

    #[test]
    fn test_column_toggle_does_not_filter_output() {
        let mut session = Session::new();
        session.open_workbook(people_workbook()).unwrap();
        session.set_template("{Name}");
        session.toggle_column("Name").unwrap();
        assert!(!session.inclusion().is_included("Name"));
        assert_eq!(session.rendered_output(), vec!["Ann", "Bo"]);
    }

    #[test]
    fn test_out_of_range_toggle_leaves_state() {
        let mut session = Session::new();
        session.open_workbook(people_workbook()).unwrap();
        let before = session.worksheet().clone();
        assert!(session.toggle_row(9).is_err());
        assert_eq!(session.worksheet(), &before);
    }

    #[test]
    fn test_copy_output() {
        let mut session = Session::new();
        session.open_workbook(people_workbook()).unwrap();
        session.set_template("{Name}");
        let mut clipboard = MemoryClipboard::default();
        assert_eq!(session.copy_output(&mut clipboard).unwrap(), 2);
        assert_eq!(clipboard.contents.as_deref(), Some("Ann\nBo"));
        assert_eq!(session.output_text(), "Ann\nBo");
    }

    #[test]
    fn test_open_missing_file_keeps_state() {
        let mut session = Session::new();
        session.open_workbook(people_workbook()).unwrap();
        assert!(session.open_file("missing/people.xlsx").is_err());
        assert_eq!(session.sheet_name(), Some("people"));
        assert_eq!(session.worksheet().len(), 2);
    }
}
