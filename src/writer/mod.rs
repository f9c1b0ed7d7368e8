//! Output formatting: rendered lines and the worksheet preview table

use crate::core::{ColumnInclusion, Worksheet};
use crate::error::EasyRegResult;
use clap::ValueEnum;
use std::fs;
use std::path::Path;

/// How rendered lines are written out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One rendered line per selected row, newline-joined
    #[default]
    Text,
    /// JSON array of rendered strings
    Json,
}

/// Serialize rendered lines
pub fn format_output(lines: &[String], format: OutputFormat) -> EasyRegResult<String> {
    match format {
        OutputFormat::Text => Ok(lines.join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(lines)?),
    }
}

/// Write formatted output to a file
pub fn write_output(path: &Path, content: &str) -> EasyRegResult<()> {
    fs::write(path, content)?;
    Ok(())
}

/// Plain-text table of a worksheet.
///
/// Each row starts with its selection marker (`[x]`/`[ ]`) and index.
/// Only columns included in `inclusion` are shown; cells a row lacks are blank.
pub fn format_table(
    worksheet: &Worksheet,
    inclusion: &ColumnInclusion,
    limit: Option<usize>,
) -> String {
    let columns = inclusion.included();
    let shown = limit.unwrap_or(worksheet.len()).min(worksheet.len());

    let mut grid: Vec<Vec<String>> = Vec::with_capacity(shown + 1);
    let mut header = vec!["sel".to_string(), "#".to_string()];
    header.extend(columns.iter().map(|c| c.to_string()));
    grid.push(header);

    for (idx, row) in worksheet.rows().iter().take(shown).enumerate() {
        let mut line = vec![
            if row.selected { "[x]" } else { "[ ]" }.to_string(),
            idx.to_string(),
        ];
        line.extend(
            columns
                .iter()
                .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default()),
        );
        grid.push(line);
    }

    let widths: Vec<usize> = (0..grid[0].len())
        .map(|col| {
            grid.iter()
                .map(|line| line[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (line_idx, line) in grid.iter().enumerate() {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
            .collect();
        out.push_str(cells.join(" | ").trim_end());
        out.push('\n');
        if line_idx == 0 {
            let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
            out.push_str(&rule.join("-+-"));
            out.push('\n');
        }
    }

    if shown < worksheet.len() {
        out.push_str(&format!("... {} more rows\n", worksheet.len() - shown));
    }
    out
}
