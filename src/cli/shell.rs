//! Interactive session
//!
//! A line-oriented stand-in for the table UI: each command maps onto one
//! [`Session`] operation. Errors are printed and the loop keeps going.

use crate::clipboard::ClipboardSink;
use crate::core::Session;
use crate::error::{EasyRegError, EasyRegResult};
use crate::writer;
use std::io::{BufRead, Write};
use std::path::PathBuf;

const HELP: &str = "\
Commands:
  open FILE        open another workbook
  sheets           list worksheets (* = chosen)
  sheet NAME       choose a worksheet
  columns          list variables and their column flags
  column NAME      toggle a column's flag
  var NAME         append {NAME} to the template
  template [TEXT]  show or replace the template (\\n for a line break)
  clear            empty the template
  toggle N         toggle row N (0-based)
  all | none       select or deselect every row
  show [N]         show the table (first N rows)
  output           print the rendered output
  copy             copy the rendered output to the clipboard
  help             this text
  quit             leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Open(PathBuf),
    Sheets,
    Sheet(String),
    Columns,
    Column(String),
    Var(String),
    Template(Option<String>),
    Clear,
    Toggle(usize),
    All,
    None,
    Show(Option<usize>),
    Output,
    Copy,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines and `#` comments give `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
        let arg = rest.trim();
        let required = |what: &str| -> Result<String, String> {
            if arg.is_empty() {
                Err(format!("{} needs {}", verb, what))
            } else {
                Ok(arg.to_string())
            }
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "open" => ShellCommand::Open(PathBuf::from(required("a file")?)),
            "sheets" => ShellCommand::Sheets,
            "sheet" => ShellCommand::Sheet(required("a sheet name")?),
            "columns" | "vars" => ShellCommand::Columns,
            "column" => ShellCommand::Column(required("a column name")?),
            "var" => ShellCommand::Var(required("a column name")?),
            // Template text is taken verbatim, spaces included
            "template" if rest.is_empty() => ShellCommand::Template(None),
            "template" => ShellCommand::Template(Some(rest.replace("\\n", "\n"))),
            "clear" => ShellCommand::Clear,
            "toggle" => ShellCommand::Toggle(parse_index(arg)?),
            "all" => ShellCommand::All,
            "none" => ShellCommand::None,
            "show" if arg.is_empty() => ShellCommand::Show(None),
            "show" => ShellCommand::Show(Some(parse_index(arg)?)),
            "output" => ShellCommand::Output,
            "copy" => ShellCommand::Copy,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(format!("unknown command '{}', try 'help'", other)),
        };
        Ok(Some(command))
    }
}

fn parse_index(arg: &str) -> Result<usize, String> {
    arg.parse()
        .map_err(|_| format!("'{}' is not a row number", arg))
}

/// Run commands from `input` until `quit` or end of input
pub fn run_shell<R: BufRead, W: Write>(
    session: &mut Session,
    clipboard: &mut dyn ClipboardSink,
    input: R,
    out: &mut W,
) -> EasyRegResult<()> {
    write!(out, "easyreg> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        match ShellCommand::parse(&line) {
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(e) = execute(session, clipboard, command, out) {
                    writeln!(out, "error: {}", e)?;
                }
            }
            Ok(None) => {}
            Err(msg) => writeln!(out, "error: {}", msg)?,
        }
        write!(out, "easyreg> ")?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}

/// Apply one command to the session and print its result
pub fn execute<W: Write>(
    session: &mut Session,
    clipboard: &mut dyn ClipboardSink,
    command: ShellCommand,
    out: &mut W,
) -> EasyRegResult<()> {
    match command {
        ShellCommand::Open(path) => {
            session.open_file(&path)?;
            match session.sheet_name() {
                Some(sheet) => writeln!(
                    out,
                    "opened {} (sheet {}, {} rows)",
                    path.display(),
                    sheet,
                    session.worksheet().len()
                )?,
                None => writeln!(out, "opened {}, choose a sheet", path.display())?,
            }
        }
        ShellCommand::Sheets => {
            let workbook = session
                .workbook()
                .ok_or_else(|| EasyRegError::Validation("no workbook is open".to_string()))?;
            for name in workbook.sheet_names() {
                let marker = if session.sheet_name() == Some(name) { "*" } else { " " };
                writeln!(out, "{} {}", marker, name)?;
            }
        }
        ShellCommand::Sheet(name) => {
            session.choose_sheet(&name)?;
            writeln!(
                out,
                "{}: {} rows, {} columns",
                name,
                session.worksheet().len(),
                session.inclusion().len()
            )?;
        }
        ShellCommand::Columns => {
            if session.inclusion().is_empty() {
                writeln!(out, "no variables available")?;
            }
            for (name, included) in session.inclusion().iter() {
                writeln!(out, "[{}] {{{}}}", if included { "x" } else { " " }, name)?;
            }
        }
        ShellCommand::Column(name) => {
            if !session.columns().contains(&name) {
                return Err(EasyRegError::Validation(format!("Unknown column: {}", name)));
            }
            session.toggle_column(&name)?;
            let state = if session.inclusion().is_included(&name) {
                "included"
            } else {
                "excluded"
            };
            writeln!(out, "{} {}", name, state)?;
        }
        ShellCommand::Var(name) => {
            session.append_variable(&name);
            writeln!(out, "template: {}", session.template().as_str())?;
        }
        ShellCommand::Template(None) => {
            writeln!(out, "template: {}", session.template().as_str())?;
        }
        ShellCommand::Template(Some(text)) => {
            session.set_template(text);
            let columns = session.columns();
            let unknown = session.template().unknown_placeholders(&columns);
            if !unknown.is_empty() && !columns.is_empty() {
                writeln!(out, "note: no column named {}", unknown.join(", "))?;
            }
        }
        ShellCommand::Clear => session.set_template(""),
        ShellCommand::Toggle(index) => {
            session.toggle_row(index)?;
            let selected = session
                .worksheet()
                .row(index)
                .is_some_and(|row| row.selected);
            writeln!(
                out,
                "row {} {}",
                index,
                if selected { "selected" } else { "deselected" }
            )?;
        }
        ShellCommand::All => {
            session.set_all(true)?;
            writeln!(out, "{} rows selected", session.worksheet().selected_count())?;
        }
        ShellCommand::None => {
            session.set_all(false)?;
            writeln!(out, "0 rows selected")?;
        }
        ShellCommand::Show(limit) => {
            if session.sheet_name().is_none() {
                return Err(EasyRegError::NoWorksheet);
            }
            write!(
                out,
                "{}",
                writer::format_table(session.worksheet(), session.inclusion(), limit)
            )?;
        }
        ShellCommand::Output => {
            for line in session.rendered_output() {
                writeln!(out, "{}", line)?;
            }
        }
        ShellCommand::Copy => {
            let count = session.copy_output(clipboard)?;
            writeln!(out, "copied {} lines", count)?;
        }
        ShellCommand::Help => writeln!(out, "{}", HELP)?,
        ShellCommand::Quit => {}
    }
    Ok(())
}
