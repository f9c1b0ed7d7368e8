use super::shell::run_shell;
use crate::clipboard::SystemClipboard;
use crate::core::Session;
use crate::error::{EasyRegError, EasyRegResult};
use crate::writer::{self, OutputFormat};
use colored::Colorize;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;
use tracing::warn;

/// Where the template text comes from
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Inline(String),
    File(PathBuf),
}

impl TemplateSource {
    pub fn load(&self) -> EasyRegResult<String> {
        match self {
            TemplateSource::Inline(text) => Ok(text.clone()),
            TemplateSource::File(path) => {
                let text = fs::read_to_string(path)?;
                // Editors leave a final newline that is not part of the template
                Ok(text
                    .strip_suffix('\n')
                    .map(|t| t.strip_suffix('\r').unwrap_or(t))
                    .unwrap_or(&text)
                    .to_string())
            }
        }
    }
}

/// Row selection requested on the command line
#[derive(Debug, Clone, Default)]
pub struct RowSelection {
    /// Select exactly these rows (0-based); empty means "start from all"
    pub rows: Vec<usize>,
    /// Rows to deselect afterwards
    pub deselect: Vec<usize>,
    /// Start from nothing selected
    pub none: bool,
}

/// Options shared by `render` and `watch`
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub file: PathBuf,
    pub sheet: Option<String>,
    pub template: TemplateSource,
    pub selection: RowSelection,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub copy: bool,
}

/// Open a file and choose its worksheet.
///
/// A workbook with several sheets needs `sheet`; a single-sheet one does not.
pub fn open_session(file: &Path, sheet: Option<&str>) -> EasyRegResult<Session> {
    let mut session = Session::new();
    session.open_file(file)?;

    if let Some(name) = sheet {
        session.choose_sheet(name)?;
    } else if session.sheet_name().is_none() {
        let names = session
            .workbook()
            .map(|wb| wb.sheet_names().join(", "))
            .unwrap_or_default();
        return Err(EasyRegError::Validation(format!(
            "{} has several sheets, choose one with --sheet ({})",
            file.display(),
            names
        )));
    }

    Ok(session)
}

/// Apply `--rows`, `--none` and `--deselect` to a fresh session
pub fn apply_selection(session: &mut Session, selection: &RowSelection) -> EasyRegResult<()> {
    if !selection.rows.is_empty() {
        session.select_only(&selection.rows)?;
    } else if selection.none {
        session.set_all(false)?;
    }

    for &index in &selection.deselect {
        if session.worksheet().row(index).is_some_and(|row| !row.selected) {
            continue;
        }
        session.toggle_row(index)?;
    }
    Ok(())
}

/// Build the session `render` works from: sheet chosen, template set, rows selected
pub fn prepare_session(options: &RenderOptions) -> EasyRegResult<Session> {
    let template = options.template.load()?;
    let mut session = open_session(&options.file, options.sheet.as_deref())?;
    session.set_template(template);
    apply_selection(&mut session, &options.selection)?;

    let columns = session.columns();
    for unknown in session.template().unknown_placeholders(&columns) {
        warn!(placeholder = unknown, "placeholder matches no column, it will render as '-'");
    }

    Ok(session)
}

/// Execute the sheets command
pub fn sheets(file: PathBuf) -> EasyRegResult<()> {
    let mut session = Session::new();
    session.open_file(&file)?;

    println!("{}", "📒 easyreg - Worksheets".bold().green());
    println!("   File: {}\n", file.display());

    if let Some(workbook) = session.workbook() {
        for name in workbook.sheet_names() {
            let rows = workbook.sheet_to_rows(name)?;
            println!("   {} ({} rows)", name.bright_blue().bold(), rows.len());
        }
        if workbook.sheet_count() == 0 {
            println!("   {}", "No worksheets found".yellow());
        }
    }

    Ok(())
}

/// Execute the columns command
pub fn columns(file: PathBuf, sheet: Option<String>) -> EasyRegResult<()> {
    let session = open_session(&file, sheet.as_deref())?;

    println!("{}", "📒 easyreg - Available Variables".bold().green());
    println!("   File:  {}", file.display());
    println!("   Sheet: {}\n", session.sheet_name().unwrap_or_default());

    let columns = session.columns();
    if columns.is_empty() {
        println!("   {}", "Worksheet has no rows, no variables available".yellow());
    }
    for column in columns {
        println!("   {}", format!("{{{}}}", column).cyan());
    }

    Ok(())
}

/// Execute the preview command
pub fn preview(
    file: PathBuf,
    sheet: Option<String>,
    hide: Vec<String>,
    limit: Option<usize>,
) -> EasyRegResult<()> {
    let mut session = open_session(&file, sheet.as_deref())?;
    hide_columns(&mut session, &hide)?;

    println!("{}", "📒 easyreg - Preview".bold().green());
    println!("   File:  {}", file.display());
    println!(
        "   Sheet: {} ({} rows)\n",
        session.sheet_name().unwrap_or_default(),
        session.worksheet().len()
    );
    print!(
        "{}",
        writer::format_table(session.worksheet(), session.inclusion(), limit)
    );

    Ok(())
}

/// Exclude the named columns; naming a column twice still hides it
pub fn hide_columns(session: &mut Session, hide: &[String]) -> EasyRegResult<()> {
    let columns = session.columns();
    for name in hide {
        if !columns.contains(name) {
            return Err(EasyRegError::Validation(format!("Unknown column: {}", name)));
        }
        if session.inclusion().is_included(name) {
            session.toggle_column(name)?;
        }
    }
    Ok(())
}

/// Execute the render command
///
/// Rendered lines go to stdout (or `--output`); status goes to stderr.
pub fn render(options: RenderOptions) -> EasyRegResult<()> {
    let session = prepare_session(&options)?;
    emit(&session, &options)
}

fn emit(session: &Session, options: &RenderOptions) -> EasyRegResult<()> {
    let lines = session.rendered_output();
    let content = writer::format_output(&lines, options.format)?;

    match &options.output {
        Some(path) => {
            writer::write_output(path, &content)?;
            eprintln!(
                "{} {} lines written to {}",
                "✅".green(),
                lines.len(),
                path.display()
            );
        }
        None => {
            if !lines.is_empty() || options.format == OutputFormat::Json {
                println!("{}", content);
            }
        }
    }

    if options.copy {
        let mut clipboard = SystemClipboard::new();
        // Clipboard trouble is reported, the rendered output still stands
        match session.copy_output(&mut clipboard) {
            Ok(count) => eprintln!("{} Copied {} lines to clipboard", "📋".green(), count),
            Err(e) => eprintln!("{} {}", "⚠️ ".yellow(), e),
        }
    }

    Ok(())
}

/// Execute the watch command
pub fn watch(options: RenderOptions) -> EasyRegResult<()> {
    eprintln!("{}", "👁️  easyreg - Watch Mode".bold().green());
    eprintln!("   Watching: {}", options.file.display());
    eprintln!("   Press {} to stop\n", "Ctrl+C".bold().yellow());

    if !options.file.exists() {
        return Err(EasyRegError::Validation(format!(
            "File not found: {}",
            options.file.display()
        )));
    }

    let watched = watched_files(&options)?;
    let dirs: BTreeSet<&Path> = watched.iter().filter_map(|p| p.parent()).collect();

    let (tx, rx) = channel();

    // Debounce so a save that writes several times triggers one render
    let mut debouncer = new_debouncer(Duration::from_millis(200), tx)
        .map_err(|e| EasyRegError::Watch(format!("Failed to create file watcher: {}", e)))?;

    for dir in dirs {
        debouncer
            .watcher()
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|e| EasyRegError::Watch(format!("Failed to watch directory: {}", e)))?;
    }

    run_watch_action(&options);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|event| {
                    event.kind == DebouncedEventKind::Any && is_watched(&event.path, &watched)
                });
                if relevant {
                    eprintln!(
                        "\n{} {}",
                        "🔄 Change detected at".cyan(),
                        chrono::Local::now().format("%H:%M:%S").to_string().cyan()
                    );
                    run_watch_action(&options);
                }
            }
            Ok(Err(error)) => {
                eprintln!("{} Watch error: {}", "❌".red(), error);
            }
            Err(e) => {
                eprintln!("{} Channel error: {}", "❌".red(), e);
                break;
            }
        }
    }

    Ok(())
}

/// Execute the shell command: interactive session on stdin/stdout
pub fn shell(file: PathBuf, sheet: Option<String>) -> EasyRegResult<()> {
    let mut session = Session::new();
    session.open_file(&file)?;
    if let Some(name) = sheet.as_deref() {
        session.choose_sheet(name)?;
    }

    println!("{}", "📒 easyreg - Interactive Session".bold().green());
    println!("   File: {}", file.display());
    match session.sheet_name() {
        Some(name) => println!("   Sheet: {}", name.bright_blue()),
        None => println!("   {}", "Choose a worksheet with 'sheet NAME' ('sheets' lists them)".yellow()),
    }
    println!("   Type {} for commands\n", "help".bold());

    let mut clipboard = SystemClipboard::new();
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_shell(&mut session, &mut clipboard, stdin.lock(), &mut stdout)
}

/// Canonical paths whose changes trigger a re-render
fn watched_files(options: &RenderOptions) -> EasyRegResult<Vec<PathBuf>> {
    let mut files = vec![options.file.canonicalize()?];
    if let TemplateSource::File(path) = &options.template {
        files.push(path.canonicalize()?);
    }
    Ok(files)
}

fn is_watched(path: &Path, watched: &[PathBuf]) -> bool {
    if let Ok(canonical) = path.canonicalize() {
        if watched.contains(&canonical) {
            return true;
        }
    }
    // Editors that replace the file can leave the old path uncanonicalizable
    path.file_name()
        .is_some_and(|name| watched.iter().any(|w| w.file_name() == Some(name)))
}

/// Reload everything and render again; errors are printed, not fatal
fn run_watch_action(options: &RenderOptions) {
    match prepare_session(options).and_then(|session| emit(&session, options)) {
        Ok(()) => {}
        Err(e) => eprintln!("{} {}", "❌ Render failed:".bold().red(), e),
    }
}
