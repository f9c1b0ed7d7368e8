use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use easyreg::cli::{self, RenderOptions, RowSelection, TemplateSource};
use easyreg::writer::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "easyreg")]
#[command(about = "Render spreadsheet rows through a text template")]
#[command(long_about = "easyreg - Easily export your spreadsheet data in any format

Pick a worksheet, choose rows, and write a template that references
columns as {ColumnName}. Every selected row becomes one output line.
Missing, empty, zero or FALSE cells render as '-'.

COMMANDS:
  sheets    - List the worksheets of a file
  columns   - List the variables ({Column}) of a worksheet
  preview   - Show the worksheet as a table
  render    - Render selected rows through a template
  watch     - Re-render whenever the file changes
  shell     - Interactive session (toggle rows, edit template, copy)

EXAMPLES:
  easyreg columns guests.xlsx --sheet Invited
  easyreg render guests.xlsx -t 'Dear {Name}, table {Table}'
  easyreg render guests.xlsx -t '{Name} <{Email}>' --rows 0,2,5 --copy
  easyreg shell guests.xlsx

ENVIRONMENT:
  EASYREG_SHEET       default worksheet
  EASYREG_LOG         log filter (e.g. 'easyreg=debug')")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SheetArgs {
    /// Spreadsheet (.xlsx, .xls, .xlsb, .ods) or row document (.json, .yaml)
    file: PathBuf,

    /// Worksheet to use (optional when the file has a single sheet)
    #[arg(short, long, env = "EASYREG_SHEET")]
    sheet: Option<String>,
}

#[derive(Args)]
struct RenderArgs {
    #[command(flatten)]
    source: SheetArgs,

    /// Template text, e.g. "Hi {Name}"
    #[arg(
        short,
        long,
        required_unless_present = "template_file",
        conflicts_with = "template_file"
    )]
    template: Option<String>,

    /// Read the template from a file
    #[arg(short = 'f', long)]
    template_file: Option<PathBuf>,

    /// Render only these rows (0-based, comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    rows: Vec<usize>,

    /// Deselect these rows (0-based, comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    deselect: Vec<usize>,

    /// Start with every row deselected
    #[arg(long, conflicts_with = "rows")]
    none: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Copy the rendered lines to the clipboard
    #[arg(short, long)]
    copy: bool,
}

impl From<RenderArgs> for RenderOptions {
    fn from(args: RenderArgs) -> Self {
        let template = match (args.template, args.template_file) {
            (_, Some(path)) => TemplateSource::File(path),
            (Some(text), None) => TemplateSource::Inline(text),
            (None, None) => TemplateSource::Inline(String::new()),
        };
        RenderOptions {
            file: args.source.file,
            sheet: args.source.sheet,
            template,
            selection: RowSelection {
                rows: args.rows,
                deselect: args.deselect,
                none: args.none,
            },
            format: args.format,
            output: args.output,
            copy: args.copy,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the worksheets of a file
    Sheets {
        /// Spreadsheet or row document
        file: PathBuf,
    },

    /// List the variables available for templates
    Columns {
        #[command(flatten)]
        source: SheetArgs,
    },

    /// Show the worksheet as a table
    Preview {
        #[command(flatten)]
        source: SheetArgs,

        /// Columns to leave out of the table (comma-separated)
        #[arg(long, value_delimiter = ',')]
        hide: Vec<String>,

        /// Show at most this many rows
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    #[command(long_about = "Render selected rows through a template.

Each selected row produces one line. Placeholders are {ColumnName};
the text between the braces must match the column header exactly.
Cells that are missing, empty, 0 or FALSE render as '-'.

Rows are numbered from 0 in worksheet order (header row excluded).

EXAMPLES:
  easyreg render people.xlsx -t 'Hi {Name}, age {Age}'
  easyreg render people.xlsx -f letter.txt --deselect 3,4
  easyreg render people.xlsx -t '{Email}' --rows 0,1 --format json -o emails.json")]
    /// Render selected rows through a template
    Render(RenderArgs),

    #[command(long_about = "Watch a file and re-render whenever it changes.

The workbook (and the template file, if one is used) is re-read on every
change; row selection options are applied again to the fresh data.

Press Ctrl+C to stop watching.")]
    /// Re-render whenever the file changes
    Watch(RenderArgs),

    /// Interactive session: toggle rows and columns, edit the template, copy
    Shell {
        #[command(flatten)]
        source: SheetArgs,
    },
}

fn init_logging() {
    // Logs go to stderr so stdout carries only rendered output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("EASYREG_LOG").unwrap_or_else(|_| "easyreg=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sheets { file } => {
            let display = file.display().to_string();
            cli::sheets(file).with_context(|| format!("Cannot list sheets of {display}"))
        }

        Commands::Columns { source } => {
            let display = source.file.display().to_string();
            cli::columns(source.file, source.sheet)
                .with_context(|| format!("Cannot read columns of {display}"))
        }

        Commands::Preview {
            source,
            hide,
            limit,
        } => {
            let display = source.file.display().to_string();
            cli::preview(source.file, source.sheet, hide, limit)
                .with_context(|| format!("Cannot preview {display}"))
        }

        Commands::Render(args) => {
            let display = args.source.file.display().to_string();
            cli::render(args.into()).with_context(|| format!("Cannot render {display}"))
        }

        Commands::Watch(args) => {
            let display = args.source.file.display().to_string();
            cli::watch(args.into()).with_context(|| format!("Cannot watch {display}"))
        }

        Commands::Shell { source } => {
            let display = source.file.display().to_string();
            cli::shell(source.file, source.sheet)
                .with_context(|| format!("Cannot start session for {display}"))
        }
    }
}
