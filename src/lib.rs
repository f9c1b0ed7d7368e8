//! easyreg - render spreadsheet rows through text templates
//!
//! Load a spreadsheet, pick a worksheet, select rows, and render each
//! selected row through a template that references columns as `{Name}`.
//! The result is one line per selected row, ready for the clipboard.
//!
//! # Features
//!
//! - xlsx, xls, xlsb and ods workbooks (plus JSON/YAML row documents)
//! - Per-row and bulk selection that never touches cell contents
//! - Placeholders with a `-` fallback for missing, empty or zero cells
//! - Clipboard copy through the platform's copy command
//!
//! # Example
//!
//! ```no_run
//! use easyreg::core::Session;
//!
//! let mut session = Session::new();
//! session.open_file("guests.xlsx")?;
//! session.choose_sheet("Sheet1")?;
//! session.set_template("Dear {Name}, table {Table}");
//! session.toggle_row(0)?;
//!
//! for line in session.rendered_output() {
//!     println!("{line}");
//! }
//! # Ok::<(), easyreg::error::EasyRegError>(())
//! ```

pub mod cli;
pub mod clipboard;
pub mod core;
pub mod error;
pub mod excel;
pub mod parser;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{EasyRegError, EasyRegResult};
pub use types::{CellValue, RawRow, RowRecord};
