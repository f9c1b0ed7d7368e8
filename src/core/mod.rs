//! Selection model and template rendering

pub mod columns;
pub mod session;
pub mod template;
pub mod worksheet;

pub use columns::{columns, ColumnInclusion};
pub use session::Session;
pub use template::{render, render_all, Template, FALLBACK_MARKER};
pub use worksheet::Worksheet;
