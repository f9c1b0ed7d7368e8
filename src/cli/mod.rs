//! CLI command handlers

pub mod commands;
pub mod shell;

pub use commands::{
    columns, preview, render, sheets, shell, watch, RenderOptions, RowSelection, TemplateSource,
};
pub use shell::run_shell;
