use thiserror::Error;

pub type EasyRegResult<T> = Result<T, EasyRegError>;

#[derive(Error, Debug)]
pub enum EasyRegError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read spreadsheet: {0}")]
    Decode(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Unknown worksheet: {0}")]
    UnknownSheet(String),

    #[error("No worksheet chosen")]
    NoWorksheet,

    #[error("Row {index} is out of range (worksheet has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
