use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BankmapError {
    #[error("Unsupported format: {0} (expected one of: fineco, mastercard)")]
    UnsupportedFormat(String),

    #[error("Input not found: {0}")]
    InputNotFound(String),

    #[error("Failed to read workbook {}: {message}", path.display())]
    InputParse { path: PathBuf, message: String },

    #[error("Sheet 0 missing or empty in {}", path.display())]
    SheetNotFound { path: PathBuf },

    #[error("Invalid date value {value:?} at row {row} ({format} statement)")]
    InvalidDateValue {
        format: &'static str,
        row: usize,
        value: String,
    },

    #[error("Row {row} has {width} columns, column {column} required ({format} statement)")]
    MalformedRow {
        format: &'static str,
        row: usize,
        column: usize,
        width: usize,
    },

    #[error("Failed to write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BankmapError>;
