use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the timesheet summary crates.
///
/// The aggregation engine never fails; every variant here belongs to a
/// boundary (decoding input, writing exports, the terminal, configuration).
#[derive(Error, Debug)]
pub enum SummaryError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be decoded.
    #[error("Failed to decode CSV: {0}")]
    CsvDecode(#[from] csv::Error),

    /// An XLSX workbook could not be opened or its first sheet read.
    #[error("Failed to decode XLSX: {0}")]
    XlsxDecode(String),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A required column was not present in the header row.
    #[error("Missing column '{0}' in header row")]
    MissingColumn(String),

    /// The input file format could not be determined or is not supported.
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// Writing an export file failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the summary crates.
pub type Result<T> = std::result::Result<T, SummaryError>;
