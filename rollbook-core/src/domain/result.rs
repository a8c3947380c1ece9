//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Each variant is one class of run-terminating failure. Cell-level parse
/// problems never surface here; they are absorbed into a `LoadReport`.
#[derive(Error, Debug)]
pub enum Error {
    /// A referenced CSV or workbook file does not exist
    #[error("Input missing: {0}")]
    InputMissing(String),

    /// A required column or sheet is absent
    #[error("Schema error: {0}")]
    Schema(String),

    /// A workbook file name does not follow `<prefix>_<YYYYMMDD>.<ext>`
    #[error("Naming error: {0}")]
    Naming(String),

    /// Roll-forward target date is not after the source date
    #[error("Sequence error: {0}")]
    Sequence(String),

    /// Output root does not exist and could not be created
    #[error("Missing path: {0}")]
    MissingPath(String),

    /// Destination is locked or not writable
    #[error("Write denied: {0}")]
    WriteDenied(String),

    /// Workbook could not be read or is malformed
    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub fn input_missing(msg: impl Into<String>) -> Self {
        Self::InputMissing(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn write_denied(msg: impl Into<String>) -> Self {
        Self::WriteDenied(msg.into())
    }

    /// Short machine-readable kind, used in JSON output and log events
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InputMissing(_) => "input_missing",
            Error::Schema(_) => "schema",
            Error::Naming(_) => "naming",
            Error::Sequence(_) => "sequence",
            Error::MissingPath(_) => "missing_path",
            Error::WriteDenied(_) => "write_denied",
            Error::Workbook(_) => "workbook",
            Error::Validation(_) => "validation",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Csv(_) => "csv",
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
