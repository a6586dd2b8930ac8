//! Error types for the core module.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised by a rendering backend. Surfaced to the user verbatim.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend not available: {0}")]
    NotAvailable(String),

    #[error("Failed to start '{program}': {message}")]
    Spawn { program: String, message: String },

    #[error("'{program}' exited with status {code:?}: {stderr}")]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Backend timed out after {0} seconds")]
    Timeout(u64),

    #[error("Backend error: {0}")]
    Other(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during pipeline operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid configuration in {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("No records found in {0:?}")]
    EmptyRecordSet(PathBuf),

    #[error("Record {index} out of range ({len} record(s) available)")]
    RecordOutOfRange { index: usize, len: usize },

    #[error("No record with identifier '{0}'")]
    RecordNotFound(String),

    #[error("Data error: {0}")]
    Data(#[from] docgen_data::DataError),

    #[error("Template error: {0}")]
    Template(#[from] docgen_templates::TemplateError),

    #[error("Rendering failed: {0}")]
    Backend(#[from] BackendError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}
