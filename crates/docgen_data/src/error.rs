//! Error types for data loading.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for data operations.
pub type DataResult<T> = Result<T, DataError>;

/// Errors that can occur while resolving or reading a data source.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Unsupported data format: {}", display_extension(.extension))]
    UnsupportedFormat { extension: String, path: PathBuf },

    #[error("Failed to read {path:?}: {message}")]
    SourceRead { path: PathBuf, message: String },

    #[error("Missing capability '{capability}': {remedy}")]
    MissingDependency { capability: String, remedy: String },
}

impl DataError {
    pub fn source_read(path: &Path, message: impl Into<String>) -> Self {
        Self::SourceRead {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn missing_dependency(capability: impl Into<String>, remedy: impl Into<String>) -> Self {
        Self::MissingDependency {
            capability: capability.into(),
            remedy: remedy.into(),
        }
    }

    /// The extension (with leading dot) of an unsupported file, if this is one.
    pub fn unsupported_extension(&self) -> Option<&str> {
        match self {
            Self::UnsupportedFormat { extension, .. } => Some(extension),
            _ => None,
        }
    }
}

fn display_extension(extension: &str) -> &str {
    if extension.is_empty() {
        "(no extension)"
    } else {
        extension
    }
}
