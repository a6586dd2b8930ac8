//! Error types for template rendering.

use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while rendering a record.
///
/// Missing keys and bad format specifiers never produce an error; only a
/// record whose item table cannot be derived does.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Cannot derive item table from field '{field}': {message}")]
    RenderData { field: String, message: String },
}

impl TemplateError {
    pub fn render_data(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RenderData {
            field: field.into(),
            message: message.into(),
        }
    }
}
