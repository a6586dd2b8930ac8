//! docgen Core - pipeline orchestration
//!
//! This crate wires the data adapters and the template renderer to a
//! rendering backend:
//! - Configuration loading ([`DocgenConfig`])
//! - Data and template discovery
//! - Record labelling, selection and output naming
//! - The [`RenderBackend`] seam with command, html and mock implementations

pub mod backend;
pub mod command;
pub mod config;
pub mod discovery;
pub mod error;
pub mod html;
pub mod mock;
pub mod pipeline;

use std::sync::Arc;

pub use backend::{RenderBackend, RenderReport};
pub use command::CommandBackend;
pub use config::{BackendConfig, BackendKind, DocgenConfig, DEFAULT_CONFIG_FILE};
pub use error::{BackendError, BackendResult, CoreError, CoreResult};
pub use html::HtmlBackend;
pub use mock::MockBackend;
pub use pipeline::{
    sanitize_file_stem, GenerateOutcome, GenerateRequest, Pipeline, RecordSelector,
};

/// Construct the backend described by `config`.
pub fn backend_from_config(config: &BackendConfig) -> Arc<dyn RenderBackend> {
    match config.kind {
        BackendKind::Command => Arc::new(CommandBackend::from_config(config)),
        BackendKind::Html => Arc::new(HtmlBackend::new()),
    }
}
