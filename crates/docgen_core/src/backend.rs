//! Rendering backend trait and report types.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BackendResult;

/// Outcome of one backend invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderReport {
    /// Backend name
    pub backend: String,
    /// Where the document was written
    pub output_path: PathBuf,
    /// Size of the produced document
    pub bytes_written: u64,
    /// Render start time
    pub started_at: DateTime<Utc>,
    /// Render end time
    pub finished_at: DateTime<Utc>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RenderReport {
    pub fn new(
        backend: impl Into<String>,
        output_path: impl Into<PathBuf>,
        bytes_written: u64,
        started_at: DateTime<Utc>,
    ) -> Self {
        let finished_at = Utc::now();
        let duration_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;
        Self {
            backend: backend.into(),
            output_path: output_path.into(),
            bytes_written,
            started_at,
            finished_at,
            duration_ms,
        }
    }
}

/// Turns final markup into a document on disk.
///
/// The pipeline calls [`render`](RenderBackend::render) exactly once per
/// generated document and never inspects the produced bytes.
#[async_trait]
pub trait RenderBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Extension (without dot) of the files this backend produces.
    fn output_extension(&self) -> &str;

    /// Check whether the backend can run in this environment.
    async fn is_available(&self) -> bool;

    /// Render `markup` into `output_path`.
    async fn render(&self, markup: &str, output_path: &Path) -> BackendResult<RenderReport>;
}
