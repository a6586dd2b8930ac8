//! Backend writing the substituted markup as-is.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::backend::{RenderBackend, RenderReport};
use crate::error::BackendResult;

/// Writes markup straight to an `.html` file. Needs no external tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlBackend;

impl HtmlBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RenderBackend for HtmlBackend {
    fn name(&self) -> &str {
        "html"
    }

    fn output_extension(&self) -> &str {
        "html"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn render(&self, markup: &str, output_path: &Path) -> BackendResult<RenderReport> {
        let started_at = Utc::now();
        tokio::fs::write(output_path, markup).await?;
        debug!("Wrote {} bytes of markup to {:?}", markup.len(), output_path);
        Ok(RenderReport::new(
            self.name(),
            output_path,
            markup.len() as u64,
            started_at,
        ))
    }
}
