//! Mock rendering backend for testing.
//!
//! Captures every render call and returns configurable results, so the
//! pipeline can be exercised without an external converter.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::backend::{RenderBackend, RenderReport};
use crate::error::{BackendError, BackendResult};

/// Captured call information for verification.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRender {
    pub markup: String,
    pub output_path: PathBuf,
}

/// Mock backend for testing.
#[derive(Clone)]
pub struct MockBackend {
    available: Arc<RwLock<bool>>,
    extension: String,
    /// Write the markup to the output path, like the html backend.
    write_output: Arc<RwLock<bool>>,
    simulate_failure: Arc<RwLock<Option<String>>>,
    captured_calls: Arc<RwLock<Vec<CapturedRender>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            available: Arc::new(RwLock::new(true)),
            extension: "pdf".to_string(),
            write_output: Arc::new(RwLock::new(false)),
            simulate_failure: Arc::new(RwLock::new(None)),
            captured_calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn set_available(self, available: bool) -> Self {
        *self.available.write() = available;
        self
    }

    pub fn set_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn write_output(self, enabled: bool) -> Self {
        *self.write_output.write() = enabled;
        self
    }

    /// Make every render fail with [`BackendError::Other`].
    pub fn simulate_failure(self, message: impl Into<String>) -> Self {
        *self.simulate_failure.write() = Some(message.into());
        self
    }

    pub fn get_calls(&self) -> Vec<CapturedRender> {
        self.captured_calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    pub fn last_markup(&self) -> Option<String> {
        self.captured_calls.read().last().map(|c| c.markup.clone())
    }
}

#[async_trait]
impl RenderBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn output_extension(&self) -> &str {
        &self.extension
    }

    async fn is_available(&self) -> bool {
        *self.available.read()
    }

    async fn render(&self, markup: &str, output_path: &Path) -> BackendResult<RenderReport> {
        let started_at = Utc::now();
        self.captured_calls.write().push(CapturedRender {
            markup: markup.to_string(),
            output_path: output_path.to_path_buf(),
        });

        if let Some(message) = self.simulate_failure.read().clone() {
            return Err(BackendError::Other(message));
        }
        if *self.write_output.read() {
            tokio::fs::write(output_path, markup).await?;
        }

        Ok(RenderReport::new(
            self.name(),
            output_path,
            markup.len() as u64,
            started_at,
        ))
    }
}
