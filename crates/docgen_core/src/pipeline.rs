//! Pipeline orchestration.
//!
//! Sequences discovery, record loading, record selection, template
//! rendering and the backend call. The business rules live in the data and
//! template crates; this module only wires them together.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use docgen_data::{AdapterResolver, Record, RecordSet};
use docgen_templates::TemplateRenderer;
use tracing::{debug, info, warn};

use crate::backend::{RenderBackend, RenderReport};
use crate::config::DocgenConfig;
use crate::discovery;
use crate::error::{CoreError, CoreResult};

/// How to pick one record out of a [`RecordSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSelector {
    /// Zero-based position.
    Index(usize),
    /// Identifier value; a positive number that matches no identifier is
    /// taken as a one-based position.
    Key(String),
}

impl RecordSelector {
    pub fn parse(raw: &str) -> Self {
        Self::Key(raw.trim().to_string())
    }
}

/// Inputs for one document.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub data_file: PathBuf,
    pub template_file: PathBuf,
    pub record: RecordSelector,
}

/// What [`Pipeline::generate`] produced.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub record_index: usize,
    pub label: String,
    pub output_path: PathBuf,
    pub report: RenderReport,
}

pub struct Pipeline {
    config: DocgenConfig,
    resolver: AdapterResolver,
    renderer: TemplateRenderer,
    backend: Arc<dyn RenderBackend>,
}

impl Pipeline {
    pub fn new(config: DocgenConfig, backend: Arc<dyn RenderBackend>) -> Self {
        let resolver = AdapterResolver::new(config.numeric_mode);
        debug!(
            "Pipeline using {} coercion and the {} backend",
            config.numeric_mode,
            backend.name()
        );
        Self {
            config,
            resolver,
            renderer: TemplateRenderer::new(),
            backend,
        }
    }

    pub fn config(&self) -> &DocgenConfig {
        &self.config
    }

    pub fn backend(&self) -> &dyn RenderBackend {
        self.backend.as_ref()
    }

    pub fn resolver(&self) -> &AdapterResolver {
        &self.resolver
    }

    /// Create the data, templates and output directories if missing.
    pub fn ensure_directories(&self) -> CoreResult<()> {
        for dir in [
            &self.config.data_dir,
            &self.config.templates_dir,
            &self.config.output_dir,
        ] {
            if !dir.exists() {
                info!("Creating directory {:?}", dir);
            }
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn data_files(&self) -> Vec<PathBuf> {
        discovery::data_files(&self.config.data_dir, &self.resolver)
    }

    pub fn template_files(&self) -> CoreResult<Vec<PathBuf>> {
        discovery::template_files(&self.config.templates_dir, &self.config.template_pattern)
    }

    pub fn load_records(&self, path: &Path) -> CoreResult<RecordSet> {
        let records = self.resolver.load(path)?;
        info!("Loaded {} record(s) from {:?}", records.len(), path);
        Ok(records)
    }

    pub fn load_template(&self, path: &Path) -> CoreResult<String> {
        let template = std::fs::read_to_string(path)?;
        debug!("Loaded template {:?} ({} bytes)", path, template.len());
        Ok(template)
    }

    /// First configured identifier key present in the first record.
    pub fn id_key(&self, records: &RecordSet) -> Option<&str> {
        let first = records.first()?;
        self.config
            .id_keys
            .iter()
            .map(String::as_str)
            .find(|key| first.contains_key(key))
    }

    /// One display label per record, in order.
    pub fn record_labels(&self, records: &RecordSet) -> Vec<String> {
        let id_key = self.id_key(records);
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                id_key
                    .and_then(|key| record.get(key))
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| format!("Record #{}", index + 1))
            })
            .collect()
    }

    /// Resolve `selector` to a position in `records`.
    pub fn select(&self, records: &RecordSet, selector: &RecordSelector) -> CoreResult<usize> {
        if records.is_empty() {
            return Err(CoreError::EmptyRecordSet(records.source().to_path_buf()));
        }
        let len = records.len();

        match selector {
            RecordSelector::Index(index) if *index < len => Ok(*index),
            RecordSelector::Index(index) => Err(CoreError::RecordOutOfRange { index: *index, len }),
            RecordSelector::Key(key) => {
                let by_id = self.id_key(records).and_then(|id_key| {
                    records
                        .iter()
                        .position(|r| r.get(id_key).map(|v| v.to_string()).as_deref() == Some(key.as_str()))
                });
                if let Some(index) = by_id {
                    return Ok(index);
                }
                match key.parse::<usize>() {
                    Ok(position) if (1..=len).contains(&position) => Ok(position - 1),
                    Ok(position) => Err(CoreError::RecordOutOfRange {
                        index: position.saturating_sub(1),
                        len,
                    }),
                    Err(_) => Err(CoreError::RecordNotFound(key.clone())),
                }
            }
        }
    }

    pub fn render_markup(&self, record: &Record, template: &str) -> CoreResult<String> {
        let unresolved = self.renderer.unresolved_keys(template, record);
        if !unresolved.is_empty() {
            warn!("Template references missing field(s): {}", unresolved.join(", "));
        }
        Ok(self.renderer.render(template, record)?)
    }

    /// `<output_dir>/<prefix>_<id>.<ext>` for the record at `index`.
    pub fn output_path(&self, record: &Record, index: usize, id_key: Option<&str>) -> PathBuf {
        let id = id_key
            .and_then(|key| record.get(key))
            .map(|value| sanitize_file_stem(&value.to_string()))
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| (index + 1).to_string());

        let file_name = format!(
            "{}_{}.{}",
            self.config.output_prefix,
            id,
            self.backend.output_extension()
        );
        self.config.output_dir.join(file_name)
    }

    /// Produce one document.
    pub async fn generate(&self, request: &GenerateRequest) -> CoreResult<GenerateOutcome> {
        let records = self.load_records(&request.data_file)?;
        let index = self.select(&records, &request.record)?;
        self.generate_selected(&records, index, &request.template_file).await
    }

    /// Produce one document from an already loaded record set.
    pub async fn generate_selected(
        &self,
        records: &RecordSet,
        index: usize,
        template_file: &Path,
    ) -> CoreResult<GenerateOutcome> {
        let record = records.get(index).ok_or(CoreError::RecordOutOfRange {
            index,
            len: records.len(),
        })?;
        let label = self.record_labels(records).swap_remove(index);
        info!("Selected record {} ({})", index + 1, label);

        let template = self.load_template(template_file)?;
        let markup = self.render_markup(record, &template)?;

        let output_path = self.output_path(record, index, self.id_key(records));
        std::fs::create_dir_all(&self.config.output_dir)?;

        info!("Rendering {:?} with {}", output_path, self.backend.name());
        let report = self.backend.render(&markup, &output_path).await?;
        info!(
            "Rendered {:?} ({} bytes, {}ms)",
            report.output_path, report.bytes_written, report.duration_ms
        );

        Ok(GenerateOutcome {
            record_index: index,
            label,
            output_path,
            report,
        })
    }
}

/// Keep ASCII alphanumerics, `-` and `_`.
pub fn sanitize_file_stem(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}
