//! Generate command - render one record into a document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use docgen_core::{
    backend_from_config, BackendError, BackendKind, CoreError, Pipeline, RecordSelector,
};
use docgen_data::NumericMode;

use super::{data_file_label, file_name, Cli, SelectionError};
use crate::{menu, opener};

#[derive(Args)]
pub struct GenerateArgs {
    /// Data file (chosen interactively when omitted)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Template file (chosen interactively when omitted)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Record identifier or 1-based position (chosen interactively when omitted)
    #[arg(short, long)]
    record: Option<String>,

    /// Rendering backend
    #[arg(long, env = "DOCGEN_BACKEND")]
    backend: Option<BackendKind>,

    /// How CSV/XLSX cells are typed
    #[arg(long, env = "DOCGEN_NUMERIC_MODE")]
    numeric_mode: Option<NumericMode>,

    /// Do not open the document after rendering
    #[arg(long)]
    no_open: bool,
}

pub async fn execute(cli: &Cli, args: &GenerateArgs) -> Result<()> {
    let mut config = cli.load_config()?;
    if let Some(kind) = args.backend {
        config.backend.kind = kind;
    }
    if let Some(mode) = args.numeric_mode {
        config.numeric_mode = mode;
    }
    let open_after_render = config.open_after_render && !args.no_open;

    let backend = backend_from_config(&config.backend);
    if !backend.is_available().await {
        return Err(CoreError::Backend(BackendError::NotAvailable(format!(
            "'{}' could not be started; install it or use --backend html",
            backend.name()
        )))
        .into());
    }

    let pipeline = Pipeline::new(config, backend);
    pipeline
        .ensure_directories()
        .context("Failed to create working directories")?;

    let data_file = match &args.data {
        Some(path) => path.clone(),
        None => {
            let files = pipeline.data_files();
            if files.is_empty() {
                return Err(SelectionError::NoDataFiles(
                    pipeline.config().data_dir.clone(),
                    pipeline.resolver().supported_extensions().join(", "),
                )
                .into());
            }
            let labels: Vec<String> = files.iter().map(|p| data_file_label(p)).collect();
            match menu::choose_interactive("Available data files", "Select a data file", &labels)? {
                Some(index) => files[index].clone(),
                None => return cancelled(),
            }
        }
    };

    let template_file = match &args.template {
        Some(path) => path.clone(),
        None => {
            let files = pipeline.template_files()?;
            if files.is_empty() {
                return Err(SelectionError::NoTemplates(
                    pipeline.config().templates_dir.clone(),
                    pipeline.config().template_pattern.clone(),
                )
                .into());
            }
            let labels: Vec<String> = files.iter().map(|p| file_name(p)).collect();
            match menu::choose_interactive("Available templates", "Select a template", &labels)? {
                Some(index) => files[index].clone(),
                None => return cancelled(),
            }
        }
    };

    let records = pipeline
        .load_records(&data_file)
        .with_context(|| format!("Failed to load {}", data_file.display()))?;

    let index = match &args.record {
        Some(raw) => pipeline.select(&records, &RecordSelector::parse(raw))?,
        None => {
            if records.is_empty() {
                return Err(CoreError::EmptyRecordSet(data_file).into());
            }
            let labels = pipeline.record_labels(&records);
            match menu::choose_interactive("Records", "Select a record", &labels)? {
                Some(index) => index,
                None => return cancelled(),
            }
        }
    };

    let outcome = pipeline
        .generate_selected(&records, index, &template_file)
        .await
        .with_context(|| format!("Failed to generate document for '{}'", file_name(&data_file)))?;

    if !cli.quiet {
        println!("✓ Document created: {}", outcome.output_path.display());
    }

    if open_after_render {
        if let Err(e) = opener::open_path(&outcome.output_path) {
            warn!("Could not open {:?}: {}", outcome.output_path, e);
        }
    }
    Ok(())
}

fn cancelled() -> Result<()> {
    info!("Selection cancelled");
    println!("Operation cancelled.");
    Ok(())
}
