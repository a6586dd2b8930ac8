//! CLI command definitions.
//!
//! Each subcommand drives the pipeline in `docgen_core`; options given on
//! the command line (or through `DOCGEN_*` variables) override the
//! configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use thiserror::Error;

use docgen_core::DocgenConfig;

pub mod generate;
pub mod list;
pub mod render;

/// docgen - render documents from CSV, JSON and XLSX data
#[derive(Parser)]
#[command(name = "docgen")]
#[command(version, about = "docgen - render documents from tabular data and HTML templates")]
#[command(long_about = r#"
docgen fills HTML templates with records from CSV, JSON or XLSX files and
hands the result to a rendering backend (WeasyPrint by default).

COMMANDS:
  generate  → Pick a data file, template and record, then render a document
  list      → Show data files and templates, or the records of one file
  render    → Print the substituted markup without calling a backend

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or selection
  3 - Data error
  4 - Template error
  5 - Rendering backend error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ./docgen.yaml when present)
    #[arg(short, long, global = true, env = "DOCGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding data files
    #[arg(long, global = true, env = "DOCGEN_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory holding templates
    #[arg(long, global = true, env = "DOCGEN_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Directory receiving rendered documents
    #[arg(long, global = true, env = "DOCGEN_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "DOCGEN_LOG_JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render one record into a document
    Generate(generate::GenerateArgs),

    /// List data files and templates, or the records of a data file
    List(list::ListArgs),

    /// Print or save the substituted markup
    Render(render::RenderArgs),
}

/// Problems with what the user picked, as opposed to what was loaded.
#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("No data files found in {0:?} (supported: {1})")]
    NoDataFiles(PathBuf, String),

    #[error("No templates matching '{1}' found in {0:?}")]
    NoTemplates(PathBuf, String),
}

impl Cli {
    /// Configuration file values with the global overrides applied.
    pub fn load_config(&self) -> Result<DocgenConfig> {
        let mut config = DocgenConfig::load(self.config.as_deref())
            .context("Failed to load configuration")?;

        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &self.templates_dir {
            config.templates_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        Ok(config)
    }
}

/// `invoices.csv (CSV)` style label for a data file.
pub fn data_file_label(path: &Path) -> String {
    let name = file_name(path);
    match path.extension() {
        Some(ext) => format!("{} ({})", name, ext.to_string_lossy().to_uppercase()),
        None => name,
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
