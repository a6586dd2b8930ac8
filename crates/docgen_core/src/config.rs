//! Pipeline configuration.
//!
//! Every field has a default, so an absent or partial `docgen.yaml` is
//! valid. Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use docgen_data::NumericMode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "docgen.yaml";

/// Placeholder in backend arguments replaced by the output path.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Which rendering backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Command,
    Html,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "command" => Ok(Self::Command),
            "html" => Ok(Self::Html),
            other => Err(format!("unknown backend '{other}' (expected command or html)")),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::Html => write!(f, "html"),
        }
    }
}

/// Rendering backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// External converter for the command backend.
    pub program: String,
    /// Arguments; `{output}` is replaced by the output path.
    pub args: Vec<String>,
    /// Zero disables the timeout.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Command,
            program: "weasyprint".to_string(),
            args: vec!["-".to_string(), OUTPUT_PLACEHOLDER.to_string()],
            timeout_secs: 120,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocgenConfig {
    pub data_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Glob matched case-insensitively against template file names.
    pub template_pattern: String,
    pub numeric_mode: NumericMode,
    /// Candidate identifier keys, tried in order against the first record.
    pub id_keys: Vec<String>,
    pub output_prefix: String,
    pub open_after_render: bool,
    pub backend: BackendConfig,
}

impl Default for DocgenConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("output"),
            template_pattern: "*.html".to_string(),
            numeric_mode: NumericMode::default(),
            id_keys: ["invoice_id", "invoiceId", "invoice", "id", "ID"]
                .into_iter()
                .map(String::from)
                .collect(),
            output_prefix: "invoice".to_string(),
            open_after_render: true,
            backend: BackendConfig::default(),
        }
    }
}

impl DocgenConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] in the working
    /// directory when it exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::config(path, e.to_string()))?;
        let config = Self::from_yaml(&content).map_err(|e| match e {
            CoreError::Config { message, .. } => CoreError::config(path, message),
            other => other,
        })?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| CoreError::config("<inline>", e.to_string()))
    }

    pub fn to_yaml(&self) -> CoreResult<String> {
        serde_yaml::to_string(self).map_err(|e| CoreError::config("<inline>", e.to_string()))
    }
}
