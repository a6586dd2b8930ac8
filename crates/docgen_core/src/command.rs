//! Backend delegating to an external converter process.
//!
//! The markup is piped to the program's stdin. Arguments may reference the
//! output path through `{output}`; when none does, the program's stdout is
//! captured and written to the output path instead.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::backend::{RenderBackend, RenderReport};
use crate::config::{BackendConfig, OUTPUT_PLACEHOLDER};
use crate::error::{BackendError, BackendResult};

/// Runs an external program (WeasyPrint by default) per document.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
    extension: String,
    timeout_secs: u64,
}

impl Default for CommandBackend {
    fn default() -> Self {
        Self::from_config(&BackendConfig::default())
    }
}

impl CommandBackend {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            extension: "pdf".to_string(),
            timeout_secs: 0,
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone()).with_timeout(config.timeout_secs)
    }

    /// Zero disables the timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with `{output}` replaced.
    pub fn resolved_args(&self, output_path: &Path) -> Vec<String> {
        let output = output_path.to_string_lossy();
        self.args
            .iter()
            .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, &output))
            .collect()
    }

    fn writes_to_stdout(&self) -> bool {
        !self.args.iter().any(|arg| arg.contains(OUTPUT_PLACEHOLDER))
    }

    async fn run(&self, markup: &str, output_path: &Path) -> BackendResult<std::process::Output> {
        let args = self.resolved_args(output_path);
        debug!("Running {} {:?}", self.program, args);

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BackendError::Spawn {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        // Feed stdin while draining stdout so a converter echoing its input
        // cannot fill the pipe and stall.
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(markup.as_bytes()).await?;
                stdin.shutdown().await?;
            }
            Ok::<_, std::io::Error>(())
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        if let Err(e) = fed {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
            debug!("{} closed stdin early", self.program);
        }
        Ok(output?)
    }
}

#[async_trait]
impl RenderBackend for CommandBackend {
    fn name(&self) -> &str {
        &self.program
    }

    fn output_extension(&self) -> &str {
        &self.extension
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    async fn render(&self, markup: &str, output_path: &Path) -> BackendResult<RenderReport> {
        let started_at = Utc::now();

        let output = if self.timeout_secs > 0 {
            match timeout(
                Duration::from_secs(self.timeout_secs),
                self.run(markup, output_path),
            )
            .await
            {
                Ok(result) => result?,
                Err(_) => {
                    warn!("{} exceeded {}s, killed", self.program, self.timeout_secs);
                    return Err(BackendError::Timeout(self.timeout_secs));
                }
            }
        } else {
            self.run(markup, output_path).await?
        };

        if !output.status.success() {
            return Err(BackendError::Failed {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if self.writes_to_stdout() {
            tokio::fs::write(output_path, &output.stdout).await?;
        }

        let bytes_written = tokio::fs::metadata(output_path)
            .await
            .map(|m| m.len())
            .map_err(|e| {
                BackendError::Other(format!(
                    "{} reported success but {:?} is unreadable: {}",
                    self.program, output_path, e
                ))
            })?;

        info!("{} produced {:?} ({} bytes)", self.program, output_path, bytes_written);
        Ok(RenderReport::new(
            self.name(),
            output_path,
            bytes_written,
            started_at,
        ))
    }
}
