use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use fastapi_output::RichOutput;
use serde::Serialize;
use sqlmodel_console::OutputMode as SqlModelOutputMode;
use tempfile::NamedTempFile;

use crate::error::{ReportError, Result};

#[must_use]
pub fn now_utc_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputIntegration {
    pub fastapi_mode: String,
    pub fastapi_agent: bool,
    pub fastapi_ci: bool,
    pub fastapi_tty: bool,
    pub sqlmodel_mode: String,
    pub sqlmodel_agent: bool,
}

impl OutputIntegration {
    #[must_use]
    pub fn detect() -> Self {
        let fastapi_detection = fastapi_output::detect_environment();
        let fastapi_mode = fastapi_output::OutputMode::auto();
        let sqlmodel_mode = SqlModelOutputMode::detect();
        Self {
            fastapi_mode: fastapi_mode.as_str().to_string(),
            fastapi_agent: fastapi_detection.is_agent,
            fastapi_ci: fastapi_detection.is_ci,
            fastapi_tty: fastapi_detection.is_tty,
            sqlmodel_mode: sqlmodel_mode.as_str().to_string(),
            sqlmodel_agent: SqlModelOutputMode::is_agent_environment(),
        }
    }

    #[must_use]
    pub fn should_emit_json(&self) -> bool {
        self.sqlmodel_mode == "json"
    }
}

/// Human-facing progress output; silent when machine JSON output is active.
#[derive(Debug, Clone)]
pub struct CliOutput {
    inner: RichOutput,
    enabled: bool,
    transcript: Option<Arc<Mutex<Vec<String>>>>,
}

impl CliOutput {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            inner: RichOutput::auto(),
            enabled,
            transcript: None,
        }
    }

    /// Captures lines instead of printing them; read back with [`Self::lines`].
    #[must_use]
    pub fn recording(enabled: bool) -> Self {
        Self {
            transcript: Some(Arc::default()),
            ..Self::new(enabled)
        }
    }

    /// Lines emitted so far by a recording output.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.transcript
            .as_ref()
            .and_then(|transcript| transcript.lock().ok().map(|lines| lines.clone()))
            .unwrap_or_default()
    }

    pub fn success(&self, message: &str) {
        if self.enabled && !self.record(message) {
            self.inner.success(message);
        }
    }

    pub fn error(&self, message: &str) {
        if self.enabled && !self.record(message) {
            self.inner.error(message);
        }
    }

    fn record(&self, message: &str) -> bool {
        let Some(transcript) = &self.transcript else {
            return false;
        };
        if let Ok(mut lines) = transcript.lock() {
            lines.push(message.to_string());
        }
        true
    }
}

#[must_use]
pub fn output_for(integration: &OutputIntegration) -> CliOutput {
    CliOutput::new(!integration.should_emit_json())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ReportError::MissingPath {
            path: path.to_path_buf(),
        })
    }
}

pub fn write_string(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Writes through a temporary sibling file and renames it into place, so
/// concurrent writers never leave a torn file: the last rename wins.
pub fn write_string_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(parent)?;

    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(content.as_bytes())?;
    staged.flush()?;
    staged.persist(path).map_err(|error| error.error)?;
    Ok(())
}
