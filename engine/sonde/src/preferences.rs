//! User preferences for reply display.
//!
//! Stored as a small JSON file. Missing keys take their defaults, so files
//! written by older versions keep loading. `SONDE_DISPLAY` and `SONDE_BYTES`
//! override the stored display mode and byte encoding.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sonde_ir::{BytesEncoding, DisplayMode, RenderContext, UnknownName};
use thiserror::Error;
use tracing::debug;

pub const DISPLAY_VAR: &str = "SONDE_DISPLAY";
pub const BYTES_VAR: &str = "SONDE_BYTES";

/// Failure to read, parse or write preferences.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed preferences in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{var}: {source}")]
    Env {
        var: &'static str,
        #[source]
        source: UnknownName,
    },
}

/// How replies are shown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub display: DisplayMode,
    /// Sub-encoding for byte vectors in pretty mode.
    pub bytes: BytesEncoding,
    /// Show relative times next to time-like numeric fields.
    pub timestamps: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            display: DisplayMode::Pretty,
            bytes: BytesEncoding::Hex,
            timestamps: true,
        }
    }
}

impl Preferences {
    /// Read preferences from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no preferences file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_owned(),
            source,
        })
    }

    /// Write preferences to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_owned(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_owned(),
            source,
        })?;
        std::fs::write(path, text).map_err(io_err)?;
        debug!(path = %path.display(), "preferences saved");
        Ok(())
    }

    /// Apply `SONDE_DISPLAY` and `SONDE_BYTES` from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from any variable source. Blank values are ignored.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let set = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        if let Some(value) = set(DISPLAY_VAR) {
            self.display = value.parse().map_err(|source| ConfigError::Env {
                var: DISPLAY_VAR,
                source,
            })?;
        }
        if let Some(value) = set(BYTES_VAR) {
            self.bytes = value.parse().map_err(|source| ConfigError::Env {
                var: BYTES_VAR,
                source,
            })?;
        }
        Ok(self)
    }

    /// A render context carrying these preferences, timed at the current
    /// instant.
    pub fn render_context(&self) -> RenderContext {
        RenderContext::default()
            .with_display(self.display)
            .with_bytes(self.bytes)
            .with_timestamps(self.timestamps)
    }
}

#[cfg(test)]
mod tests;
