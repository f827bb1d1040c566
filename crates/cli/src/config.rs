//! Configuration file loading.
//!
//! The file is TOML with four optional sections:
//!
//! ```toml
//! [listener]
//! bind = "0.0.0.0:8010"
//! mount = "/change_hook"
//!
//! [master]
//! url = "http://buildmaster.example.org:8010/changes"
//! timeout_secs = 30
//!
//! [telemetry]
//! filter = "info,pipeline=debug"
//! format = "json"
//! otlp_endpoint = "http://localhost:4317"
//!
//! [dialects]
//! base = true
//! github = { project = "buildbot", category = "push" }
//! ```
//!
//! Without a `[master]` section changes are held in memory only.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use listener::ListenerConfig;
use master_client::MasterConfig;
use pipeline::DialectOptions;

/// File read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "changehook.toml";

/// Complete configuration of the binary.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub listener: ListenerConfig,
    pub master: Option<MasterConfig>,
    pub telemetry: TelemetryConfig,
    /// Dialect name to `false`, `true` or a table of options.
    pub dialects: BTreeMap<String, DialectOptions>,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetryConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence when set.
    pub filter: String,
    pub format: LogFormat,
    /// OTLP/gRPC collector endpoint. Spans are exported only when set.
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            format: LogFormat::default(),
            otlp_endpoint: None,
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl AppConfig {
    /// Parses configuration text. `origin` names the source in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid configuration.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read from the working directory when present; otherwise the defaults
    /// apply.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if a file that must be read cannot be,
    /// and [`ConfigError::Parse`] if its contents are invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&text, &path)
    }
}

#[cfg(test)]
mod tests;
