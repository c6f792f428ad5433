//! TOML configuration for the validators.
//!
//! ```toml
//! [url]
//! allowed_schemes = ["https"]
//! allow_localhost = false
//! allow_private_ip = false
//! resolve_host_timeout_ms = 2000
//!
//! [path]
//! allow_relative = false
//! allowed_dirs = ["/srv/uploads"]
//! check_traversal = true
//! ```
//!
//! Every key is optional; missing keys take the secure defaults.

use std::io;
use std::path::{Path, PathBuf};

use guardrail_common::ErrorCategory;
use guardrail_path::{PathOptions, PathValidator};
use guardrail_url::{AsyncUrlValidator, UrlOptions, UrlValidator};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConfigError::Read { .. } => ErrorCategory::Io,
            ConfigError::Parse(_) | ConfigError::Serialize(_) => ErrorCategory::Format,
        }
    }
}

/// Options for both validators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailConfig {
    pub url: UrlOptions,
    pub path: PathOptions,
}

impl GuardrailConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading guardrail config");
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// URL validator using the system resolver.
    pub fn url_validator(&self) -> UrlValidator {
        UrlValidator::new(self.url.clone())
    }

    /// URL validator using the tokio resolver.
    pub fn async_url_validator(&self) -> AsyncUrlValidator {
        AsyncUrlValidator::new(self.url.clone())
    }

    /// Path validator on the real filesystem.
    pub fn path_validator(&self) -> PathValidator {
        PathValidator::new(self.path.clone())
    }
}
