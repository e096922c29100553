//! Configuration types for ingress-capture
//!
//! Configuration is loaded from JSON and validated before use.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::annotations::Annotations;
use crate::capture::DEFAULT_CAPTURE_LEN;
use crate::error::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Directory the `.lst` map files are rendered into
    #[serde(default = "default_map_dir")]
    pub map_dir: PathBuf,

    /// Request capture settings
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Global default annotations (the ConfigMap layer)
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "map_dir cannot be empty".into(),
            ));
        }

        if self.map_dir.is_relative() {
            return Err(ConfigError::ValidationError(format!(
                "map_dir must be an absolute path: {}",
                self.map_dir.display()
            )));
        }

        self.capture.validate()?;
        self.log.validate()?;

        Ok(())
    }

    /// Global annotation layer built from [`Config::annotations`]
    #[must_use]
    pub fn global_annotations(&self) -> Annotations {
        self.annotations
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    /// Create a minimal default configuration
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            map_dir: default_map_dir(),
            capture: CaptureConfig::default(),
            annotations: BTreeMap::new(),
            log: LogConfig::default(),
        }
    }
}

/// Request capture settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaptureConfig {
    /// Capture length used when the annotation is absent or unusable
    #[serde(default = "default_capture_len")]
    pub default_len: i64,
}

impl CaptureConfig {
    /// Validate capture settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_len <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "capture.default_len must be greater than 0, got {}",
                self.default_len
            )));
        }
        Ok(())
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            default_len: default_capture_len(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: "json" or "text"
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Include target (module path)
    #[serde(default = "default_true")]
    pub target: bool,
}

impl LogConfig {
    /// Validate logging settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.format.as_str(), "json" | "text") {
            return Err(ConfigError::ValidationError(format!(
                "log.format must be 'json' or 'text', got '{}'",
                self.format
            )));
        }
        Ok(())
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            target: true,
        }
    }
}

fn default_map_dir() -> PathBuf {
    PathBuf::from("/etc/haproxy/maps")
}

const fn default_capture_len() -> i64 {
    DEFAULT_CAPTURE_LEN
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "text".into()
}

const fn default_true() -> bool {
    true
}
