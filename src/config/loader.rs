//! Configuration loading and management
//!
//! This module handles loading configuration from files and environment variables.

use std::path::Path;

use tracing::{debug, info};

use super::types::Config;
use crate::error::ConfigError;

/// Load configuration from a JSON file
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    debug!("Loading configuration from {:?}", path);

    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let contents = std::fs::read_to_string(path)?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| {
        ConfigError::ParseError(format!("Failed to parse JSON: {e} at {path:?}"))
    })?;

    config.validate()?;

    info!(
        "Configuration loaded: map_dir={}, default capture len={}, {} global annotations",
        config.map_dir.display(),
        config.capture.default_len,
        config.annotations.len()
    );

    Ok(config)
}

/// Load configuration from a JSON string
///
/// # Errors
///
/// Returns `ConfigError` if parsing or validation fails.
pub fn load_config_str(json: &str) -> Result<Config, ConfigError> {
    let config: Config =
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.validate()?;

    Ok(config)
}

/// Load configuration with environment variable overrides
///
/// Environment variables:
/// - `INGRESS_CAPTURE_MAP_DIR`: Override map file directory
/// - `INGRESS_CAPTURE_LOG_LEVEL`: Override log level
/// - `INGRESS_CAPTURE_DEFAULT_LEN`: Override default capture length
///
/// # Errors
///
/// Returns `ConfigError` if loading or parsing fails.
pub fn load_config_with_env(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let mut config = load_config(path)?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    Ok(config)
}

/// Build the default configuration with environment variable overrides
///
/// Used when no configuration file exists. Honors the same variables as
/// [`load_config_with_env`].
///
/// # Errors
///
/// Returns `ConfigError` if an override is malformed or fails validation.
pub fn load_default_with_env() -> Result<Config, ConfigError> {
    default_with_overrides(|name| std::env::var(name).ok())
}

fn default_with_overrides<F>(var: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default_config();
    apply_env_overrides(&mut config, var)?;
    debug!("No configuration file, using defaults");
    Ok(config)
}

/// Apply overrides from a variable lookup and re-validate
fn apply_env_overrides<F>(config: &mut Config, var: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = var("INGRESS_CAPTURE_MAP_DIR") {
        config.map_dir = dir.into();
        debug!("Map directory overridden to {}", config.map_dir.display());
    }

    if let Some(level) = var("INGRESS_CAPTURE_LOG_LEVEL") {
        config.log.level = level;
        debug!("Log level overridden to {}", config.log.level);
    }

    if let Some(len) = var("INGRESS_CAPTURE_DEFAULT_LEN") {
        config.capture.default_len = len.parse().map_err(|_| ConfigError::EnvError {
            name: "INGRESS_CAPTURE_DEFAULT_LEN".into(),
            reason: format!("Invalid number: {len}"),
        })?;
        debug!(
            "Default capture length overridden to {}",
            config.capture.default_len
        );
    }

    config.validate()
}

/// Create a default configuration file at the given path
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be written.
pub fn create_default_config(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let config = Config::default_config();
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| ConfigError::ParseError(format!("Failed to serialize config: {e}")))?;

    std::fs::write(path, json)?;
    Ok(())
}
