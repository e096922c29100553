//! Error types for ingress-capture
//!
//! Errors are grouped by subsystem and converge on [`CaptureError`].

use std::io;

use thiserror::Error;

/// Top-level error type for ingress-capture
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Configuration errors (file parsing, validation)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Frontend lookup and persistence errors
    #[error("Frontend error: {0}")]
    Frontend(#[from] FrontendError),

    /// Manifest could not be parsed
    #[error("Failed to parse manifest {path}: {reason}")]
    Manifest { path: String, reason: String },

    /// I/O errors not covered by other categories
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CaptureError {
    /// Create a manifest parse error
    pub fn manifest(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found or inaccessible
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Validation error (invalid values, missing required fields)
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// Environment variable error
    #[error("Environment variable error: {name}: {reason}")]
    EnvError { name: String, reason: String },

    /// I/O error while reading config
    #[error("I/O error reading configuration: {0}")]
    IoError(#[from] io::Error),
}

/// Frontend store errors
#[derive(Debug, Error)]
pub enum FrontendError {
    /// Frontend does not exist in the store
    #[error("Frontend not found: {name}")]
    NotFound { name: String },

    /// Failed to persist a frontend change
    #[error("Failed to edit frontend {name}: {reason}")]
    Edit { name: String, reason: String },
}

impl FrontendError {
    /// Create a not found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an edit error
    pub fn edit(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Edit {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Annotation value errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    /// Value could not be interpreted for the given key
    #[error("Invalid value for annotation {key}: {value:?}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl AnnotationError {
    /// Create an invalid value error
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Type alias for Result with `CaptureError`
pub type Result<T> = std::result::Result<T, CaptureError>;
