//! Capture directive resolution
//!
//! Reads `request-capture` and `request-capture-len` through the layered
//! annotation lookup and applies the length fallback rules.

use tracing::warn;

use crate::annotations::{
    resolve, Annotation, AnnotationSource, Status, REQUEST_CAPTURE, REQUEST_CAPTURE_LEN,
};
use crate::error::AnnotationError;

/// Capture length used when none is configured or the configured one is unusable
pub const DEFAULT_CAPTURE_LEN: i64 = 128;

/// Parsed request-capture directive for one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureDirective {
    /// Newline-separated samples, in order, blank entries included
    pub samples: Vec<String>,

    /// Bytes captured per sample
    pub capture_len: i64,

    /// The directive annotation's own change status
    pub status: Status,

    /// Set when the length annotation was present but unusable
    pub length_warning: Option<AnnotationError>,
}

impl CaptureDirective {
    /// Resolve the directive from the resource and global annotation layers
    ///
    /// Returns `None` when no `request-capture` annotation exists in either
    /// layer; the pass then has nothing to do.
    pub fn resolve(
        resource: &dyn AnnotationSource,
        global: &dyn AnnotationSource,
        default_len: i64,
    ) -> Option<Self> {
        let capture = resolve(REQUEST_CAPTURE, resource, global)?;
        let len_annotation = resolve(REQUEST_CAPTURE_LEN, resource, global);
        let (capture_len, length_warning) = resolve_capture_len(len_annotation, default_len);

        Some(Self {
            samples: capture.value.split('\n').map(str::to_string).collect(),
            capture_len,
            status: capture.status,
            length_warning,
        })
    }
}

/// Resolve the capture length from its annotation
///
/// A deleted annotation, an absent one, or a value that is not a positive
/// base-10 integer all yield `default_len`. Only the last case records a
/// warning; it never fails the directive.
pub fn resolve_capture_len(
    annotation: Option<&Annotation>,
    default_len: i64,
) -> (i64, Option<AnnotationError>) {
    let Some(annotation) = annotation else {
        return (default_len, None);
    };
    if annotation.status.is_deleted() {
        return (default_len, None);
    }

    let reason = match annotation.value.parse::<i64>() {
        Ok(len) if len > 0 => return (len, None),
        Ok(_) => "capture length must be positive".to_string(),
        Err(e) => e.to_string(),
    };

    warn!(
        value = %annotation.value,
        default = default_len,
        "Invalid {}, using default: {}",
        REQUEST_CAPTURE_LEN,
        reason
    );
    (
        default_len,
        Some(AnnotationError::invalid_value(
            REQUEST_CAPTURE_LEN,
            annotation.value.clone(),
            reason,
        )),
    )
}
