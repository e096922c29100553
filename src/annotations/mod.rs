//! Layered annotation lookup
//!
//! Annotations are string key/value pairs attached to an ingress, with a
//! cluster-wide default layer taken from the controller configuration.
//! A lookup consults the resource layer first and falls back to the
//! global layer.
//!
//! # Example
//!
//! ```
//! use ingress_capture::annotations::{resolve, Annotations, Status};
//!
//! let mut ingress = Annotations::new();
//! ingress.insert_with_status("request-capture", "hdr(User-Agent)", Status::Added);
//!
//! let mut global = Annotations::new();
//! global.insert("request-capture-len", "64");
//!
//! let capture = resolve("request-capture", &ingress, &global).unwrap();
//! assert_eq!(capture.status, Status::Added);
//!
//! let len = resolve("request-capture-len", &ingress, &global).unwrap();
//! assert_eq!(len.value, "64");
//! ```

mod status;

pub use status::Status;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Annotation key holding the newline-separated capture samples
pub const REQUEST_CAPTURE: &str = "request-capture";

/// Annotation key holding the capture length
pub const REQUEST_CAPTURE_LEN: &str = "request-capture-len";

/// Annotation key holding the frontend connection limit
pub const MAXCONN: &str = "maxconn";

/// A single annotation value with its change status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AnnotationRepr")]
pub struct Annotation {
    /// Raw annotation value
    pub value: String,

    /// Change status of this value since the previous pass
    pub status: Status,
}

impl Annotation {
    /// Create an unchanged annotation
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            status: Status::Empty,
        }
    }

    /// Set the change status
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

/// Accepts either a bare string or `{ "value": ..., "status": ... }`
#[derive(Deserialize)]
#[serde(untagged)]
enum AnnotationRepr {
    Plain(String),
    Full {
        value: String,
        #[serde(default)]
        status: Status,
    },
}

impl From<AnnotationRepr> for Annotation {
    fn from(repr: AnnotationRepr) -> Self {
        match repr {
            AnnotationRepr::Plain(value) => Self::new(value),
            AnnotationRepr::Full { value, status } => Self { value, status },
        }
    }
}

/// Source of annotation values
pub trait AnnotationSource {
    /// Look up an annotation by key
    fn annotation(&self, key: &str) -> Option<&Annotation>;
}

/// Ordered annotation map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotations(BTreeMap<String, Annotation>);

impl Annotations {
    /// Create an empty annotation map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an unchanged annotation
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), Annotation::new(value));
        self
    }

    /// Insert an annotation with an explicit change status
    pub fn insert_with_status(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        status: Status,
    ) -> &mut Self {
        self.0
            .insert(key.into(), Annotation::new(value).with_status(status));
        self
    }

    /// Remove an annotation
    pub fn remove(&mut self, key: &str) -> Option<Annotation> {
        self.0.remove(key)
    }

    /// Number of annotations
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no annotations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over annotations in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Annotation)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl AnnotationSource for Annotations {
    fn annotation(&self, key: &str) -> Option<&Annotation> {
        self.0.get(key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Annotations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Annotation::new(v)))
                .collect(),
        )
    }
}

/// Resolve an annotation from the resource layer, falling back to the
/// global layer
///
/// Returns `None` when neither layer defines the key.
pub fn resolve<'a>(
    key: &str,
    resource: &'a dyn AnnotationSource,
    global: &'a dyn AnnotationSource,
) -> Option<&'a Annotation> {
    resource
        .annotation(key)
        .or_else(|| global.annotation(key))
}
