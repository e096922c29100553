//! Request capture handling
//!
//! Turns the `request-capture` annotation of an ingress into capture rules
//! for both proxy layers. Each sample gets a [`ContentKey`]; ingresses that
//! capture the same sample with the same length share one map file and one
//! rule pair.
//!
//! # Flow
//!
//! ```text
//! annotations -> CaptureDirective -> effective_status
//!                                        |
//!            for each sample: key -> MapFiles (hosts) -> RuleSets (http + tcp)
//! ```
//!
//! # Example
//!
//! ```
//! use ingress_capture::annotations::{Annotations, Status};
//! use ingress_capture::capture::RequestCapture;
//! use ingress_capture::ingress::Ingress;
//! use ingress_capture::maps::MapFiles;
//! use ingress_capture::rules::RuleSets;
//!
//! let mut ingress = Ingress::new("default", "web")
//!     .with_host("a.com")
//!     .with_status(Status::Added);
//! ingress.annotations.insert("request-capture", "hdr(User-Agent)");
//!
//! let global = Annotations::new();
//! let handler = RequestCapture::new(&global);
//! let mut maps = MapFiles::new("/etc/haproxy/maps");
//! let mut rules = RuleSets::new();
//!
//! let outcome = handler.apply(&ingress, &mut maps, &mut rules).unwrap();
//! assert_eq!(outcome.emitted.len(), 1);
//! assert!(rules.is_modified());
//! ```

mod key;
mod params;
mod status;

pub use key::{ContentKey, REQUEST_CAPTURE_TAG};
pub use params::{resolve_capture_len, CaptureDirective, DEFAULT_CAPTURE_LEN};
pub use status::effective_status;

use tracing::debug;

use crate::annotations::{AnnotationSource, Status};
use crate::error::AnnotationError;
use crate::ingress::Ingress;
use crate::maps::MapFiles;
use crate::rules::{HttpRequestRule, RuleSets, TcpRequestRule};

/// What one capture pass over an ingress did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// Status that drove the pass
    pub status: Status,

    /// Capture length applied to every sample
    pub capture_len: i64,

    /// Keys flagged as modified, in sample order
    pub modified: Vec<ContentKey>,

    /// Keys a rule pair was emitted for, in sample order
    pub emitted: Vec<ContentKey>,

    /// Set when the length annotation was unusable and the default applied
    pub length_warning: Option<AnnotationError>,
}

/// Request capture handler bound to the global annotation layer
pub struct RequestCapture<'a> {
    global: &'a dyn AnnotationSource,
    default_len: i64,
}

impl<'a> RequestCapture<'a> {
    /// Create a handler using [`DEFAULT_CAPTURE_LEN`]
    pub fn new(global: &'a dyn AnnotationSource) -> Self {
        Self {
            global,
            default_len: DEFAULT_CAPTURE_LEN,
        }
    }

    /// Override the fallback capture length
    #[must_use]
    pub const fn with_default_len(mut self, default_len: i64) -> Self {
        self.default_len = default_len;
        self
    }

    /// Fallback capture length
    #[must_use]
    pub const fn default_len(&self) -> i64 {
        self.default_len
    }

    /// Apply the ingress's capture directive to the map store and rule sets
    ///
    /// Returns `None` when neither the ingress nor the global layer carries
    /// a `request-capture` annotation; nothing is touched in that case.
    ///
    /// With a non-empty effective status every processed key is flagged
    /// modified and both layer flags are raised. A deletion stops at the
    /// first sample, so no rule is emitted for the ingress. Empty samples
    /// never emit rules.
    pub fn apply(
        &self,
        ingress: &Ingress,
        maps: &mut MapFiles,
        rules: &mut RuleSets,
    ) -> Option<CaptureOutcome> {
        let directive = CaptureDirective::resolve(&ingress.annotations, self.global, self.default_len)?;
        let status = effective_status(ingress.status, directive.status);
        let capture_len = directive.capture_len;

        let mut outcome = CaptureOutcome {
            status,
            capture_len,
            modified: Vec::new(),
            emitted: Vec::new(),
            length_warning: directive.length_warning,
        };

        for sample in &directive.samples {
            let key = ContentKey::request_capture(sample, capture_len);

            if !status.is_empty() {
                maps.modified(key);
                rules.mark_modified();
                outcome.modified.push(key);
                if status.is_deleted() {
                    debug!(
                        ingress = %ingress.full_name(),
                        key = %key,
                        "Request capture deleted"
                    );
                    break;
                }
            }

            if sample.is_empty() {
                continue;
            }

            for host in ingress.hostnames() {
                maps.append_host(key, host);
            }

            let map_file = maps.path(key);
            rules.insert(
                key,
                HttpRequestRule::capture(sample.as_str(), capture_len, &map_file),
                TcpRequestRule::capture(sample, capture_len, &map_file),
            );
            debug!(
                ingress = %ingress.full_name(),
                key = %key,
                sample = %sample,
                capture_len,
                "Request capture rules emitted"
            );
            outcome.emitted.push(key);
        }

        Some(outcome)
    }
}
