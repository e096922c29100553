//! ingress-capture: request capture rules for an HAProxy ingress controller
//!
//! This crate turns the `request-capture` annotation of ingress resources
//! into HAProxy `http-request capture` and `tcp-request content capture`
//! rules. Every distinct capture expression is identified by a
//! content-addressed key, so many ingresses capturing the same sample share
//! one map file listing their hostnames and one pair of rules.
//!
//! # Architecture
//!
//! ```text
//! Ingress annotations ─┐
//!                      ├─> CaptureDirective ─> effective status
//! Global annotations ──┘                           │
//!                        per sample: ContentKey ───┼─> MapFiles (key -> hosts)
//!                                                  └─> RuleSets (key -> http/tcp rules, flags)
//! ```
//!
//! A reconciliation pass owns a [`MapFiles`] store and a [`RuleSets`]
//! value and hands them to [`RequestCapture::apply`] once per ingress. The
//! render pipeline then writes the modified map files and rebuilds the
//! rule sections whose flags are raised.
//!
//! # Modules
//!
//! - [`annotations`]: Layered annotation lookup and change status
//! - [`capture`]: Directive resolution, content keys and rule emission
//! - [`config`]: Configuration types and loading
//! - [`error`]: Error types
//! - [`frontend`]: Frontend store and `maxconn` updates
//! - [`ingress`]: Ingress resource model
//! - [`maps`]: Host-membership map store
//! - [`pass`]: One reconciliation pass over a manifest
//! - [`rules`]: Generated rule types and pending rule sets

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod annotations;
pub mod capture;
pub mod config;
pub mod error;
pub mod frontend;
pub mod ingress;
pub mod maps;
pub mod pass;
pub mod rules;

// Re-export commonly used types at the crate root
pub use annotations::{Annotation, AnnotationSource, Annotations, Status};
pub use capture::{CaptureOutcome, ContentKey, RequestCapture, DEFAULT_CAPTURE_LEN};
pub use config::{Config, LogConfig};
pub use error::{AnnotationError, CaptureError, ConfigError, FrontendError};
pub use frontend::{handle_maxconn, Frontend, FrontendStore, InMemoryFrontendStore};
pub use ingress::{Ingress, IngressRule};
pub use maps::{MapFile, MapFiles};
pub use pass::{load_manifest, run_pass, Manifest, PassReport};
pub use rules::{HttpRequestRule, RuleSets, TcpRequestRule};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
