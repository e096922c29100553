//! Proxy rules generated by a reconciliation pass
//!
//! Rules are plain data. Each distinct capture expression contributes one
//! HTTP-layer and one connection-layer rule, both keyed by its content key.
//!
//! # Example
//!
//! ```
//! use std::path::PathBuf;
//! use ingress_capture::capture::ContentKey;
//! use ingress_capture::rules::{HttpRequestRule, RuleSets, TcpRequestRule};
//!
//! let key = ContentKey::request_capture("hdr(User-Agent)", 128);
//! let map_file = PathBuf::from(format!("/etc/haproxy/maps/{key}.lst"));
//!
//! let mut sets = RuleSets::new();
//! sets.insert(
//!     key,
//!     HttpRequestRule::capture("hdr(User-Agent)", 128, &map_file),
//!     TcpRequestRule::capture("hdr(User-Agent)", 128, &map_file),
//! );
//! sets.mark_modified();
//!
//! assert!(sets.is_modified());
//! assert_eq!(sets.http(key).unwrap()[0].capture_len, 128);
//! ```

pub mod types;

pub use types::*;
