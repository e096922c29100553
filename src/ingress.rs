//! Ingress resource model
//!
//! Only the parts the capture pass reads are modelled: the annotations,
//! the hostnames declared by routing rules and the resource change status.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::annotations::{Annotations, Status};

/// Host rule; only the hostname feeds map files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    /// Hostname the rule applies to
    #[serde(default)]
    pub host: String,
}

/// A routing resource with its annotations and host rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingress {
    /// Namespace of the resource
    #[serde(default)]
    pub namespace: String,

    /// Resource name
    pub name: String,

    /// Resource-level annotations
    #[serde(default)]
    pub annotations: Annotations,

    /// Host rules keyed by hostname
    #[serde(default)]
    pub rules: BTreeMap<String, IngressRule>,

    /// Change status of the whole resource
    #[serde(default)]
    pub status: Status,
}

impl Ingress {
    /// Create an ingress with no rules or annotations
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the resource change status
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Add a host rule
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        let host = host.into();
        self.rules.insert(host.clone(), IngressRule { host });
        self
    }

    /// Hostnames declared under this resource's rules
    pub fn hostnames(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// `namespace/name`, used in log fields
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}
