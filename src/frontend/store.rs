//! Frontend store
//!
//! [`FrontendStore`] is the seam to the proxy configuration API. The
//! in-memory implementation backs tests and the CLI.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::FrontendError;

/// Proxy mode of a frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontendMode {
    /// Layer 7
    #[default]
    Http,
    /// Layer 4
    Tcp,
}

/// Listener endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontend {
    /// Unique frontend name
    pub name: String,

    /// Proxy mode
    #[serde(default)]
    pub mode: FrontendMode,

    /// Maximum concurrent connections; `None` leaves the engine default
    #[serde(default)]
    pub maxconn: Option<i64>,

    /// Backend used when no rule matches
    #[serde(default)]
    pub default_backend: Option<String>,
}

impl Frontend {
    /// Create an HTTP frontend with no connection limit
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: FrontendMode::Http,
            maxconn: None,
            default_backend: None,
        }
    }

    /// Set the proxy mode
    #[must_use]
    pub const fn with_mode(mut self, mode: FrontendMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Fetch and persist frontend settings
pub trait FrontendStore {
    /// Fetch a frontend by name
    ///
    /// # Errors
    ///
    /// Returns `FrontendError::NotFound` if no frontend has that name.
    fn get(&self, name: &str) -> Result<Frontend, FrontendError>;

    /// Persist a modified frontend
    ///
    /// # Errors
    ///
    /// Returns `FrontendError` if the change cannot be written.
    fn edit(&self, frontend: Frontend) -> Result<(), FrontendError>;
}

/// Frontends held in memory
#[derive(Debug, Default)]
pub struct InMemoryFrontendStore {
    frontends: DashMap<String, Frontend>,
}

impl InMemoryFrontendStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a frontend
    pub fn add(&self, frontend: Frontend) {
        info!("Adding frontend: {} (mode: {:?})", frontend.name, frontend.mode);
        self.frontends.insert(frontend.name.clone(), frontend);
    }

    /// Check if a frontend exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.frontends.contains_key(name)
    }

    /// Get all frontend names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.frontends.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of frontends
    #[must_use]
    pub fn len(&self) -> usize {
        self.frontends.len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frontends.is_empty()
    }
}

impl FrontendStore for InMemoryFrontendStore {
    fn get(&self, name: &str) -> Result<Frontend, FrontendError> {
        self.frontends
            .get(name)
            .map(|r| r.value().clone())
            .ok_or_else(|| FrontendError::not_found(name))
    }

    fn edit(&self, frontend: Frontend) -> Result<(), FrontendError> {
        let Some(mut entry) = self.frontends.get_mut(&frontend.name) else {
            return Err(FrontendError::edit(frontend.name, "frontend does not exist"));
        };
        debug!("Editing frontend {}", frontend.name);
        *entry = frontend;
        Ok(())
    }
}

impl FromIterator<Frontend> for InMemoryFrontendStore {
    fn from_iter<I: IntoIterator<Item = Frontend>>(iter: I) -> Self {
        let store = Self::new();
        for frontend in iter {
            store.add(frontend);
        }
        store
    }
}
