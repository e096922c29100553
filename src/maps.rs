//! Host-membership map store
//!
//! Each [`ContentKey`] owns one map file listing the hostnames whose
//! traffic the matching rules apply to. The store tracks membership and a
//! per-file modified flag; writing the `.lst` files is left to the render
//! pipeline, which reads [`MapFiles::content`] and [`MapFiles::path`].
//!
//! # Example
//!
//! ```
//! use ingress_capture::capture::ContentKey;
//! use ingress_capture::maps::MapFiles;
//!
//! let mut maps = MapFiles::new("/etc/haproxy/maps");
//! let key = ContentKey::from(7);
//! maps.append_host(key, "b.com");
//! maps.append_host(key, "a.com");
//! maps.append_host(key, "a.com");
//!
//! assert_eq!(maps.content(key).as_deref(), Some("a.com\nb.com\n"));
//! assert_eq!(maps.path(key).to_str(), Some("/etc/haproxy/maps/7.lst"));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::capture::ContentKey;

/// Extension of rendered map files
pub const MAP_FILE_EXTENSION: &str = "lst";

/// Hostnames sharing one content key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapFile {
    hosts: BTreeSet<String>,
    modified: bool,
}

impl MapFile {
    /// Hostnames in this map file
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    /// Check if a hostname is listed
    #[must_use]
    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    /// Whether the file must be re-rendered
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// One hostname per line, sorted
    #[must_use]
    pub fn content(&self) -> String {
        self.hosts.iter().fold(String::new(), |mut out, host| {
            out.push_str(host);
            out.push('\n');
            out
        })
    }
}

/// Map files keyed by content key
#[derive(Debug, Clone)]
pub struct MapFiles {
    dir: PathBuf,
    files: BTreeMap<ContentKey, MapFile>,
}

impl MapFiles {
    /// Create an empty store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: BTreeMap::new(),
        }
    }

    /// Directory map files are rendered into
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the map file for `key`: `<dir>/<key>.lst`
    #[must_use]
    pub fn path(&self, key: ContentKey) -> PathBuf {
        self.dir
            .join(key.to_string())
            .with_extension(MAP_FILE_EXTENSION)
    }

    /// Flag the map file for `key` as modified, creating it if needed
    pub fn modified(&mut self, key: ContentKey) {
        self.files.entry(key).or_default().modified = true;
    }

    /// Register `host` under `key`
    ///
    /// Re-registering an existing host is a no-op. Returns `true` when the
    /// host was newly added.
    pub fn append_host(&mut self, key: ContentKey, host: impl Into<String>) -> bool {
        let host = host.into();
        let file = self.files.entry(key).or_default();
        if file.hosts.contains(&host) {
            return false;
        }
        debug!(key = %key, host = %host, "Adding host to map file");
        file.hosts.insert(host);
        true
    }

    /// Map file for `key`
    #[must_use]
    pub fn get(&self, key: ContentKey) -> Option<&MapFile> {
        self.files.get(&key)
    }

    /// Rendered content for `key`
    #[must_use]
    pub fn content(&self, key: ContentKey) -> Option<String> {
        self.files.get(&key).map(MapFile::content)
    }

    /// Iterate over all map files in key order
    pub fn iter(&self) -> impl Iterator<Item = (ContentKey, &MapFile)> {
        self.files.iter().map(|(k, v)| (*k, v))
    }

    /// Keys whose map files need re-rendering
    pub fn modified_keys(&self) -> impl Iterator<Item = ContentKey> + '_ {
        self.files
            .iter()
            .filter(|(_, f)| f.modified)
            .map(|(k, _)| *k)
    }

    /// Clear every modified flag once the files have been rendered
    pub fn clean(&mut self) {
        for file in self.files.values_mut() {
            file.modified = false;
        }
    }

    /// Number of map files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
