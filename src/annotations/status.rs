//! Change status carried by annotations, ingresses and rule sets

use std::fmt;

use serde::{Deserialize, Serialize};

/// Change status produced by the upstream diff of a watched resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Unchanged since the previous pass
    #[default]
    Empty,
    /// Newly created
    Added,
    /// Changed in place
    Modified,
    /// Removed
    Deleted,
}

impl Status {
    /// All statuses, in declaration order
    pub const ALL: [Self; 4] = [Self::Empty, Self::Added, Self::Modified, Self::Deleted];

    /// Check if this status carries no change
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Check if this status is a deletion
    #[must_use]
    pub const fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Added => write!(f, "added"),
            Self::Modified => write!(f, "modified"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}
