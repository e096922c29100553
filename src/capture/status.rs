//! Effective change status of a capture directive
//!
//! | resource \ directive | Empty    | Added    | Modified | Deleted  |
//! |----------------------|----------|----------|----------|----------|
//! | Empty                | Empty    | Empty    | Empty    | Empty    |
//! | Added                | Added    | Added    | Added    | Added    |
//! | Modified             | Modified | Added    | Modified | Deleted  |
//! | Deleted              | Deleted  | Deleted  | Deleted  | Deleted  |
//!
//! A resource-wide `Modified` is too coarse to tell whether the capture
//! itself changed, so the directive's own status refines it.

use crate::annotations::Status;

/// Combine the owning resource's status with the directive's own status
#[must_use]
pub const fn effective_status(resource: Status, directive: Status) -> Status {
    match (resource, directive) {
        (Status::Modified, Status::Empty) => Status::Modified,
        (Status::Modified, directive) => directive,
        (resource, _) => resource,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::Status::{Added, Deleted, Empty, Modified};

    #[test]
    fn test_decision_table() {
        let table = [
            (Empty, Empty, Empty),
            (Empty, Added, Empty),
            (Empty, Modified, Empty),
            (Empty, Deleted, Empty),
            (Added, Empty, Added),
            (Added, Added, Added),
            (Added, Modified, Added),
            (Added, Deleted, Added),
            (Modified, Empty, Modified),
            (Modified, Added, Added),
            (Modified, Modified, Modified),
            (Modified, Deleted, Deleted),
            (Deleted, Empty, Deleted),
            (Deleted, Added, Deleted),
            (Deleted, Modified, Deleted),
            (Deleted, Deleted, Deleted),
        ];
        for (resource, directive, expected) in table {
            assert_eq!(
                effective_status(resource, directive),
                expected,
                "resource={resource} directive={directive}"
            );
        }
    }

    #[test]
    fn test_table_covers_every_combination() {
        for resource in Status::ALL {
            for directive in Status::ALL {
                let status = effective_status(resource, directive);
                if resource == Modified {
                    assert!(status == directive || (directive == Empty && status == Modified));
                } else {
                    assert_eq!(status, resource);
                }
            }
        }
    }
}
