//! Frontend (listener endpoint) settings
//!
//! # Example
//!
//! ```
//! use ingress_capture::frontend::{handle_maxconn, Frontend, FrontendStore, InMemoryFrontendStore};
//!
//! let store: InMemoryFrontendStore = [Frontend::new("http"), Frontend::new("https")]
//!     .into_iter()
//!     .collect();
//!
//! handle_maxconn(&store, Some(2000), &["http", "https"]).unwrap();
//! assert_eq!(store.get("https").unwrap().maxconn, Some(2000));
//! ```

mod store;

pub use store::{Frontend, FrontendMode, FrontendStore, InMemoryFrontendStore};

use tracing::{error, info};

use crate::error::FrontendError;

/// Set `maxconn` on each named frontend and persist it
///
/// `None` clears the limit. Frontends are processed in order and the
/// first lookup failure is returned immediately; frontends earlier in the
/// list keep their new limit. A failed write is logged and skipped.
///
/// # Errors
///
/// Returns the `FrontendError` of the first frontend that cannot be fetched.
pub fn handle_maxconn<S>(
    store: &S,
    maxconn: Option<i64>,
    frontends: &[&str],
) -> Result<(), FrontendError>
where
    S: FrontendStore + ?Sized,
{
    for name in frontends {
        let mut frontend = store.get(name)?;
        frontend.maxconn = maxconn;
        match store.edit(frontend) {
            Ok(()) => info!(frontend = %name, ?maxconn, "maxconn updated"),
            Err(e) => error!(frontend = %name, "Failed to persist maxconn: {}", e),
        }
    }
    Ok(())
}
