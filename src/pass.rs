//! One reconciliation pass over a set of ingresses
//!
//! Drives [`RequestCapture`] for every ingress, applies the global
//! `maxconn` annotation to the known frontends and collects what the
//! render pipeline needs.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::annotations::{AnnotationSource, MAXCONN};
use crate::capture::RequestCapture;
use crate::config::Config;
use crate::error::{CaptureError, Result};
use crate::frontend::{handle_maxconn, Frontend, FrontendStore, InMemoryFrontendStore};
use crate::ingress::Ingress;
use crate::maps::MapFiles;
use crate::rules::RuleSets;

/// Resources observed for one pass
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Manifest {
    /// Watched ingresses
    #[serde(default)]
    pub ingresses: Vec<Ingress>,

    /// Frontends currently defined in the proxy
    #[serde(default)]
    pub frontends: Vec<Frontend>,
}

/// Read a JSON manifest from disk
///
/// # Errors
///
/// Returns `CaptureError::Io` if the file cannot be read and
/// `CaptureError::Manifest` if it is not a valid manifest.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Manifest> {
    let path = path.as_ref();
    debug!("Loading manifest from {:?}", path);

    let contents = std::fs::read_to_string(path)?;
    let manifest: Manifest = serde_json::from_str(&contents)
        .map_err(|e| CaptureError::manifest(path.display().to_string(), e.to_string()))?;

    debug!(
        ingresses = manifest.ingresses.len(),
        frontends = manifest.frontends.len(),
        "Manifest loaded"
    );
    Ok(manifest)
}

/// Result of a pass, ready for rendering
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    /// Pending rules and layer flags
    pub rules: RuleSets,

    /// Modified map files: path -> content
    pub map_files: BTreeMap<String, String>,

    /// Frontends after `maxconn` was applied
    pub frontends: Vec<Frontend>,

    /// Non-fatal problems found during the pass
    pub warnings: Vec<String>,
}

/// Run a pass over `manifest` with the settings in `config`
///
/// # Errors
///
/// Returns an error if a frontend named in the manifest cannot be fetched
/// while applying `maxconn`.
pub fn run_pass(config: &Config, manifest: &Manifest) -> Result<PassReport> {
    let global = config.global_annotations();
    let handler = RequestCapture::new(&global).with_default_len(config.capture.default_len);
    let mut maps = MapFiles::new(&config.map_dir);
    let mut rules = RuleSets::new();
    let mut warnings = Vec::new();

    for ingress in &manifest.ingresses {
        let Some(outcome) = handler.apply(ingress, &mut maps, &mut rules) else {
            continue;
        };
        if let Some(warning) = outcome.length_warning {
            warnings.push(format!("{}: {}", ingress.full_name(), warning));
        }
        info!(
            ingress = %ingress.full_name(),
            status = %outcome.status,
            emitted = outcome.emitted.len(),
            "Request capture applied"
        );
    }

    let store: InMemoryFrontendStore = manifest.frontends.iter().cloned().collect();
    if let Some(annotation) = global.annotation(MAXCONN) {
        match annotation.value.parse::<i64>() {
            Ok(maxconn) => {
                let names: Vec<&str> = manifest.frontends.iter().map(|f| f.name.as_str()).collect();
                handle_maxconn(&store, Some(maxconn), &names)?;
            }
            Err(e) => {
                warn!(value = %annotation.value, "Ignoring invalid {}: {}", MAXCONN, e);
                warnings.push(format!("{MAXCONN}: invalid value {:?}: {e}", annotation.value));
            }
        }
    }

    let map_files = maps
        .modified_keys()
        .filter_map(|key| {
            let content = maps.content(key)?;
            Some((maps.path(key).display().to_string(), content))
        })
        .collect();

    let frontends = manifest
        .frontends
        .iter()
        .filter_map(|f| store.get(&f.name).ok())
        .collect();

    Ok(PassReport {
        rules,
        map_files,
        frontends,
        warnings,
    })
}
