//! Configuration module for ingress-capture
//!
//! This module provides configuration types and loading utilities.
//!
//! # Example
//!
//! ```no_run
//! use ingress_capture::config::load_config;
//!
//! let config = load_config("/etc/ingress-capture/config.json").unwrap();
//! println!("Map files in {}", config.map_dir.display());
//! ```

mod loader;
mod types;

pub use loader::{
    create_default_config, load_config, load_config_str, load_config_with_env,
    load_default_with_env,
};
pub use types::{CaptureConfig, Config, LogConfig};
