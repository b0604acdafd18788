//! Configuration module for gatecfg
//!
//! Provides XDG-compliant layered loading of the tool's own settings.

pub mod loader;
pub mod model;

pub use loader::{config_paths, load_config};
pub use model::*;
