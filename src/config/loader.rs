//! Settings for the gatecfg tool itself, not for the documents it edits
//!
//! Loads configuration from multiple locations with layered priority:
//! 1. `/etc/gatecfg/config.toml` (lowest priority)
//! 2. `~/.config/gatecfg/config.toml`
//! 3. `~/.gatecfg.toml`
//! 4. `./.gatecfg.toml` (highest priority)
//! 5. `--config <file>`
//! 6. `GATECFG_*` environment variables
//!
//! Recognized keys:
//!
//! ```toml
//! [document]
//! path = "~/src/app/setup.cfg"   # document used when `-d` is not given
//!
//! [output]
//! format = "json"                # table, json or plain
//!
//! # extra or replacement option shapes, merged over the built-in schemas
//! [schemas."tool:pytest"]
//! timeout = "integer"
//! ```
//!
//! The same keys are reachable from the environment with `__` as the
//! separator, e.g. `GATECFG_OUTPUT__FORMAT=plain` or
//! `GATECFG_SCHEMAS__ISORT__PROFILE=scalar`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use super::model::Config;

/// Application name used for XDG directories
const APP_NAME: &str = "gatecfg";

/// Get XDG config search paths in priority order (lowest to highest)
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. System-wide config (lowest priority)
    paths.push(PathBuf::from(format!("/etc/{}/config.toml", APP_NAME)));

    // 2. XDG config home
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_NAME).join("config.toml"));
    }

    // 3. Home directory
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(format!(".{}.toml", APP_NAME)));
    }

    // 4. Current directory (highest priority)
    paths.push(PathBuf::from(format!(".{}.toml", APP_NAME)));

    paths
}

/// Load configuration with XDG layering
///
/// Configurations are merged in priority order, with later files
/// overriding earlier ones. Environment variables with prefix
/// `GATECFG_` override all file-based configuration.
pub fn load_config(override_path: Option<&str>) -> Result<Config> {
    let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

    for path in config_paths() {
        if path.exists() {
            tracing::debug!("Loading config from: {}", path.display());
            figment = figment.merge(Toml::file(&path));
        }
    }

    if let Some(path) = override_path {
        let path = PathBuf::from(path);
        if path.exists() {
            tracing::debug!("Loading override config from: {}", path.display());
            figment = figment.merge(Toml::file(&path));
        } else {
            tracing::warn!("Override config not found: {}", path.display());
        }
    }

    // Format: GATECFG_DOCUMENT__PATH=tox.ini
    // Maps to: document.path = "tox.ini"
    figment = figment.merge(Env::prefixed("GATECFG_").split("__"));

    figment.extract().context("Failed to load configuration")
}
