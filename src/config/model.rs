//! Configuration model for gatecfg
//!
//! Defines the structure for the tool's own XDG-compliant layered settings.
//! This is not the document being inspected; it only says where that
//! document lives and how to present it.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::document::Shape;
use crate::schema::{resolve_schemas, ConsumerSchema};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Which document to read
    #[serde(default)]
    pub document: DocumentConfig,

    /// Output presentation
    #[serde(default)]
    pub output: OutputConfig,

    /// Extra or overriding consumer schemas, keyed by section name
    #[serde(default)]
    pub schemas: HashMap<String, BTreeMap<String, Shape>>,
}

/// Document location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentConfig {
    /// Path to the aggregate config file (`~` is expanded)
    #[serde(default = "default_document_path")]
    pub path: String,
}

fn default_document_path() -> String {
    "setup.cfg".to_string()
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: default_document_path(),
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON output
    Json,
    /// Plain text (one entry per line)
    Plain,
}

/// Output presentation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Config {
    /// Document path with `~` expanded
    pub fn document_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.document.path).as_ref())
    }

    /// Built-in schemas merged with the `[schemas]` table
    pub fn schemas(&self) -> Vec<ConsumerSchema> {
        resolve_schemas(&self.schemas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::find_schema;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.document.path, "setup.cfg");
        assert_eq!(config.output.format, OutputFormat::Table);
        assert!(config.schemas.is_empty());
    }

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
            [output]
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        // Defaults should still apply
        assert_eq!(config.document.path, "setup.cfg");
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
            [document]
            path = "tox.ini"

            [output]
            format = "plain"

            [schemas.flake8]
            max_line_length = "scalar"

            [schemas."coverage:report"]
            fail_under = "integer"
            exclude_lines = "list"
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.document_path(), PathBuf::from("tox.ini"));
        assert_eq!(config.output.format, OutputFormat::Plain);

        let schemas = config.schemas();
        let coverage = find_schema(&schemas, "coverage:report").unwrap();
        assert_eq!(coverage.shape_of("fail_under"), Some(Shape::Integer));
        assert_eq!(
            find_schema(&schemas, "flake8").unwrap().shape_of("max_line_length"),
            Some(Shape::Scalar)
        );
    }

    #[test]
    fn test_unknown_shape_rejected() {
        let toml = r#"
            [schemas.flake8]
            max_line_length = "float"
        "#;

        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_document_path_expands_tilde() {
        let mut config = Config::default();
        config.document.path = "~/project/setup.cfg".to_string();

        let path = config.document_path();
        if dirs::home_dir().is_some() {
            assert!(!path.to_string_lossy().starts_with('~'));
        }
        assert!(path.ends_with("project/setup.cfg"));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();

        // Should be able to deserialize what we serialized
        let _: Config = toml::from_str(&toml_str).unwrap();
    }
}
