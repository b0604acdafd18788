//! Consumer schemas
//!
//! A schema is the typed view one consumer tool has of its own section. The
//! document never consults schemas itself; callers pass them in.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::document::{Document, Shape, Value};
use crate::error::{ConfigError, ConfigResult};

/// Declared option shapes for one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerSchema {
    pub section: String,
    pub options: BTreeMap<String, Shape>,
}

/// Options of a section coerced through a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypedSection {
    pub section: String,
    pub values: BTreeMap<String, Value>,
}

impl TypedSection {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

impl ConsumerSchema {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            options: BTreeMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, shape: Shape) -> Self {
        self.options.insert(key.into(), shape);
        self
    }

    pub fn shape_of(&self, key: &str) -> Option<Shape> {
        self.options.get(key).copied()
    }

    /// Coerce every declared option present in the section
    ///
    /// Returns `Ok(None)` when the document has no such section; undeclared
    /// keys are skipped.
    pub fn typed(&self, doc: &Document) -> ConfigResult<Option<TypedSection>> {
        let Some(section) = doc.section(&self.section) else {
            return Ok(None);
        };

        let mut values = BTreeMap::new();
        for (key, shape) in &self.options {
            if let Some(value) = section.option(key, *shape)? {
                values.insert(key.clone(), value);
            }
        }

        Ok(Some(TypedSection {
            section: self.section.clone(),
            values,
        }))
    }

    /// All type mismatches in the section, in key order
    pub fn validate(&self, doc: &Document) -> Vec<ConfigError> {
        let Some(section) = doc.section(&self.section) else {
            return Vec::new();
        };

        self.options
            .iter()
            .filter_map(|(key, shape)| section.option(key, *shape).err())
            .collect()
    }
}

/// Schemas for the usual `setup.cfg` consumers
pub fn builtin_schemas() -> Vec<ConsumerSchema> {
    vec![
        ConsumerSchema::new("metadata")
            .with_option("name", Shape::Scalar)
            .with_option("version", Shape::Scalar)
            .with_option("description-file", Shape::Scalar)
            .with_option("license", Shape::Scalar),
        ConsumerSchema::new("flake8")
            .with_option("ignore", Shape::List)
            .with_option("extend-ignore", Shape::List)
            .with_option("select", Shape::List)
            .with_option("exclude", Shape::List)
            .with_option("max_line_length", Shape::Integer)
            .with_option("max-line-length", Shape::Integer)
            .with_option("max-complexity", Shape::Integer)
            .with_option("show_source", Shape::Boolean)
            .with_option("count", Shape::Boolean),
        ConsumerSchema::new("isort")
            .with_option("include_trailing_comma", Shape::Boolean)
            .with_option("known_first_party", Shape::List)
            .with_option("known_third_party", Shape::List)
            .with_option("line_length", Shape::Integer)
            .with_option("force_grid_wrap", Shape::Integer)
            .with_option("use_parentheses", Shape::Boolean)
            .with_option("multi_line_output", Shape::Integer),
        ConsumerSchema::new("tool:pytest")
            .with_option("addopts", Shape::Scalar)
            .with_option("testpaths", Shape::List)
            .with_option("markers", Shape::Text)
            .with_option("timeout", Shape::Integer),
        ConsumerSchema::new("mypy")
            .with_option("files", Shape::List)
            .with_option("python_version", Shape::Scalar)
            .with_option("ignore_missing_imports", Shape::Boolean)
            .with_option("check_untyped_defs", Shape::Boolean)
            .with_option("warn_unused_configs", Shape::Boolean),
    ]
}

/// Built-in schemas with user-declared shapes layered on top
///
/// A user entry for an existing key replaces its shape; new sections become
/// new schemas.
pub fn resolve_schemas(overrides: &HashMap<String, BTreeMap<String, Shape>>) -> Vec<ConsumerSchema> {
    let mut schemas = builtin_schemas();

    let mut names: Vec<&String> = overrides.keys().collect();
    names.sort();

    for name in names {
        let options = &overrides[name];
        match schemas.iter_mut().find(|s| &s.section == name) {
            Some(schema) => schema.options.extend(options.iter().map(|(k, v)| (k.clone(), *v))),
            None => schemas.push(ConsumerSchema {
                section: name.clone(),
                options: options.clone(),
            }),
        }
    }

    schemas
}

/// Find the schema owning `section`
pub fn find_schema<'a>(schemas: &'a [ConsumerSchema], section: &str) -> Option<&'a ConsumerSchema> {
    schemas.iter().find(|s| s.section == section)
}
