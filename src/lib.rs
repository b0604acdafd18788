//! gatecfg - strict reader for multi-tool `setup.cfg` style configuration
//!
//! One file carries the settings of several independent quality-gate tools:
//! - **Packaging** - `[metadata]`
//! - **Linting** - `[flake8]`
//! - **Import ordering** - `[isort]`
//! - **Testing** - `[tool:pytest]`
//! - **Type checking** - `[mypy]`
//!
//! ## Features
//!
//! - All-or-nothing parsing with line-numbered errors
//! - Raw text values, typed only on request (scalar, boolean, integer, list, text)
//! - Inline `#` comments preserved for rewriting but never part of a value
//! - Per-consumer schemas, built in and user supplied
//! - Canonical, round-trippable serialization
//!
//! ## Example
//!
//! ```
//! use gatecfg::document::{Document, Shape, Value};
//!
//! let doc = Document::parse_str("[flake8]\nmax_line_length=79\n").unwrap();
//! let flake8 = doc.section("flake8").unwrap();
//! assert_eq!(
//!     flake8.option("max_line_length", Shape::Integer).unwrap(),
//!     Some(Value::Integer(79))
//! );
//! assert!(doc.section("nonexistent").is_none());
//! ```

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod schema;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use document::{Document, RawValue, Section, Shape, Value};
pub use error::{ConfigError, ErrorInfo, ParseError, ParseErrorKind};
pub use schema::{builtin_schemas, ConsumerSchema, TypedSection};
