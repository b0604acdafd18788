//! Error types for gatecfg
//!
//! Provides structured error types with suggestions for common issues.

use serde::Serialize;
use thiserror::Error;

use crate::document::Shape;

/// Result type for document operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Structural problem found while parsing a document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number of the offending line
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

/// What went wrong on a line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// `[` line that is not a well-formed `[name]`
    #[error("malformed section header '{0}'")]
    MalformedHeader(String),

    /// Section name seen twice
    #[error("duplicate section '{name}' (first defined on line {first_line})")]
    DuplicateSection { name: String, first_line: usize },

    /// Key seen twice within one section
    #[error("duplicate option '{key}' in section '{section}' (first defined on line {first_line})")]
    DuplicateOption {
        section: String,
        key: String,
        first_line: usize,
    },

    /// Key-value line before any section header
    #[error("option '{0}' appears outside of any section")]
    OrphanOption(String),

    /// Indented line with no key to continue
    #[error("continuation line without a preceding option")]
    OrphanContinuation,

    /// Column-0 line that is neither a header, a comment nor `key = value`
    #[error("expected 'key = value', found '{0}'")]
    MalformedOption(String),

    /// Key with characters outside `[A-Za-z0-9_.-]`
    #[error("invalid option name '{0}'")]
    InvalidKey(String),

    /// Bytes that do not decode as UTF-8
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// Main error type for document operations
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Document failed to parse
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Raw text cannot be coerced to the requested shape
    #[error("Type mismatch: {section}.{key} is not a valid {expected}: {raw:?}")]
    TypeMismatch {
        section: String,
        key: String,
        expected: Shape,
        raw: String,
    },

    /// Section does not exist
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    /// Option does not exist in an existing section
    #[error("Option not found: {section}.{key}")]
    OptionNotFound { section: String, key: String },

    /// Option name rejected when editing
    #[error("Invalid option name: {0}")]
    InvalidKey(String),

    /// Section name that cannot be written as a `[name]` header
    #[error("Invalid section name: {0:?}")]
    InvalidSection(String),

    /// Value that would not read back as written
    #[error("Invalid value for {section}.{key}: {reason}")]
    InvalidValue {
        section: String,
        key: String,
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Line number for parse errors
    pub fn line(&self) -> Option<usize> {
        match self {
            ConfigError::Parse(e) => Some(e.line),
            _ => None,
        }
    }
}

/// Serializable error info for JSON output
#[derive(Debug, Serialize, Clone)]
pub struct ErrorInfo {
    pub message: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl From<&ConfigError> for ErrorInfo {
    fn from(err: &ConfigError) -> Self {
        let (error_type, suggestion) = match err {
            ConfigError::Parse(e) => ("parse_error", suggest_fix(&e.kind)),
            ConfigError::TypeMismatch { expected, .. } => (
                "type_mismatch",
                Some(format!("Write the value as a {} or fix the schema", expected)),
            ),
            ConfigError::SectionNotFound(name) => (
                "section_not_found",
                Some(format!("Add a [{}] section to the document", name)),
            ),
            ConfigError::OptionNotFound { .. } => (
                "option_not_found",
                Some("Run 'gatecfg show <section>' to list available options".to_string()),
            ),
            ConfigError::InvalidKey(_) => (
                "invalid_key",
                Some("Option names may only contain letters, digits, '_', '.' and '-'".to_string()),
            ),
            ConfigError::InvalidSection(_) => (
                "invalid_section",
                Some("Section names must be non-empty, without surrounding spaces, brackets or line breaks".to_string()),
            ),
            ConfigError::InvalidValue { .. } => (
                "invalid_value",
                Some("Continuation lines may not start with ';'; quote or reorder the item".to_string()),
            ),
            ConfigError::Io(_) => ("io_error", None),
        };

        ErrorInfo {
            message: err.to_string(),
            error_type: error_type.to_string(),
            line: err.line(),
            suggestion,
        }
    }
}

/// Suggest fixes for common parse errors
pub fn suggest_fix(kind: &ParseErrorKind) -> Option<String> {
    match kind {
        ParseErrorKind::MalformedHeader(_) => {
            Some("Section headers must look like [name] on a line of their own".to_string())
        }
        ParseErrorKind::DuplicateSection { name, .. } => Some(format!(
            "Merge both [{}] sections into one; consumers would only see one of them",
            name
        )),
        ParseErrorKind::DuplicateOption { key, .. } => {
            Some(format!("Remove one of the '{}' entries", key))
        }
        ParseErrorKind::OrphanOption(_) => {
            Some("Add a [section] header above the first option".to_string())
        }
        ParseErrorKind::OrphanContinuation => {
            Some("Indented lines continue the previous option; remove the indentation".to_string())
        }
        ParseErrorKind::MalformedOption(_) => {
            Some("Indent the line to continue the previous value, or add '='".to_string())
        }
        ParseErrorKind::InvalidKey(_) => None,
        ParseErrorKind::InvalidUtf8 => Some("Save the file with UTF-8 encoding".to_string()),
    }
}
