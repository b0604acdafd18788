//! In-memory document model
//!
//! A [`Document`] is an ordered set of uniquely named [`Section`]s, each an
//! ordered set of uniquely keyed [`OptionEntry`]s. Sections never refer to
//! one another.

use serde::Serialize;

use super::value::{RawValue, Shape, Value};
use crate::error::{ConfigError, ConfigResult};

/// A single `key = value` entry
#[derive(Debug, Clone, Serialize)]
pub struct OptionEntry {
    pub key: String,
    pub value: RawValue,
    /// Full-line comments directly above the key
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    /// 1-based line of the key, 0 when created programmatically
    #[serde(skip)]
    pub line: usize,
}

impl OptionEntry {
    pub fn new(key: impl Into<String>, value: RawValue) -> Self {
        Self {
            key: key.into(),
            value,
            comments: Vec::new(),
            line: 0,
        }
    }
}

// Line numbers are positional metadata; two entries with the same content
// are the same entry wherever they were read from.
impl PartialEq for OptionEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value && self.comments == other.comments
    }
}

impl Eq for OptionEntry {}

/// Named group of options owned by one consumer
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub name: String,
    options: Vec<OptionEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(skip)]
    pub line: usize,
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.options == other.options && self.comments == other.comments
    }
}

impl Eq for Section {}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            comments: Vec::new(),
            line: 0,
        }
    }

    /// Split a qualified name such as `tool:pytest` into `("tool", "pytest")`
    pub fn qualifier(&self) -> Option<(&str, &str)> {
        self.name.split_once(':')
    }

    pub fn options(&self) -> &[OptionEntry] {
        &self.options
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn entry(&self, key: &str) -> Option<&OptionEntry> {
        self.options.iter().find(|o| o.key == key)
    }

    /// Raw value of `key`, if present
    pub fn raw(&self, key: &str) -> Option<&RawValue> {
        self.entry(key).map(|o| &o.value)
    }

    /// Value of `key` coerced to `shape`
    ///
    /// Returns `Ok(None)` when the key is absent and
    /// [`ConfigError::TypeMismatch`] when the text cannot take the shape.
    pub fn option(&self, key: &str, shape: Shape) -> ConfigResult<Option<Value>> {
        let Some(raw) = self.raw(key) else {
            return Ok(None);
        };

        raw.coerce(shape)
            .map(Some)
            .ok_or_else(|| ConfigError::TypeMismatch {
                section: self.name.clone(),
                key: key.to_string(),
                expected: shape,
                raw: raw.text(),
            })
    }

    pub(crate) fn entry_mut(&mut self, key: &str) -> Option<&mut OptionEntry> {
        self.options.iter_mut().find(|o| o.key == key)
    }

    pub(crate) fn last_entry_mut(&mut self) -> Option<&mut OptionEntry> {
        self.options.last_mut()
    }

    pub(crate) fn push(&mut self, entry: OptionEntry) {
        self.options.push(entry);
    }

    /// Remove `key`, returning its entry
    pub(crate) fn remove(&mut self, key: &str) -> Option<OptionEntry> {
        let pos = self.options.iter().position(|o| o.key == key)?;
        Some(self.options.remove(pos))
    }
}

/// Fully parsed configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    sections: Vec<Section>,
    /// Full-line comments after the last option
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// Section by exact name; absence is not an error
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Shortcut for `section(name)?.option(key, shape)`
    pub fn option(&self, section: &str, key: &str, shape: Shape) -> ConfigResult<Option<Value>> {
        match self.section(section) {
            Some(s) => s.option(key, shape),
            None => Ok(None),
        }
    }

    /// Raw value of `section.key`, failing when either is missing
    pub fn show(&self, section: &str, key: &str) -> ConfigResult<&RawValue> {
        let s = self
            .section(section)
            .ok_or_else(|| ConfigError::SectionNotFound(section.to_string()))?;

        s.raw(key).ok_or_else(|| ConfigError::OptionNotFound {
            section: section.to_string(),
            key: key.to_string(),
        })
    }

    /// Set `section.key` to `value`, creating the section when needed
    ///
    /// Multi-line values are split on `\n`; `#` comments in `value` follow
    /// the same rules as in a document. Continuation lines starting with `;`
    /// are rejected, since they would read back as comments.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> ConfigResult<()> {
        if !super::parser::is_valid_section_name(section) {
            return Err(ConfigError::InvalidSection(section.to_string()));
        }
        if !super::parser::is_valid_key(key) {
            return Err(ConfigError::InvalidKey(key.to_string()));
        }

        let raw = RawValue::from_text(value);
        if let Some(line) = raw.lines().iter().skip(1).find(|l| l.text.starts_with(';')) {
            return Err(ConfigError::InvalidValue {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("continuation line '{}' would be read as a comment", line.text),
            });
        }

        let target = match self.sections.iter().position(|s| s.name == section) {
            Some(pos) => &mut self.sections[pos],
            None => {
                tracing::debug!("Creating section [{}]", section);
                self.sections.push(Section::new(section));
                let last = self.sections.len() - 1;
                &mut self.sections[last]
            }
        };

        match target.entry_mut(key) {
            Some(entry) => entry.value = raw,
            None => target.push(OptionEntry::new(key, raw)),
        }
        Ok(())
    }

    /// Remove an option, or a whole section when `key` is `None`
    ///
    /// A section left without options is removed too.
    pub fn unset(&mut self, section: &str, key: Option<&str>) -> ConfigResult<()> {
        let pos = self
            .sections
            .iter()
            .position(|s| s.name == section)
            .ok_or_else(|| ConfigError::SectionNotFound(section.to_string()))?;

        let Some(key) = key else {
            self.sections.remove(pos);
            return Ok(());
        };

        self.sections[pos]
            .remove(key)
            .ok_or_else(|| ConfigError::OptionNotFound {
                section: section.to_string(),
                key: key.to_string(),
            })?;

        if self.sections[pos].is_empty() {
            self.sections.remove(pos);
        }
        Ok(())
    }

    /// Split `section.key`, preferring the longest existing section name
    ///
    /// Section names may themselves contain dots (`coverage.run`); when no
    /// prefix names an existing section this falls back to
    /// [`split_option_path`].
    pub fn resolve_path<'p>(&self, path: &'p str) -> Option<(&'p str, &'p str)> {
        let mut dots: Vec<usize> = path.match_indices('.').map(|(i, _)| i).collect();
        dots.reverse();

        dots.into_iter()
            .map(|i| (&path[..i], &path[i + 1..]))
            .find(|(section, key)| !key.is_empty() && self.contains_section(section))
            .or_else(|| split_option_path(path))
    }

    pub(crate) fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub(crate) fn last_section_mut(&mut self) -> Option<&mut Section> {
        self.sections.last_mut()
    }
}

/// Split `section.key` on the first `.`
pub fn split_option_path(path: &str) -> Option<(&str, &str)> {
    let (section, key) = path.split_once('.')?;
    if section.is_empty() || key.is_empty() {
        return None;
    }
    Some((section, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.set("flake8", "max_line_length", "79").unwrap();
        doc.set("flake8", "ignore", "E203,\nE266,").unwrap();
        doc.set("tool:pytest", "addopts", "-ra").unwrap();
        doc
    }

    #[test]
    fn test_section_lookup() {
        let doc = sample();
        assert_eq!(doc.section_names(), vec!["flake8", "tool:pytest"]);
        assert!(doc.contains_section("flake8"));
        assert!(doc.section("nonexistent").is_none());
    }

    #[test]
    fn test_qualifier() {
        let doc = sample();
        assert_eq!(doc.section("tool:pytest").unwrap().qualifier(), Some(("tool", "pytest")));
        assert_eq!(doc.section("flake8").unwrap().qualifier(), None);
    }

    #[test]
    fn test_option_absent_is_none() {
        let doc = sample();
        assert_eq!(doc.option("flake8", "select", Shape::List).unwrap(), None);
        assert_eq!(doc.option("mypy", "files", Shape::Scalar).unwrap(), None);
    }

    #[test]
    fn test_option_type_mismatch() {
        let doc = sample();
        let err = doc.option("flake8", "ignore", Shape::Integer).unwrap_err();
        match err {
            ConfigError::TypeMismatch {
                section,
                key,
                expected,
                raw,
            } => {
                assert_eq!(section, "flake8");
                assert_eq!(key, "ignore");
                assert_eq!(expected, Shape::Integer);
                assert_eq!(raw, "E203,\nE266,");
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_show() {
        let doc = sample();
        assert_eq!(doc.show("flake8", "max_line_length").unwrap().text(), "79");
        assert!(matches!(
            doc.show("mypy", "files"),
            Err(ConfigError::SectionNotFound(_))
        ));
        assert!(matches!(
            doc.show("flake8", "select"),
            Err(ConfigError::OptionNotFound { .. })
        ));
    }

    #[test]
    fn test_set_replaces_existing() {
        let mut doc = sample();
        doc.set("flake8", "max_line_length", "99").unwrap();
        assert_eq!(
            doc.option("flake8", "max_line_length", Shape::Integer).unwrap(),
            Some(Value::Integer(99))
        );
        assert_eq!(doc.section("flake8").unwrap().len(), 2);
    }

    #[test]
    fn test_set_rejects_bad_key() {
        let mut doc = sample();
        assert!(matches!(
            doc.set("flake8", "max line", "1"),
            Err(ConfigError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_set_rejects_unwritable_section_names() {
        let mut doc = sample();
        for name in ["a]b", "[a", "x\ny", " padded", "padded ", ""] {
            assert!(
                matches!(doc.set(name, "k", "v"), Err(ConfigError::InvalidSection(_))),
                "accepted {:?}",
                name
            );
        }
        assert_eq!(doc.section_names(), vec!["flake8", "tool:pytest"]);
    }

    #[test]
    fn test_set_rejects_semicolon_continuation() {
        let mut doc = sample();
        let err = doc.set("flake8", "ignore", "E203,\n;E266,").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        // the previous value is left alone
        assert_eq!(doc.show("flake8", "ignore").unwrap().text(), "E203,\nE266,");

        // inline ';' is plain data
        doc.set("flake8", "select", ";E1").unwrap();
        assert_eq!(doc.show("flake8", "select").unwrap().text(), ";E1");
    }

    #[test]
    fn test_set_values_survive_reload() {
        let mut doc = sample();
        doc.set("flake8", "select", ";E1").unwrap();
        doc.set("flake8", "per-file-ignores", "\n__init__.py: F401  # re-exports\ntests/*: S101").unwrap();
        doc.set("coverage.run", "branch", "true").unwrap();
        doc.set("tool:pytest", "addopts", "-ra\n\n-q").unwrap();

        let reloaded: Document = doc.to_string().parse().unwrap();
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn test_unset_option_then_empty_section() {
        let mut doc = sample();
        doc.unset("tool:pytest", Some("addopts")).unwrap();
        assert!(!doc.contains_section("tool:pytest"));

        doc.unset("flake8", Some("ignore")).unwrap();
        assert!(doc.contains_section("flake8"));
    }

    #[test]
    fn test_unset_missing() {
        let mut doc = sample();
        assert!(matches!(
            doc.unset("mypy", None),
            Err(ConfigError::SectionNotFound(_))
        ));
        assert!(matches!(
            doc.unset("flake8", Some("select")),
            Err(ConfigError::OptionNotFound { .. })
        ));
    }

    #[test]
    fn test_unset_whole_section() {
        let mut doc = sample();
        doc.unset("flake8", None).unwrap();
        assert_eq!(doc.section_names(), vec!["tool:pytest"]);
    }

    #[test]
    fn test_split_option_path() {
        assert_eq!(split_option_path("flake8.max_line_length"), Some(("flake8", "max_line_length")));
        assert_eq!(split_option_path("tool:pytest.addopts"), Some(("tool:pytest", "addopts")));
        assert_eq!(split_option_path("flake8"), None);
        assert_eq!(split_option_path(".key"), None);
    }

    #[test]
    fn test_resolve_path_with_dotted_section() {
        let mut doc = sample();
        doc.set("coverage.run", "branch", "true").unwrap();

        assert_eq!(doc.resolve_path("coverage.run.branch"), Some(("coverage.run", "branch")));
        assert_eq!(doc.resolve_path("flake8.max_line_length"), Some(("flake8", "max_line_length")));
        // unknown sections fall back to the first dot
        assert_eq!(doc.resolve_path("mypy.files"), Some(("mypy", "files")));
        assert_eq!(doc.resolve_path("mypy"), None);
    }

    #[test]
    fn test_equality_ignores_line_numbers() {
        let mut a = OptionEntry::new("files", RawValue::inline("dvc"));
        let b = OptionEntry::new("files", RawValue::inline("dvc"));
        a.line = 42;
        assert_eq!(a, b);
    }
}
