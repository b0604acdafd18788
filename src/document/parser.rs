//! Line-oriented document parser
//!
//! # Grammar
//!
//! - `[name]` at column 0 opens a section
//! - `key = value` (or `key=value`) at column 0 adds an option
//! - An indented, non-blank line continues the most recent option
//! - `#` or `;` as the first non-blank character marks a comment line
//! - Blank lines are ignored, even inside a multi-line value
//!
//! Parsing is all-or-nothing: the first structural problem aborts the load.

use std::collections::HashMap;
use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{Document, OptionEntry, Section};
use super::value::{RawValue, ValueLine};
use crate::error::{ConfigResult, ParseError, ParseErrorKind};

/// Matches section headers: "[name]"
static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([^\[\]]*)\]\s*$").unwrap());

/// Matches well-formed option names
static KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").unwrap());

/// Whether `key` is a syntactically valid option name
pub fn is_valid_key(key: &str) -> bool {
    KEY_RE.is_match(key)
}

/// Whether `name` can be written as a `[name]` header and read back unchanged
pub fn is_valid_section_name(name: &str) -> bool {
    !name.is_empty()
        && name.trim() == name
        && !name.contains(['[', ']', '\r', '\n'])
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with('#') || trimmed.starts_with(';')
}

/// Parse a document from a buffered reader
pub fn parse_reader<R: BufRead>(mut reader: R) -> ConfigResult<Document> {
    let mut parser = Parser::default();
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let line = std::str::from_utf8(&buf)
            .map_err(|_| ParseError::new(line_no, ParseErrorKind::InvalidUtf8))?;
        parser.feed(line_no, line.strip_suffix('\n').unwrap_or(line))?;
    }

    let doc = parser.finish();
    tracing::debug!("Parsed {} section(s)", doc.sections().len());
    Ok(doc)
}

/// Incremental parser state, one line at a time
#[derive(Default)]
struct Parser {
    doc: Document,
    /// Section name -> line of its header
    seen_sections: HashMap<String, usize>,
    /// Key -> line, for the current section only
    seen_keys: HashMap<String, usize>,
    /// Column-0 comments not yet attached to anything
    pending_comments: Vec<String>,
    /// Whether an indented line may continue the last option
    in_value: bool,
}

impl Parser {
    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Ok(());
        }

        if line.starts_with(char::is_whitespace) {
            return self.continuation(line_no, trimmed);
        }

        if is_comment(trimmed) {
            self.pending_comments.push(line.trim_end().to_string());
            return Ok(());
        }

        if line.starts_with('[') {
            return self.header(line_no, line);
        }

        self.option(line_no, line)
    }

    fn continuation(&mut self, line_no: usize, trimmed: &str) -> Result<(), ParseError> {
        if !self.in_value {
            if is_comment(trimmed) {
                self.pending_comments.push(trimmed.to_string());
                return Ok(());
            }
            return Err(ParseError::new(line_no, ParseErrorKind::OrphanContinuation));
        }

        let pending = std::mem::take(&mut self.pending_comments);
        let entry = self
            .doc
            .last_section_mut()
            .and_then(Section::last_entry_mut)
            .ok_or_else(|| ParseError::new(line_no, ParseErrorKind::OrphanContinuation))?;

        for comment in pending {
            entry.value.push(ValueLine::comment(comment));
        }

        if trimmed.starts_with(';') {
            entry.value.push(ValueLine::comment(trimmed));
        } else {
            entry.value.push(ValueLine::parse(trimmed));
        }
        Ok(())
    }

    fn header(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        let caps = HEADER_RE.captures(line).ok_or_else(|| {
            ParseError::new(
                line_no,
                ParseErrorKind::MalformedHeader(line.trim_end().to_string()),
            )
        })?;

        let name = caps[1].trim();
        if !is_valid_section_name(name) {
            return Err(ParseError::new(
                line_no,
                ParseErrorKind::MalformedHeader(line.trim_end().to_string()),
            ));
        }

        if let Some(&first_line) = self.seen_sections.get(name) {
            return Err(ParseError::new(
                line_no,
                ParseErrorKind::DuplicateSection {
                    name: name.to_string(),
                    first_line,
                },
            ));
        }

        self.seen_sections.insert(name.to_string(), line_no);
        self.seen_keys.clear();
        self.in_value = false;

        let mut section = Section::new(name);
        section.line = line_no;
        section.comments = std::mem::take(&mut self.pending_comments);
        self.doc.push_section(section);
        Ok(())
    }

    fn option(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        let Some((key, fragment)) = line.split_once('=') else {
            return Err(ParseError::new(
                line_no,
                ParseErrorKind::MalformedOption(line.trim_end().to_string()),
            ));
        };
        let key = key.trim();

        let Some(section) = self.doc.last_section_mut() else {
            return Err(ParseError::new(
                line_no,
                ParseErrorKind::OrphanOption(key.to_string()),
            ));
        };

        if !is_valid_key(key) {
            return Err(ParseError::new(
                line_no,
                ParseErrorKind::InvalidKey(key.to_string()),
            ));
        }

        if let Some(&first_line) = self.seen_keys.get(key) {
            return Err(ParseError::new(
                line_no,
                ParseErrorKind::DuplicateOption {
                    section: section.name.clone(),
                    key: key.to_string(),
                    first_line,
                },
            ));
        }

        let mut entry = OptionEntry::new(key, RawValue::inline(fragment));
        entry.line = line_no;
        entry.comments = std::mem::take(&mut self.pending_comments);
        section.push(entry);

        self.seen_keys.insert(key.to_string(), line_no);
        self.in_value = true;
        Ok(())
    }

    fn finish(mut self) -> Document {
        self.doc.trailing_comments = std::mem::take(&mut self.pending_comments);
        self.doc
    }
}
