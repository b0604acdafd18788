//! Raw option values and typed coercion
//!
//! Every value is kept as untyped text lines. A caller asks for a [`Shape`]
//! and gets a [`Value`] back, or nothing if the text cannot take that shape.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Value shape a consumer can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Single-line string
    Scalar,
    /// `true/false/yes/no/on/off/1/0`
    Boolean,
    /// Signed 64-bit integer
    Integer,
    /// Comma and/or newline separated items
    List,
    /// All data lines joined with `\n`
    Text,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Scalar => "scalar",
            Shape::Boolean => "boolean",
            Shape::Integer => "integer",
            Shape::List => "list",
            Shape::Text => "text",
        };
        f.write_str(name)
    }
}

/// A value coerced to a shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(String),
    Boolean(bool),
    Integer(i64),
    List(Vec<String>),
    Text(String),
}

impl Value {
    pub fn shape(&self) -> Shape {
        match self {
            Value::Scalar(_) => Shape::Scalar,
            Value::Boolean(_) => Shape::Boolean,
            Value::Integer(_) => Shape::Integer,
            Value::List(_) => Shape::List,
            Value::Text(_) => Shape::Text,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) | Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) | Value::Text(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// One physical line of a value: data text plus an optional comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueLine {
    /// Comment-stripped, trimmed data
    pub text: String,
    /// Comment including its marker, e.g. `# Whitespace before ':'`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ValueLine {
    /// Split a trimmed value fragment into data and inline comment.
    ///
    /// `#` starts a comment when it opens the fragment or follows whitespace,
    /// and is not inside a double-quoted span.
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.trim();
        let mut in_quotes = false;
        let mut prev: Option<char> = None;

        for (i, c) in fragment.char_indices() {
            match c {
                '"' => in_quotes = !in_quotes,
                '#' if !in_quotes && prev.map_or(true, char::is_whitespace) => {
                    return Self {
                        text: fragment[..i].trim_end().to_string(),
                        comment: Some(fragment[i..].trim_end().to_string()),
                    };
                }
                _ => {}
            }
            prev = Some(c);
        }

        Self {
            text: fragment.to_string(),
            comment: None,
        }
    }

    /// Comment-only line (`;` or `#` as first character)
    pub fn comment(comment: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            comment: Some(comment.into()),
        }
    }

    pub fn has_data(&self) -> bool {
        !self.text.is_empty()
    }

    /// Render as it would appear in a document
    pub fn render(&self) -> String {
        match (&self.text, &self.comment) {
            (text, Some(comment)) if !text.is_empty() => format!("{}  {}", text, comment),
            (_, Some(comment)) => comment.clone(),
            (text, None) => text.clone(),
        }
    }
}

/// Untyped value of an option: the inline part followed by continuation lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawValue {
    lines: Vec<ValueLine>,
}

impl RawValue {
    /// Build from the text after `=`
    pub fn inline(fragment: &str) -> Self {
        Self {
            lines: vec![ValueLine::parse(fragment)],
        }
    }

    /// Build from free text, one value line per `\n`
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<ValueLine> = text
            .split('\n')
            .map(ValueLine::parse)
            .enumerate()
            .filter(|(i, l)| *i == 0 || l.has_data() || l.comment.is_some())
            .map(|(_, l)| l)
            .collect();
        if lines.len() > 1 && lines[0].has_data() {
            // keep multi-line values in block form, like hand-written lists
            lines.insert(0, ValueLine::parse(""));
        }
        Self { lines }
    }

    pub(crate) fn push(&mut self, line: ValueLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[ValueLine] {
        &self.lines
    }

    /// Non-empty data lines, comments removed
    pub fn data_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|l| l.has_data())
            .map(|l| l.text.as_str())
    }

    /// Data lines joined with `\n`
    pub fn text(&self) -> String {
        self.data_lines().collect::<Vec<_>>().join("\n")
    }

    pub fn is_multiline(&self) -> bool {
        self.data_lines().count() > 1
    }

    /// Coerce to `shape`, `None` when the text cannot take it
    pub fn coerce(&self, shape: Shape) -> Option<Value> {
        match shape {
            Shape::Scalar => self.scalar().map(|s| Value::Scalar(s.to_string())),
            Shape::Boolean => self.scalar().and_then(parse_bool).map(Value::Boolean),
            Shape::Integer => self
                .scalar()
                .and_then(|s| s.parse::<i64>().ok())
                .map(Value::Integer),
            Shape::List => Some(Value::List(self.items())),
            Shape::Text => Some(Value::Text(self.text())),
        }
    }

    fn scalar(&self) -> Option<&str> {
        let mut data = self.data_lines();
        match (data.next(), data.next()) {
            (None, _) => Some(""),
            (Some(only), None) => Some(only),
            (Some(_), Some(_)) => None,
        }
    }

    fn items(&self) -> Vec<String> {
        self.data_lines()
            .flat_map(|line| line.split(','))
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
