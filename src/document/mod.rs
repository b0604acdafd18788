//! Configuration document: parsing, lookup and serialization
//!
//! A document is a set of independently owned sections. Each consumer tool
//! reads only its own section and interprets its options with its own
//! schema; this module only stores raw text and coerces on request.
//!
//! Loading either yields a complete [`Document`] or fails with the first
//! [`ParseError`](crate::error::ParseError); there is no partial result.

pub mod model;
pub mod parser;
pub mod value;
mod writer;

use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

pub use model::{split_option_path, Document, OptionEntry, Section};
pub use value::{RawValue, Shape, Value, ValueLine};

use crate::error::{ConfigError, ConfigResult};

impl Document {
    /// Parse a document from a text stream
    pub fn from_reader<R: BufRead>(reader: R) -> ConfigResult<Self> {
        parser::parse_reader(reader)
    }

    /// Parse a document held in memory
    pub fn parse_str(source: &str) -> ConfigResult<Self> {
        parser::parse_reader(source.as_bytes())
    }

    /// Read and parse a document from disk
    pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading document from: {}", path.display());
        let file = fs::File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Serialize into any `fmt::Write`
    pub fn write_to(&self, out: &mut impl fmt::Write) -> fmt::Result {
        writer::write_document(self, out)
    }

    /// Write the canonical form back to disk
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        tracing::debug!("Saving document to: {}", path.display());
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

impl FromStr for Document {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}
