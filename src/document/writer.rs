//! Canonical serialization
//!
//! Output re-parses to an equal [`Document`]: comments are re-emitted,
//! single-line values stay on the key line and multi-line values are
//! written as an indented block.

use std::fmt::{self, Write};

use super::model::{Document, OptionEntry, Section};

const INDENT: &str = "    ";

pub(crate) fn write_document(doc: &Document, out: &mut impl Write) -> fmt::Result {
    for (i, section) in doc.sections().iter().enumerate() {
        if i > 0 {
            out.write_char('\n')?;
        }
        write_section(section, out)?;
    }

    if !doc.trailing_comments.is_empty() {
        if !doc.sections().is_empty() {
            out.write_char('\n')?;
        }
        for comment in &doc.trailing_comments {
            writeln!(out, "{}", comment)?;
        }
    }
    Ok(())
}

fn write_section(section: &Section, out: &mut impl Write) -> fmt::Result {
    for comment in &section.comments {
        writeln!(out, "{}", comment)?;
    }
    writeln!(out, "[{}]", section.name)?;

    for entry in section.options() {
        write_entry(entry, out)?;
    }
    Ok(())
}

fn write_entry(entry: &OptionEntry, out: &mut impl Write) -> fmt::Result {
    for comment in &entry.comments {
        writeln!(out, "{}", comment)?;
    }

    let mut lines = entry.value.lines().iter();
    let first = lines.next().map(|l| l.render()).unwrap_or_default();
    if first.is_empty() {
        writeln!(out, "{} =", entry.key)?;
    } else {
        writeln!(out, "{} = {}", entry.key, first)?;
    }

    for line in lines {
        let rendered = line.render();
        if !rendered.is_empty() {
            writeln!(out, "{}{}", INDENT, rendered)?;
        }
    }
    Ok(())
}
