//! CLI module for gatecfg
//!
//! Provides command-line interface with the following subcommands:
//! - `sections` - List section names
//! - `show` - Show one section
//! - `get` - Read one option as a typed value
//! - `check` - Parse and validate against consumer schemas
//! - `set` / `unset` - Edit the document
//! - `fmt` - Rewrite in canonical form

pub mod commands;

pub use commands::{Cli, Commands};
