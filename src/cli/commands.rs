//! CLI command definitions using clap
//!
//! Defines all CLI subcommands and their arguments.

use clap::{Parser, Subcommand};

use crate::config::OutputFormat;
use crate::document::Shape;

/// Inspect and edit a multi-tool `setup.cfg` style configuration file.
///
/// Each section belongs to one consumer tool (flake8, isort, pytest, mypy,
/// packaging). gatecfg parses the whole file strictly and reads or edits one
/// section at a time.
#[derive(Parser, Debug)]
#[command(name = "gatecfg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (overrides default XDG paths)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Document to operate on (defaults to document.path, usually setup.cfg)
    #[arg(short, long, global = true)]
    pub document: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List section names
    Sections(FormatArgs),

    /// Show the options of one section
    Show(ShowArgs),

    /// Read one option, coerced to a shape
    Get(GetArgs),

    /// Parse the document and validate it against consumer schemas
    Check(FormatArgs),

    /// Set an option and save the document
    Set(SetArgs),

    /// Remove an option or a whole section and save the document
    Unset(UnsetArgs),

    /// Rewrite the document in canonical form
    Fmt(FmtArgs),
}

/// Output format selection shared by read-only commands
#[derive(Parser, Debug)]
pub struct FormatArgs {
    /// Output format (defaults to output.format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Arguments for the `show` subcommand
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Section name, e.g. flake8 or tool:pytest
    pub section: String,

    #[command(flatten)]
    pub output: FormatArgs,
}

/// Arguments for the `get` subcommand
#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Option path in SECTION.KEY form, e.g. flake8.max_line_length
    pub name: String,

    /// Requested shape (defaults to the consumer schema, else scalar)
    #[arg(short, long, value_enum)]
    pub shape: Option<Shape>,

    #[command(flatten)]
    pub output: FormatArgs,
}

/// Arguments for the `set` subcommand
#[derive(Parser, Debug)]
pub struct SetArgs {
    /// Option path in SECTION.KEY form
    pub name: String,

    /// New value; use newlines for multi-line lists
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

/// Arguments for the `unset` subcommand
#[derive(Parser, Debug)]
pub struct UnsetArgs {
    /// SECTION.KEY to remove one option, or SECTION to remove the section
    pub name: String,
}

/// Arguments for the `fmt` subcommand
#[derive(Parser, Debug)]
pub struct FmtArgs {
    /// Report whether the file would change instead of rewriting it
    #[arg(long)]
    pub check: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_sections() {
        let cli = Cli::parse_from(["gatecfg", "sections"]);
        if let Commands::Sections(args) = cli.command {
            assert!(args.format.is_none());
        } else {
            panic!("Expected Sections command");
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_show_json() {
        let cli = Cli::parse_from(["gatecfg", "show", "tool:pytest", "-f", "json"]);
        if let Commands::Show(args) = cli.command {
            assert_eq!(args.section, "tool:pytest");
            assert_eq!(args.output.format, Some(OutputFormat::Json));
        } else {
            panic!("Expected Show command");
        }
    }

    #[test]
    fn test_cli_parse_get_with_shape() {
        let cli = Cli::parse_from(["gatecfg", "get", "flake8.max_line_length", "--shape", "integer"]);
        if let Commands::Get(args) = cli.command {
            assert_eq!(args.name, "flake8.max_line_length");
            assert_eq!(args.shape, Some(Shape::Integer));
        } else {
            panic!("Expected Get command");
        }
    }

    #[test]
    fn test_cli_parse_set_hyphen_value() {
        let cli = Cli::parse_from(["gatecfg", "set", "tool:pytest.addopts", "-ra"]);
        if let Commands::Set(args) = cli.command {
            assert_eq!(args.name, "tool:pytest.addopts");
            assert_eq!(args.value, "-ra");
        } else {
            panic!("Expected Set command");
        }
    }

    #[test]
    fn test_cli_parse_unset() {
        let cli = Cli::parse_from(["gatecfg", "unset", "isort"]);
        assert!(matches!(cli.command, Commands::Unset(ref a) if a.name == "isort"));
    }

    #[test]
    fn test_cli_parse_fmt_check() {
        let cli = Cli::parse_from(["gatecfg", "fmt", "--check"]);
        assert!(matches!(cli.command, Commands::Fmt(FmtArgs { check: true })));
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from([
            "gatecfg",
            "-v",
            "-c",
            "/path/to/config.toml",
            "check",
            "-d",
            "tox.ini",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some("/path/to/config.toml".to_string()));
        assert_eq!(cli.document, Some("tox.ini".to_string()));
    }

    #[test]
    fn test_cli_rejects_unknown_shape() {
        assert!(Cli::try_parse_from(["gatecfg", "get", "a.b", "--shape", "float"]).is_err());
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }
}
