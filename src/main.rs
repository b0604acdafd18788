//! gatecfg CLI entry point
//!
//! Usage:
//!   gatecfg sections               List section names
//!   gatecfg show <section>         Show the options of a section
//!   gatecfg get <section.key>      Read one option as a typed value
//!   gatecfg check                  Parse and validate against consumer schemas
//!   gatecfg set <section.key> <v>  Set an option
//!   gatecfg unset <section[.key]>  Remove an option or section
//!   gatecfg fmt                    Rewrite in canonical form

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use gatecfg::cli::{
    commands::{FmtArgs, GetArgs, SetArgs, ShowArgs, UnsetArgs},
    Cli, Commands,
};
use gatecfg::config::{load_config, Config, OutputFormat};
use gatecfg::document::{Document, Shape, Value};
use gatecfg::error::{ConfigError, ErrorInfo};
use gatecfg::schema::{find_schema, ConsumerSchema};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "gatecfg=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let path = cli
        .document
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.document_path());

    if cli.verbose {
        eprintln!("{}: {}", "document".cyan(), path.display());
    }

    match cli.command {
        Commands::Sections(args) => list_sections(&path, format_or(args.format, &config)),
        Commands::Show(args) => {
            let format = format_or(args.output.format, &config);
            show_section(&path, &args, format)
        }
        Commands::Get(args) => {
            let format = format_or(args.output.format, &config);
            get_option(&path, &args, &config.schemas(), format)
        }
        Commands::Check(args) => {
            check_document(&path, &config.schemas(), format_or(args.format, &config))
        }
        Commands::Set(args) => set_option(&path, &args),
        Commands::Unset(args) => unset_option(&path, &args),
        Commands::Fmt(args) => format_document(&path, &args),
    }
}

fn format_or(format: Option<OutputFormat>, config: &Config) -> OutputFormat {
    format.unwrap_or(config.output.format)
}

fn load_document(path: &Path) -> Result<Document> {
    Document::load_file(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn save_document(doc: &Document, path: &Path) -> Result<()> {
    doc.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Error for a lookup that found nothing
fn missing(doc: &Document, section: &str, key: &str) -> ConfigError {
    if doc.contains_section(section) {
        ConfigError::OptionNotFound {
            section: section.to_string(),
            key: key.to_string(),
        }
    } else {
        ConfigError::SectionNotFound(section.to_string())
    }
}

/// List section names
fn list_sections(path: &Path, format: OutputFormat) -> Result<()> {
    let doc = load_document(path)?;

    match format {
        OutputFormat::Json => {
            let sections: Vec<_> = doc
                .sections()
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "name": s.name,
                        "options": s.len(),
                        "line": s.line,
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "path": path.display().to_string(),
                "sections": sections,
            }))?;
            println!("{}", json);
        }
        OutputFormat::Plain => {
            for name in doc.section_names() {
                println!("{}", name);
            }
        }
        OutputFormat::Table => {
            println!("{}: {}", "Document".cyan(), path.display());
            println!();
            if doc.sections().is_empty() {
                println!("No sections found.");
            } else {
                let width = doc.sections().iter().map(|s| s.name.len()).max().unwrap_or(10);
                for section in doc.sections() {
                    println!(
                        "  {:width$}  {} option(s)",
                        section.name.green(),
                        section.len(),
                        width = width
                    );
                }
            }
        }
    }

    Ok(())
}

/// Show the options of one section
fn show_section(path: &Path, args: &ShowArgs, format: OutputFormat) -> Result<()> {
    let doc = load_document(path)?;
    let section = doc
        .section(&args.section)
        .ok_or_else(|| ConfigError::SectionNotFound(args.section.clone()))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(section)?);
        }
        OutputFormat::Plain => {
            for entry in section.options() {
                let data: Vec<&str> = entry.value.data_lines().collect();
                println!("{} = {}", entry.key, data.join(" "));
            }
        }
        OutputFormat::Table => {
            println!("{}", format!("[{}]", section.name).cyan());
            let width = section.keys().map(str::len).max().unwrap_or(10);
            for entry in section.options() {
                let mut lines = entry.value.lines().iter();
                let first = lines.next().map(|l| l.render()).unwrap_or_default();
                println!("  {:width$}  {}", entry.key.green(), first, width = width);
                for line in lines {
                    let text = if line.has_data() {
                        line.render().normal()
                    } else {
                        line.render().dimmed()
                    };
                    println!("  {:width$}    {}", "", text, width = width);
                }
            }
        }
    }

    Ok(())
}

/// Read one option coerced to a shape
fn get_option(
    path: &Path,
    args: &GetArgs,
    schemas: &[ConsumerSchema],
    format: OutputFormat,
) -> Result<()> {
    let doc = load_document(path)?;
    let (section, key) = doc
        .resolve_path(&args.name)
        .with_context(|| format!("Invalid option name '{}': expected SECTION.KEY", args.name))?;

    let shape = args
        .shape
        .or_else(|| find_schema(schemas, section).and_then(|s| s.shape_of(key)))
        .unwrap_or(Shape::Scalar);

    let value = doc
        .option(section, key, shape)?
        .ok_or_else(|| missing(&doc, section, key))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "section": section,
                "key": key,
                "shape": shape,
                "value": value,
            }))?;
            println!("{}", json);
        }
        OutputFormat::Plain => match &value {
            Value::List(items) => {
                for item in items {
                    println!("{}", item);
                }
            }
            other => println!("{}", other),
        },
        OutputFormat::Table => {
            println!(
                "{}.{} ({}): {}",
                section.cyan(),
                key.cyan(),
                shape.to_string().dimmed(),
                value
            );
        }
    }

    Ok(())
}

/// Parse the document and validate every consumer schema
fn check_document(path: &Path, schemas: &[ConsumerSchema], format: OutputFormat) -> Result<()> {
    let (sections, errors) = match Document::load_file(path) {
        Ok(doc) => {
            let errors: Vec<ConfigError> = schemas.iter().flat_map(|s| s.validate(&doc)).collect();
            (doc.sections().len(), errors)
        }
        Err(e) => (0, vec![e]),
    };
    let infos: Vec<ErrorInfo> = errors.iter().map(ErrorInfo::from).collect();

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "path": path.display().to_string(),
                "valid": infos.is_empty(),
                "sections": sections,
                "errors": infos,
            }))?;
            println!("{}", json);
        }
        OutputFormat::Plain => {
            for info in &infos {
                println!("{}", info.message);
            }
        }
        OutputFormat::Table => {
            println!("{}: {}", "Document".cyan(), path.display());
            if infos.is_empty() {
                println!("{}: {} section(s) checked", "ok".green(), sections);
            } else {
                println!();
                println!("{}:", "Errors".red());
                for info in &infos {
                    println!("  - {}", info.message);
                    if let Some(ref suggestion) = info.suggestion {
                        println!("    {}", suggestion.dimmed());
                    }
                }
            }
        }
    }

    if !infos.is_empty() {
        anyhow::bail!("{} problem(s) found in {}", infos.len(), path.display());
    }

    Ok(())
}

/// Set an option and save
fn set_option(path: &Path, args: &SetArgs) -> Result<()> {
    // editing may start from an empty file
    let mut doc = if path.exists() {
        load_document(path)?
    } else {
        Document::new()
    };

    let (section, key) = doc
        .resolve_path(&args.name)
        .with_context(|| format!("Invalid option name '{}': expected SECTION.KEY", args.name))?;

    doc.set(section, key, &args.value)?;
    save_document(&doc, path)?;

    println!("{}: {}.{}", "Set".green(), section, key);
    Ok(())
}

/// Remove an option or a section and save
fn unset_option(path: &Path, args: &UnsetArgs) -> Result<()> {
    let mut doc = load_document(path)?;

    match doc.resolve_path(&args.name) {
        Some((section, key)) if doc.contains_section(section) => {
            doc.unset(section, Some(key))?;
        }
        _ => doc.unset(&args.name, None)?,
    }
    save_document(&doc, path)?;

    println!("{}: {}", "Removed".green(), args.name);
    Ok(())
}

/// Rewrite the document canonically
fn format_document(path: &Path, args: &FmtArgs) -> Result<()> {
    let doc = load_document(path)?;
    let original = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let canonical = doc.to_string();

    if original == canonical {
        println!("{}: {}", "Already formatted".green(), path.display());
        return Ok(());
    }

    if args.check {
        anyhow::bail!("{} is not in canonical form", path.display());
    }

    save_document(&doc, path)?;
    println!("{}: {}", "Formatted".green(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_prefers_option_when_section_exists() {
        let doc = Document::parse_str("[mypy]\nfiles = dvc\n").unwrap();
        assert!(matches!(
            missing(&doc, "mypy", "strict"),
            ConfigError::OptionNotFound { .. }
        ));
        assert!(matches!(
            missing(&doc, "isort", "line_length"),
            ConfigError::SectionNotFound(_)
        ));
    }

    #[test]
    fn test_format_or_falls_back_to_config() {
        let config = Config::default();
        assert_eq!(format_or(None, &config), OutputFormat::Table);
        assert_eq!(format_or(Some(OutputFormat::Json), &config), OutputFormat::Json);
    }
}
