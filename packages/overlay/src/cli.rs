//! Command-line interface for the media overlay checker.

use std::path::{Component, Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use console::style;

use crate::checker::ValidationSession;
use crate::config::SMIL_MEDIA_TYPE;
use crate::error::{OverlayError, Result};
use crate::package::PackageManifest;
use crate::report::{Message, Severity};

/// EPUB media overlay checker - Validate SMIL media overlay documents.
#[derive(Parser)]
#[command(name = "epubcheck-overlay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check one or more media overlay documents.
    Check {
        /// Media overlay documents to check (default: every overlay in the manifest)
        #[arg(required_unless_present = "manifest")]
        overlays: Vec<PathBuf>,

        /// Package root that references are resolved against (default: .)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// YAML manifest of package resources; enables reference checks
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Skip cross-reference checks even when a manifest is given
        #[arg(long)]
        no_xref: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// How messages are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Coloured, one message per line.
    Text,
    /// JSON array of messages.
    Json,
}

/// Run the CLI.
///
/// # Returns
/// `true` when every document was read and no error was reported.
pub fn run() -> Result<bool> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            overlays,
            root,
            manifest,
            no_xref,
            format,
        } => check_command(
            &overlays,
            root.as_deref(),
            manifest.as_deref(),
            no_xref,
            format,
        ),
    }
}

/// Execute the check command.
fn check_command(
    overlays: &[PathBuf],
    root: Option<&Path>,
    manifest: Option<&Path>,
    no_xref: bool,
    format: OutputFormat,
) -> Result<bool> {
    let root = root.unwrap_or_else(|| Path::new("."));
    if !root.is_dir() {
        return Err(OverlayError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Package root is not a directory: {}", root.display()),
        )));
    }

    let mut paths = overlays
        .iter()
        .map(|p| package_path(root, p))
        .collect::<Result<Vec<_>>>()?;

    let mut session = ValidationSession::new(root);
    if let Some(manifest_path) = manifest {
        // Load even with --no-xref so a broken manifest is still an error.
        let manifest = PackageManifest::load(manifest_path)?;
        if paths.is_empty() {
            paths = manifest
                .resources_of_type(|t| t == SMIL_MEDIA_TYPE)
                .map(|item| item.href.clone())
                .collect();
        }
        if !no_xref {
            session = session.with_manifest(&manifest);
        }
    }

    let failures = session.check_documents(&paths);
    for failure in &failures {
        eprintln!("{} {failure}", style("error:").red().bold());
    }

    let messages = session.finish();
    let has_errors = messages.iter().any(|m| m.severity <= Severity::Error);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&messages)?),
        OutputFormat::Text => print_text(&messages, paths.len() - failures.len()),
    }

    Ok(failures.is_empty() && !has_errors)
}

fn print_text(messages: &[Message], checked: usize) {
    for message in messages {
        let label = match message.severity {
            Severity::Fatal => style(message.severity.as_str()).red().bold(),
            Severity::Error => style(message.severity.as_str()).red(),
            Severity::Warning => style(message.severity.as_str()).yellow(),
        };
        let mut line = format!(
            "{label}({}): {}: {}",
            style(message.id).bold(),
            message.location,
            message.id.summary()
        );
        if !message.args.is_empty() {
            line.push_str(&format!(" ({})", message.args.join(", ")));
        }
        println!("{line}");
    }

    let errors = messages
        .iter()
        .filter(|m| m.severity <= Severity::Error)
        .count();
    let warnings = messages.len() - errors;

    if messages.is_empty() {
        println!(
            "{} {checked} document(s), no problems found",
            style("Checked").green().bold()
        );
    } else {
        println!(
            "{} {checked} document(s): {} error(s), {} warning(s)",
            style("Checked").bold(),
            style(errors).red().bold(),
            style(warnings).yellow().bold()
        );
    }
}

/// Package-relative path of a document given on the command line.
///
/// Paths under `root` are made relative to it. Anything that would still
/// point outside the package is rejected.
fn package_path(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let inside = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !inside {
        return Err(OverlayError::InvalidPath(path.display().to_string()));
    }
    Ok(relative.to_string_lossy().replace('\\', "/"))
}
