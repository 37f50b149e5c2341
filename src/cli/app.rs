//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{item, query};
use crate::domain::ItemKind;
use crate::storage::{Format, Settings};

#[derive(Parser)]
#[command(name = "gtd")]
#[command(author, version, about = "Read and update GTD items stored in Org or JSONL files")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Record format of the input files (inferred from file extensions if omitted)
    #[arg(long, short = 'f', global = true, env = "GTD_FORMAT")]
    pub format: Option<Format>,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true, env = "GTD_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the files and summarize what they contain
    Check {
        /// Input files (defaults to the configured files)
        files: Vec<PathBuf>,
    },

    /// List items
    List {
        /// Input files (defaults to the configured files)
        files: Vec<PathBuf>,

        /// Only items of this type (project, next_action, waiting_for)
        #[arg(long)]
        kind: Option<ItemKind>,

        /// Only items with an active status
        #[arg(long)]
        active: bool,
    },

    /// Show one item
    Show {
        /// Item ID
        id: String,

        /// Input files (defaults to the configured files)
        files: Vec<PathBuf>,
    },

    /// Change an item's status and write it back to its file
    SetStatus {
        /// Item ID
        id: String,

        /// New status, as configured for the item's type
        status: String,

        /// Input files (defaults to the configured files)
        files: Vec<PathBuf>,
    },

    /// Add a new item to a file
    ///
    /// Examples:
    ///   gtd add project "Move house" --file gtd.org --status ACTIVE
    ///   gtd add next_action "Pack books" --file gtd.org --status NEXT --project p-1a2b3c4 --context home
    Add {
        /// Item type (project, next_action, waiting_for)
        kind: ItemKind,

        /// Item title
        title: String,

        /// File to append the item to
        #[arg(long)]
        file: PathBuf,

        /// Initial status
        #[arg(long)]
        status: String,

        /// Superior project ID (repeatable)
        #[arg(long = "project")]
        projects: Vec<String>,

        /// Context name (repeatable)
        #[arg(long = "context")]
        contexts: Vec<String>,

        /// Files holding the config record (defaults to --file)
        files: Vec<PathBuf>,
    },
}

/// Installs the tracing subscriber; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Input files and their record format, after applying settings
pub struct Inputs {
    pub format: Format,
    pub files: Vec<PathBuf>,
}

fn resolve_inputs(
    settings: &Settings,
    flag: Option<Format>,
    given: &[PathBuf],
) -> Result<Inputs> {
    let files = settings.resolve_files(given)?;
    let format = settings.resolve_format(flag, &files)?;
    Ok(Inputs { format, files })
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let output = Output::new(cli.output, cli.verbose);

    let settings = match &cli.settings {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load().context("Failed to load settings")?,
    };
    output.verbose(&format!("Settings: {:?}", settings));

    match cli.command {
        Commands::Check { files } => {
            let inputs = resolve_inputs(&settings, cli.format, &files)?;
            output.verbose_ctx("check", &format!("Reading {} file(s) as {}", inputs.files.len(), inputs.format));
            query::check(&output, &inputs)?
        }

        Commands::List { files, kind, active } => {
            let inputs = resolve_inputs(&settings, cli.format, &files)?;
            output.verbose_ctx("list", &format!("kind filter: {:?}, active only: {}", kind, active));
            query::list(&output, &inputs, kind, active)?
        }

        Commands::Show { id, files } => {
            let inputs = resolve_inputs(&settings, cli.format, &files)?;
            query::show(&output, &inputs, &id)?
        }

        Commands::SetStatus { id, status, files } => {
            let inputs = resolve_inputs(&settings, cli.format, &files)?;
            item::set_status(&output, &inputs, &id, &status)?
        }

        Commands::Add {
            kind,
            title,
            file,
            status,
            projects,
            contexts,
            files,
        } => {
            let sources = if files.is_empty() && file.exists() {
                vec![file.clone()]
            } else {
                settings.resolve_files(&files)?
            };

            // The target file must agree on format with the config sources
            let mut probe = sources.clone();
            probe.push(file.clone());
            let format = settings.resolve_format(cli.format, &probe)?;

            let inputs = Inputs { format, files: sources };
            let new_item = item::NewItem {
                kind,
                title: &title,
                status: &status,
                projects: &projects,
                contexts: &contexts,
            };
            item::add(&output, &inputs, &file, new_item)?
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_repeated_flags() {
        let cli = Cli::try_parse_from([
            "gtd", "add", "next_action", "Pack", "--file", "gtd.org", "--status", "NEXT",
            "--project", "p-1", "--project", "p-2", "--context", "home",
        ])
        .unwrap();

        match cli.command {
            Commands::Add { kind, projects, contexts, files, .. } => {
                assert_eq!(kind, ItemKind::NextAction);
                assert_eq!(projects, vec!["p-1", "p-2"]);
                assert_eq!(contexts, vec!["home"]);
                assert!(files.is_empty());
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn abstract_kind_is_rejected() {
        assert!(Cli::try_parse_from(["gtd", "list", "--kind", "item"]).is_err());
    }

    #[test]
    fn format_flag_is_global() {
        let cli = Cli::try_parse_from(["gtd", "check", "a.txt", "--format", "jsonl"]).unwrap();
        assert_eq!(cli.format, Some(Format::Jsonl));
    }
}
