//! Binary entry point for magic-keywords.
//!
//! This binary provides the CLI interface for the keyword catalog.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use commands::{FieldArgs, ImportArgs};
use magic_keywords::config::{ENV_CONFIG_PATH, KeywordsConfig};
use magic_keywords::observability;
use magic_keywords::storage::{FilesystemStore, MemoryStore};
use magic_keywords::KeywordService;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Magic Keywords - manage a catalog of knowledge cards.
#[derive(Parser)]
#[command(name = "magic-keywords")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = ENV_CONFIG_PATH)]
    config: Option<String>,

    /// Directory holding the collection (overrides configuration).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep the collection in memory only; nothing is written to disk.
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List keywords.
    List {
        /// Case-insensitive search over term and description.
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by category tag.
        #[arg(long)]
        category: Option<String>,

        /// Filter by depth tag.
        #[arg(long)]
        depth: Option<String>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show one keyword.
    Show {
        /// The term to show.
        term: String,
    },

    /// Add a keyword.
    Add {
        /// The new term.
        #[arg(long)]
        term: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Update a keyword.
    Update {
        /// The term to update.
        term: String,

        /// Rename the keyword.
        #[arg(long = "term", id = "new_term")]
        new_term: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete keywords.
    Delete {
        /// Terms to delete.
        #[arg(required = true)]
        terms: Vec<String>,
    },

    /// Show collection statistics.
    Stats {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Import keywords from a file (`-` for stdin).
    Import(ImportArgs),

    /// Export keywords.
    Export {
        /// Format: json, csv, markdown, or excel.
        #[arg(short, long)]
        format: Option<String>,

        /// Output file or directory (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Discard the stored collection and return to the bundled defaults.
    Reset,
}

fn main() -> ExitCode {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(cli: Cli, mut config: KeywordsConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }

    let service = if cli.ephemeral {
        KeywordService::with_storage_key(MemoryStore::new(), config.storage_key.clone())
    } else {
        tracing::debug!(data_dir = %config.data_dir.display(), "Using filesystem store");
        KeywordService::with_storage_key(
            FilesystemStore::new(config.data_dir.clone()),
            config.storage_key.clone(),
        )
    };
    let keywords = Arc::new(service);

    match cli.command {
        Commands::List {
            search,
            category,
            depth,
            json,
        } => commands::cmd_list(&keywords, search, category, depth, json)?,

        Commands::Show { term } => commands::cmd_show(&keywords, &term)?,

        Commands::Add { term, fields } => commands::cmd_add(&keywords, term, fields)?,

        Commands::Update {
            term,
            new_term,
            fields,
        } => commands::cmd_update(&keywords, &term, new_term, fields)?,

        Commands::Delete { terms } => commands::cmd_delete(&keywords, &terms)?,

        Commands::Stats { json } => commands::cmd_stats(&keywords, json)?,

        Commands::Import(args) => commands::cmd_import(keywords, &config, args)?,

        Commands::Export { format, output } => commands::cmd_export(keywords, format, output)?,

        Commands::Reset => commands::cmd_reset(&keywords)?,
    }

    Ok(())
}

/// Loads configuration.
///
/// An explicit path comes from `--config` or `MAGIC_KEYWORDS_CONFIG_PATH`.
fn load_config(path: Option<&str>) -> Result<KeywordsConfig, Box<dyn std::error::Error>> {
    // If a path is provided, load from that file
    if let Some(config_path) = path {
        return Ok(KeywordsConfig::load_from_file(std::path::Path::new(config_path))?
            .with_env_overrides());
    }

    // Otherwise, load from default location
    Ok(KeywordsConfig::load_default().with_env_overrides())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_flag_parses_after_subcommand() {
        let cli = Cli::try_parse_from(["magic-keywords", "stats", "--config", "/tmp/k.toml"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cli.config.as_deref(), Some("/tmp/k.toml"));
    }

    #[test]
    fn test_config_arg_reads_env_variable() {
        let command = Cli::command();
        let arg = command
            .get_arguments()
            .find(|a| a.get_id() == "config")
            .unwrap_or_else(|| panic!("config argument missing"));
        assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new(ENV_CONFIG_PATH)));
    }
}
