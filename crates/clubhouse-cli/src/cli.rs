//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Clubhouse - Ask questions about university club documents.
#[derive(Debug, Parser)]
#[command(name = "clubhouse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CLUBHOUSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Answer with a sources table (default)
    Table,
    /// JSON format
    Json,
    /// Answer text only
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ingest club documents into the vector store
    Ingest(IngestArgs),

    /// Ask a single question
    Query(QueryArgs),

    /// Ask questions interactively
    Chat(ChatArgs),

    /// Write a default configuration file
    Init(InitArgs),
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// Directory of club documents (overrides `indexer.input_dir`)
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,

    /// Delete the namespace before ingesting
    #[arg(long)]
    pub clear: bool,
}

/// Arguments for the query command.
#[derive(Debug, Parser)]
pub struct QueryArgs {
    /// The question to answer
    pub question: String,

    /// Number of chunks to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Only consider clubs with dues at or below this amount
    #[arg(long)]
    pub max_dues: Option<f64>,

    /// Only consider the named club
    #[arg(long)]
    pub club: Option<String>,

    /// Do not infer filters from the question
    #[arg(long, conflicts_with_all = ["max_dues", "club"])]
    pub no_filters: bool,
}

/// Arguments for the chat command.
#[derive(Debug, Default, Parser)]
pub struct ChatArgs {
    /// Number of chunks to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

/// Arguments for the init command.
#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
