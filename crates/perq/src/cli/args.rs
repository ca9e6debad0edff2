//! Clap argument definitions for the `perq` CLI.

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "perq")]
#[command(about = "Percolation - match documents against stored queries")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared output mode flags.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `perq add`.
#[derive(Args, Debug, Clone)]
pub struct AddCommand {
    /// Stored query identifier
    pub id: String,

    /// Query string, e.g. 'greeting:happy int_field:[0 TO 5]'
    pub query: String,
}

/// Arguments for `perq rm`.
#[derive(Args, Debug, Clone)]
pub struct RmCommand {
    /// Stored query identifier
    pub id: String,
}

/// Arguments for `perq ls`.
#[derive(Args, Debug, Clone)]
pub struct LsCommand {
    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `perq percolate`.
#[derive(Args, Debug, Clone)]
pub struct PercolateCommand {
    /// Path to a JSON document, or '-' for stdin
    pub document: String,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `perq init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `perq` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize perq configuration in current directory
    Init(InitCommand),

    /// Parse and store a query
    Add(AddCommand),

    /// Remove a stored query
    Rm(RmCommand),

    /// List stored queries
    Ls(LsCommand),

    /// Match a document against all stored queries
    Percolate(PercolateCommand),

    /// Show configuration and index statistics
    Status,
}
