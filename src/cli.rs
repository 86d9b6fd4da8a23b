//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `oncall`.
#[derive(Debug, Parser)]
#[command(
    name = "oncall",
    version,
    about = "Converge Incident Manager contacts and response plans to a declarative file"
)]
pub struct Cli {
    /// Desired-state file.
    #[arg(long, short, global = true, env = "ONCALL_CONFIG", default_value = "oncall.yaml")]
    pub config: PathBuf,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create missing contacts and channels, then rewrite response plan engagements.
    Apply {
        /// Report what would change without changing anything.
        #[arg(long)]
        dry_run: bool,
    },
    /// Detach contacts from response plans and delete them with their channels.
    Delete {
        /// Report what would be deleted without deleting anything.
        #[arg(long)]
        dry_run: bool,
        /// Skip the interactive confirmation.
        #[arg(long, short)]
        yes: bool,
        /// Aliases to delete; defaults to `deletion.contacts` from the config.
        aliases: Vec<String>,
    },
    /// Check the config file without contacting AWS.
    Validate,
}
