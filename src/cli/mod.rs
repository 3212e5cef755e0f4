//! Command-line interface for the job tracker.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Job application tracker - REST backend for tracked postings,
/// attachments and external job search
#[derive(Parser)]
#[command(name = "job-tracker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default locations
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP API server (default)
    #[command(alias = "daemon")]
    Serve,

    /// Write a default config.toml to the current directory
    Init,
}

impl Cli {
    #[must_use]
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}
