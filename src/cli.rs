//! CLI argument parsing and command dispatch

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands;
use scm_auth::output::OutputConfig;

/// SCM Auth - Provision git credentials from mounted secrets
#[derive(Parser, Debug)]
#[command(name = "scm-auth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Provision credentials and print the resulting git environment
    Setup(commands::setup::SetupArgs),

    /// Provision credentials and clone the source repository
    Clone(commands::clone::CloneArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let level: LevelFilter = self
            .log_level
            .parse()
            .map_err(|_| anyhow!("Invalid log level: {}", self.log_level))?;
        env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .init();

        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Setup(args) => commands::setup::execute(args),
            Commands::Clone(args) => commands::clone::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
