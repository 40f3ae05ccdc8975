//! # SCM Auth CLI
//!
//! This is the binary entry point for the `scm-auth` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Installing the logger.
//! - Executing the appropriate command based on the parsed arguments.
//!
//! The provisioning logic is defined in the `lib.rs` library crate, so the
//! binary stays a thin wrapper around the reusable library functionality.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
