//! # CLI Command Implementations
//!
//! Each subcommand of the `scm-auth` tool lives in its own file and provides:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and calls into the
//!   `scm_auth` library.

pub mod clone;
pub mod completions;
pub mod setup;
