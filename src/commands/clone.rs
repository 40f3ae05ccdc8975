//! # Clone Command Implementation
//!
//! This module implements the `clone` subcommand: one provisioning pass over
//! the secrets directory followed by `git clone` of the source repository
//! with the provisioned environment. When credentials were moved out of the
//! source URL, the credential-stripped URL is what git is given.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use url::Url;

use scm_auth::defaults;
use scm_auth::dispatch;
use scm_auth::git::{self, CloneOptions};
use scm_auth::output::OutputConfig;

/// Provision credentials and clone the source repository
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// URL of the source repository.
    #[arg(long, value_name = "URL", env = "SCM_AUTH_SOURCE_URL")]
    pub source: Url,

    /// Directory to clone into.
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Directory containing the mounted secret files.
    #[arg(
        long,
        value_name = "DIR",
        env = "SCM_AUTH_SECRETS_DIR",
        default_value_os_t = defaults::default_secrets_dir()
    )]
    pub secrets_dir: PathBuf,

    /// Directory where generated files are created.
    ///
    /// Defaults to the system temp directory.
    #[arg(long, value_name = "DIR", env = "SCM_AUTH_TMPDIR")]
    pub temp_dir: Option<PathBuf>,

    /// Branch or tag to check out.
    #[arg(long = "ref", value_name = "REF")]
    pub ref_name: Option<String>,

    /// Create a shallow clone with this many commits.
    #[arg(long, value_name = "N")]
    pub depth: Option<u32>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the `clone` command.
pub fn execute(args: CloneArgs, output: &OutputConfig) -> Result<()> {
    let scratch_dir = args
        .temp_dir
        .unwrap_or_else(defaults::default_scratch_dir);

    if !args.quiet {
        eprintln!(
            "{}",
            output.progress(&format!(
                "Provisioning credentials from {}",
                args.secrets_dir.display()
            ))
        );
    }

    let provisioned =
        dispatch::setup_with_scratch_dir(&args.secrets_dir, &args.source, &scratch_dir)
            .with_context(|| {
                format!(
                    "Failed to provision credentials from {}",
                    args.secrets_dir.display()
                )
            })?;

    let options = CloneOptions {
        ref_name: args.ref_name,
        depth: args.depth,
    };
    git::clone_repository(&args.source, &args.target, &options, &provisioned)?;

    if !args.quiet {
        eprintln!(
            "{}",
            output.success(&format!("Cloned into {}", args.target.display()))
        );
    }
    Ok(())
}
