//! # Setup Command Implementation
//!
//! This module implements the `setup` subcommand, which runs one provisioning
//! pass over a secrets directory and prints the result for a wrapper script
//! or build step to hand to git.
//!
//! ## Output Formats
//!
//! - **text** (default): one `NAME=VALUE` line per environment variable,
//!   followed by `override-url: <url>` when the credentials were moved out
//!   of the source URL.
//! - **json**: `{"env": ["NAME=VALUE", ...], "override_url": "<url>" | null}`.
//!
//! Generated files are left in the scratch directory for the git invocation
//! that follows; removing them afterwards is up to the caller.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use url::Url;

use scm_auth::defaults;
use scm_auth::dispatch::{self, Provisioned};

/// How to print the provisioning result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// NAME=VALUE lines
    #[default]
    Text,
    /// A single JSON object
    Json,
}

/// Provision credentials and print the resulting git environment
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// URL of the source repository that will be cloned.
    #[arg(long, value_name = "URL", env = "SCM_AUTH_SOURCE_URL")]
    pub source: Url,

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

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Renders a provisioning result in the requested format.
pub fn render(provisioned: &Provisioned, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for entry in &provisioned.env {
                out.push_str(entry);
                out.push('\n');
            }
            if let Some(url) = &provisioned.override_url {
                out.push_str(&format!("override-url: {}\n", url));
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(provisioned)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Execute the `setup` command.
pub fn execute(args: SetupArgs) -> Result<()> {
    let scratch_dir = args
        .temp_dir
        .unwrap_or_else(defaults::default_scratch_dir);

    let provisioned =
        dispatch::setup_with_scratch_dir(&args.secrets_dir, &args.source, &scratch_dir)
            .with_context(|| {
                format!(
                    "Failed to provision credentials from {}",
                    args.secrets_dir.display()
                )
            })?;

    let rendered = render(&provisioned, args.format)?;
    io::stdout().write_all(rendered.as_bytes())?;
    Ok(())
}
