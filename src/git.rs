//! Running `git clone` with provisioned credentials.
//!
//! This uses the system git command. The environment from a provisioning
//! pass is applied on top of the current process environment, and the
//! override URL (when present) replaces the source URL, so credentials only
//! ever reach git through the generated configuration files.

use std::fs;
use std::path::Path;
use std::process::Command;

use log::{debug, info};
use url::Url;

use crate::dispatch::Provisioned;
use crate::error::{Error, Result};

/// Optional `git clone` arguments.
#[derive(Debug, Clone, Default)]
pub struct CloneOptions {
    /// Branch or tag to check out.
    pub ref_name: Option<String>,
    /// Shallow clone depth.
    pub depth: Option<u32>,
}

/// Builds the `git clone` argument list.
pub fn clone_args(url: &Url, target_dir: &Path, options: &CloneOptions) -> Vec<String> {
    let mut args = vec!["clone".to_string()];
    if let Some(depth) = options.depth {
        args.push(format!("--depth={}", depth));
    }
    if let Some(ref_name) = &options.ref_name {
        args.push("--branch".to_string());
        args.push(ref_name.clone());
    }
    args.push(url.to_string());
    args.push(target_dir.to_string_lossy().into_owned());
    args
}

fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    if url.password().is_some() {
        let _ = url.set_password(Some("redacted"));
    }
    url.to_string()
}

/// Removes the URL's password from git output that may echo the URL.
fn redacted_output(output: &str, url: &Url) -> String {
    match url.password() {
        Some(password) if !password.is_empty() => output.replace(password, "redacted"),
        _ => output.to_string(),
    }
}

/// Clones `source_url` into `target_dir` using the provisioned environment.
pub fn clone_repository(
    source_url: &Url,
    target_dir: &Path,
    options: &CloneOptions,
    provisioned: &Provisioned,
) -> Result<()> {
    if let Some(parent) = target_dir.parent() {
        fs::create_dir_all(parent)?;
    }

    let url = provisioned.clone_url(source_url);
    info!("Cloning {} into {}", redacted(url), target_dir.display());
    for (name, value) in provisioned.env_pairs() {
        debug!("git environment: {}={}", name, value);
    }

    let output = Command::new("git")
        .args(clone_args(url, target_dir, options))
        .envs(provisioned.env_pairs())
        .output()
        .map_err(|e| Error::GitCommand {
            command: "clone".to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = redacted_output(&String::from_utf8_lossy(&output.stderr), url);

        let message = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
        {
            format!(
                "Authentication failed. Check the secrets mounted for this source:\n\
                - ssh-privatekey for SSH sources\n\
                - username and password or token for HTTP(S) sources\n\
                - ca.crt when the server uses a private certificate authority\n\
                Error: {}",
                stderr
            )
        } else {
            stderr
        };

        return Err(Error::GitClone {
            url: redacted(url),
            message,
        });
    }

    Ok(())
}
