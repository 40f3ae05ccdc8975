//! # Provisioning Pass
//!
//! This module ties the providers together. One pass is a strictly
//! sequential pipeline:
//!
//! 1. **List** the secrets directory.
//! 2. **Select** every provider that handles at least one listed file. A
//!    provider watching several files is selected once.
//! 3. **Set up** the selected providers in priority order (SSH key,
//!    username/password, CA certificate, raw gitconfig) against one fresh
//!    [`Context`], stopping at the first failure.
//! 4. **Collect** the context's environment and override URL into a
//!    [`Provisioned`] value.
//!
//! There are no retries and nothing is rolled back: files written by
//! providers that ran before a failure stay on disk, and the caller owns
//! their cleanup either way.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::info;
use serde::Serialize;
use url::Url;

use crate::auth::{CaCert, GitConfig, ScmAuth, SshPrivateKey, UsernamePassword};
use crate::context::Context;
use crate::error::{Error, Result};

/// Output of a successful provisioning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Provisioned {
    /// Environment entries as `NAME=VALUE`, sorted by name.
    pub env: Vec<String>,
    /// Credential-stripped source URL to clone instead of the original.
    pub override_url: Option<Url>,
}

impl Provisioned {
    /// Splits the environment entries into name/value pairs.
    pub fn env_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.env.iter().filter_map(|entry| entry.split_once('='))
    }

    /// The URL git should actually clone.
    pub fn clone_url<'a>(&'a self, source_url: &'a Url) -> &'a Url {
        self.override_url.as_ref().unwrap_or(source_url)
    }
}

/// All providers for `source_url`, in priority order.
pub fn git_auths(source_url: &Url) -> Vec<Box<dyn ScmAuth>> {
    vec![
        Box::new(SshPrivateKey::new()),
        Box::new(UsernamePassword::new(source_url.clone())),
        Box::new(CaCert::new(source_url.clone())),
        Box::new(GitConfig::new()),
    ]
}

/// Keeps the providers that handle at least one of `files`, once per
/// provider name, preserving the order of `auths`.
pub fn present(auths: Vec<Box<dyn ScmAuth>>, files: &[String]) -> Vec<Box<dyn ScmAuth>> {
    let mut seen = HashSet::new();
    auths
        .into_iter()
        .filter(|auth| files.iter().any(|file| auth.handles(file)))
        .filter(|auth| seen.insert(auth.name().to_string()))
        .collect()
}

/// Lists the file names in `secrets_dir`, sorted.
pub fn list_secret_files(secrets_dir: &Path) -> Result<Vec<String>> {
    let to_error = |source: std::io::Error| Error::SecretsDir {
        dir: secrets_dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(secrets_dir).map_err(to_error)? {
        let entry = entry.map_err(to_error)?;
        files.push(entry.file_name().to_string_lossy().into_owned());
    }
    files.sort();
    Ok(files)
}

/// Runs one provisioning pass over `secrets_dir`, creating generated files
/// in the process temp directory.
pub fn setup(secrets_dir: &Path, source_url: &Url) -> Result<Provisioned> {
    setup_with_context(secrets_dir, source_url, Context::new())
}

/// Runs one provisioning pass, creating generated files in `scratch_dir`.
pub fn setup_with_scratch_dir(
    secrets_dir: &Path,
    source_url: &Url,
    scratch_dir: &Path,
) -> Result<Provisioned> {
    setup_with_context(
        secrets_dir,
        source_url,
        Context::with_scratch_dir(scratch_dir),
    )
}

fn setup_with_context(
    secrets_dir: &Path,
    source_url: &Url,
    context: Context,
) -> Result<Provisioned> {
    setup_with_auths(git_auths(source_url), secrets_dir, context)
}

/// Runs a provisioning pass with an explicit provider list.
pub fn setup_with_auths(
    auths: Vec<Box<dyn ScmAuth>>,
    secrets_dir: &Path,
    mut context: Context,
) -> Result<Provisioned> {
    let files = list_secret_files(secrets_dir)?;
    let selected = present(auths, &files);
    if selected.is_empty() {
        return Err(Error::NoAuthHandler {
            dir: secrets_dir.to_path_buf(),
        });
    }

    let names: Vec<&str> = selected.iter().map(|auth| auth.name()).collect();
    info!(
        "Setting up source auth from {}: {}",
        secrets_dir.display(),
        names.join(", ")
    );

    for auth in &selected {
        auth.setup(secrets_dir, &mut context)
            .map_err(|e| Error::setup(auth.name(), e))?;
    }

    let (env, override_url) = context.into_parts();
    if let Some(url) = &override_url {
        info!("Cloning from {} with externalized credentials", url);
    }
    Ok(Provisioned { env, override_url })
}
