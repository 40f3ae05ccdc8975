//! Default values for scm-auth configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Where build pods mount the source secret.
pub const DEFAULT_SECRETS_DIR: &str = "/var/run/secrets/openshift.io/source";

/// Returns the default secrets directory.
///
/// This can be overridden by the `--secrets-dir` CLI flag or the
/// `SCM_AUTH_SECRETS_DIR` environment variable.
pub fn default_secrets_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SECRETS_DIR)
}

/// Returns the default scratch directory for generated files.
///
/// Uses the process temp directory, which honours `TMPDIR` on Unix. This can
/// be overridden by the `--temp-dir` CLI flag or the `SCM_AUTH_TMPDIR`
/// environment variable.
pub fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir()
}
