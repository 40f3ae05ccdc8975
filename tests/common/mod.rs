//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a fixture holding a secrets directory and a scratch
//! directory, plus helpers to build CLI commands against them.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = SecretsFixture::new().with_secret("token", "abc");
//! let result = fixture.setup("https://example.com/repo.git").unwrap();
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use url::Url;

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::SecretsFixture;
}

/// A secrets directory and a scratch directory for one provisioning pass.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = SecretsFixture::new()
///     .with_secret("username", "builder")
///     .with_secret("password", "hunter2");
///
/// let mut cmd = fixture.command();
/// cmd.arg("setup").arg("--source").arg("https://example.com/r.git");
/// ```
pub struct SecretsFixture {
    secrets: assert_fs::TempDir,
    scratch: assert_fs::TempDir,
}

#[allow(dead_code)]
impl SecretsFixture {
    /// Create a fixture with an empty secrets directory.
    pub fn new() -> Self {
        Self {
            secrets: assert_fs::TempDir::new().expect("Failed to create secrets directory"),
            scratch: assert_fs::TempDir::new().expect("Failed to create scratch directory"),
        }
    }

    /// Add a secret file with the given name and content.
    pub fn with_secret(self, name: &str, content: &str) -> Self {
        self.secrets
            .child(name)
            .write_str(content)
            .expect("Failed to write secret");
        self
    }

    /// Path to the secrets directory.
    pub fn secrets_dir(&self) -> &Path {
        self.secrets.path()
    }

    /// Path to the scratch directory.
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    /// Path of a secret file.
    pub fn secret_path(&self, name: &str) -> PathBuf {
        self.secrets.path().join(name)
    }

    /// Run a provisioning pass for `source` over this fixture.
    pub fn setup(&self, source: &str) -> scm_auth::error::Result<scm_auth::dispatch::Provisioned> {
        let url = Url::parse(source).expect("valid source URL");
        scm_auth::dispatch::setup_with_scratch_dir(self.secrets_dir(), &url, self.scratch_dir())
    }

    /// Names of the files generated in the scratch directory, sorted.
    pub fn generated_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.scratch_dir())
            .expect("scratch directory is readable")
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Create a CLI command pointed at this fixture's directories.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scm-auth");
        cmd.env("SCM_AUTH_SECRETS_DIR", self.secrets_dir())
            .env("SCM_AUTH_TMPDIR", self.scratch_dir())
            .env_remove("SCM_AUTH_SOURCE_URL")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for SecretsFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Value of `name` in a provisioning result's environment.
#[allow(dead_code)]
pub fn env_value<'a>(provisioned: &'a scm_auth::dispatch::Provisioned, name: &str) -> Option<&'a str> {
    provisioned
        .env_pairs()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
