//! # Coordination Context
//!
//! A `Context` is the shared state of one provisioning pass. Every selected
//! provider receives the same `&mut Context` in turn and records what the
//! downstream git process needs: environment variables and, optionally, a
//! credential-stripped URL to clone instead of the original.
//!
//! Writes are conflict-checked. Setting a variable (or the override URL) to
//! the value it already holds is a silent no-op; setting it to anything else
//! fails, so two providers can never quietly clobber each other.
//!
//! The context also carries the scratch directory in which providers create
//! their generated files. Nothing here ever deletes those files; the caller
//! owns their lifetime.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use url::Url;

use crate::error::{Error, Result};

/// Conflict-checked variables and override URL for one provisioning pass.
#[derive(Debug, Clone)]
pub struct Context {
    vars: BTreeMap<String, String>,
    override_url: Option<Url>,
    scratch_dir: PathBuf,
}

impl Context {
    /// Creates an empty context whose generated files go to the process
    /// temp directory.
    pub fn new() -> Self {
        Self::with_scratch_dir(std::env::temp_dir())
    }

    /// Creates an empty context whose generated files go to `scratch_dir`.
    pub fn with_scratch_dir(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: BTreeMap::new(),
            override_url: None,
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Directory where providers create temporary files.
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Looks up a variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Binds `name` to `value`.
    ///
    /// Fails with [`Error::Conflict`] if `name` is already bound to a
    /// different value, leaving the existing binding in place.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        match self.vars.get(name) {
            Some(existing) if existing == value => Ok(()),
            Some(existing) => Err(Error::Conflict {
                name: name.to_string(),
                existing: existing.clone(),
                requested: value.to_string(),
            }),
            None => {
                debug!("Setting {}={}", name, value);
                self.vars.insert(name.to_string(), value.to_string());
                Ok(())
            }
        }
    }

    /// Records the URL git should clone instead of the source URL.
    ///
    /// Same contract as [`Context::set`], comparing serialized URLs.
    pub fn set_override_url(&mut self, url: Url) -> Result<()> {
        match &self.override_url {
            Some(existing) if existing.as_str() == url.as_str() => Ok(()),
            Some(existing) => Err(Error::OverrideUrlConflict {
                existing: existing.to_string(),
                requested: url.to_string(),
            }),
            None => {
                debug!("Setting override URL to {}", url);
                self.override_url = Some(url);
                Ok(())
            }
        }
    }

    /// The override URL, if any provider recorded one.
    pub fn override_url(&self) -> Option<&Url> {
        self.override_url.as_ref()
    }

    /// All variables as `NAME=VALUE` strings, sorted by name.
    pub fn env(&self) -> Vec<String> {
        self.vars
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect()
    }

    /// Consumes the context, returning its environment and override URL.
    pub fn into_parts(self) -> (Vec<String>, Option<Url>) {
        let env = self.env();
        (env, self.override_url)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
