//! # Error Handling
//!
//! This module defines the centralized error type for `scm-auth`. It uses the
//! `thiserror` library to build a single `Error` enum covering every way a
//! provisioning pass can fail, with messages that name the variable, provider
//! or directory involved.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant corresponds to one failure kind
//!   of a provisioning pass:
//!   - conflicts between providers writing the same context variable or the
//!     override URL,
//!   - an unreadable secrets directory,
//!   - a secrets directory with nothing any provider recognizes,
//!   - a failure inside one provider, wrapped with that provider's name,
//!   - URL manipulation and git invocation failures,
//!   - plain I/O errors.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Secret values never appear in any message. Conflicts only ever involve
//! generated file paths or credential-stripped URLs.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for scm-auth operations
#[derive(Error, Debug)]
pub enum Error {
    /// A context variable is already bound to a different value.
    #[error("Conflict: {name} is already set to {existing:?}, refusing to set it to {requested:?}")]
    Conflict {
        name: String,
        existing: String,
        requested: String,
    },

    /// The override URL is already set to a different URL.
    #[error("Conflict: override URL is already set to {existing}, refusing to set it to {requested}")]
    OverrideUrlConflict { existing: String, requested: String },

    /// The secrets directory could not be listed.
    #[error("Cannot read secrets directory {}: {source}", dir.display())]
    SecretsDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No provider recognized any file in the secrets directory.
    #[error("no auth handler was found for secrets in {}", dir.display())]
    NoAuthHandler { dir: PathBuf },

    /// A provider failed during setup.
    #[error("error setting up {handler} auth: {source}")]
    Setup {
        handler: String,
        #[source]
        source: Box<Error>,
    },

    /// A URL could not be rewritten.
    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// An error occurred while cloning a Git repository.
    #[error("Git clone error for {url}: {message}")]
    GitClone { url: String, message: String },

    /// An error occurred while executing a Git command.
    #[error("Git command failed: {command} - {stderr}")]
    GitCommand { command: String, stderr: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wraps an error raised by the provider called `handler`.
    pub fn setup(handler: &str, source: Error) -> Self {
        Error::Setup {
            handler: handler.to_string(),
            source: Box::new(source),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
