//! # SCM Auth Library
//!
//! This library turns a directory of mounted secret files into configuration
//! that lets a plain `git` process clone a private repository. It is used by
//! the `scm-auth` command-line tool but can be embedded in any build system
//! that hands secrets to git through the filesystem.
//!
//! ## Quick Example
//!
//! ```no_run
//! use std::path::Path;
//! use scm_auth::dispatch;
//! use url::Url;
//!
//! let source = Url::parse("https://git.example.com/org/repo.git").unwrap();
//! let provisioned = dispatch::setup(Path::new("/var/run/secrets/source"), &source).unwrap();
//!
//! // Environment for the git process, e.g. GIT_SSH, GIT_CONFIG and HOME
//! for entry in &provisioned.env {
//!     println!("{}", entry);
//! }
//! // Clone this instead of the source URL
//! println!("{}", provisioned.clone_url(&source));
//! ```
//!
//! ## Core Concepts
//!
//! - **Secrets directory**: a directory of well-known file names
//!   (`ssh-privatekey`, `username`, `password`, `token`, `ca.crt`,
//!   `.gitconfig`). Names select providers; only the username/password/token
//!   contents are interpreted.
//! - **Providers (`auth`)**: one implementation of the [`auth::ScmAuth`]
//!   trait per kind of secret.
//! - **Context (`context`)**: the conflict-checked variables and override
//!   URL shared by all providers during one pass.
//! - **Config chain (`include`)**: a single git config file of `include`
//!   directives that providers extend without overwriting each other.
//! - **Dispatcher (`dispatch`)**: selects providers from the directory
//!   listing and runs them in priority order.
//!
//! Generated files (the SSH wrapper, credential store, config fragments and
//! chain home) are never deleted by this library. The caller scopes their
//! lifetime to the git invocation that follows, for instance by passing a
//! dedicated scratch directory to [`dispatch::setup_with_scratch_dir`].

pub mod auth;
pub mod context;
pub mod defaults;
pub mod dispatch;
pub mod error;
pub mod git;
pub mod include;
pub mod output;

#[cfg(test)]
mod context_proptest;
