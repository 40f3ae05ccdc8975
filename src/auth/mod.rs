//! # SCM Auth Providers
//!
//! Each provider turns one kind of mounted secret into configuration that a
//! downstream `git` process picks up on its own. Providers share a small
//! capability set, the [`ScmAuth`] trait:
//!
//! - **`name`**: a stable identifier, used to de-duplicate selection and to
//!   attribute errors.
//! - **`handles`**: whether a secret file name is relevant to the provider.
//! - **`setup`**: reads the provider's secret files, decides whether it
//!   applies to the source URL, and records its results in the [`Context`].
//!
//! The four concrete providers live in submodules:
//!
//! | Provider | Watches | Applies to |
//! |---|---|---|
//! | [`SshPrivateKey`] | `ssh-privatekey` | every URL |
//! | [`UsernamePassword`] | `username`, `password`, `token` | `http`/`https` |
//! | [`CaCert`] | `ca.crt` | `https` |
//! | [`GitConfig`] | `.gitconfig` | every URL |

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use url::Url;

use crate::context::Context;
use crate::error::Result;

pub mod ca_cert;
pub mod gitconfig;
pub mod password;
pub mod ssh_key;

pub use ca_cert::CaCert;
pub use gitconfig::GitConfig;
pub use password::UsernamePassword;
pub use ssh_key::SshPrivateKey;

/// Secret file holding an SSH private key.
pub const SSH_PRIVATE_KEY: &str = "ssh-privatekey";
/// Secret file holding a username.
pub const USERNAME: &str = "username";
/// Secret file holding a password.
pub const PASSWORD: &str = "password";
/// Secret file holding a token; takes precedence over `password`.
pub const TOKEN: &str = "token";
/// Secret file holding a PEM CA bundle.
pub const CA_CERT: &str = "ca.crt";
/// Secret file holding raw git configuration.
pub const GIT_CONFIG_FILE: &str = ".gitconfig";

/// Capability set shared by all credential providers.
pub trait ScmAuth: Send + Sync {
    /// Stable provider identifier.
    fn name(&self) -> &str;

    /// Returns true if the secret file `name` belongs to this provider.
    fn handles(&self, name: &str) -> bool;

    /// Applies the provider using the secrets found under `base_dir`.
    ///
    /// A provider that decides it does not apply (for example because of the
    /// source URL scheme) returns `Ok(())` without touching `context`.
    fn setup(&self, base_dir: &Path, context: &mut Context) -> Result<()>;
}

/// Returns true for `http`/`https` URLs that can carry credentials.
pub(crate) fn is_http_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base()
}

/// Reads the first line of the secret file `name` in `base_dir`.
///
/// A missing file or an empty file reads as the empty string. Bytes that are
/// not valid UTF-8 are replaced with U+FFFD.
pub(crate) fn read_secret_line(base_dir: &Path, name: &str) -> Result<String> {
    match fs::read(base_dir.join(name)) {
        Ok(content) => {
            let line = content.split(|b| *b == b'\n').next().unwrap_or_default();
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            Ok(String::from_utf8_lossy(line).into_owned())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

/// Absolute path of the secret file `name` in `base_dir`.
pub(crate) fn secret_path(base_dir: &Path, name: &str) -> Result<PathBuf> {
    Ok(std::path::absolute(base_dir.join(name))?)
}

/// Creates a file with `contents` in the context's scratch directory and
/// keeps it on disk. On Unix the file is only readable by its owner.
pub(crate) fn write_scratch_file(
    context: &Context,
    prefix: &str,
    contents: &str,
) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix(prefix)
        .tempfile_in(context.scratch_dir())?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    let (_, path) = file.keep().map_err(|e| e.error)?;
    log::debug!("Wrote {}", path.display());
    Ok(path)
}
