//! SSH private key provider.
//!
//! Generates a small wrapper around the system `ssh` client that always uses
//! the mounted key and skips host key verification, then points git at it
//! through `GIT_SSH`.

use std::path::Path;

use log::debug;

use super::{secret_path, write_scratch_file, ScmAuth, SSH_PRIVATE_KEY};
use crate::context::Context;
use crate::error::Result;

/// Context variable git reads to find its SSH command.
pub const GIT_SSH_VAR: &str = "GIT_SSH";

/// Sets up `GIT_SSH` for an `ssh-privatekey` secret.
#[derive(Debug, Clone, Default)]
pub struct SshPrivateKey;

impl SshPrivateKey {
    pub fn new() -> Self {
        Self
    }
}

/// Quotes `value` for a POSIX shell.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn wrapper_script(key_path: &Path) -> String {
    format!(
        "#!/bin/sh\nssh -i {} -o StrictHostKeyChecking=false \"$@\"\n",
        shell_quote(&key_path.to_string_lossy())
    )
}

impl ScmAuth for SshPrivateKey {
    fn name(&self) -> &str {
        SSH_PRIVATE_KEY
    }

    fn handles(&self, name: &str) -> bool {
        name == SSH_PRIVATE_KEY
    }

    fn setup(&self, base_dir: &Path, context: &mut Context) -> Result<()> {
        let key_path = secret_path(base_dir, SSH_PRIVATE_KEY)?;
        let script = write_scratch_file(context, "gitssh", &wrapper_script(&key_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o700))?;
        }

        debug!(
            "Using SSH key {} through wrapper {}",
            key_path.display(),
            script.display()
        );
        context.set(GIT_SSH_VAR, &script.to_string_lossy())
    }
}
