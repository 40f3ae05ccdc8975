//! Raw `.gitconfig` provider: includes the mounted file as-is.

use std::path::Path;

use super::{secret_path, ScmAuth, GIT_CONFIG_FILE};
use crate::context::Context;
use crate::error::Result;
use crate::include::ensure_git_config_includes;

/// Chains a user supplied `.gitconfig` secret into the git configuration.
#[derive(Debug, Clone, Default)]
pub struct GitConfig;

impl GitConfig {
    pub fn new() -> Self {
        Self
    }
}

impl ScmAuth for GitConfig {
    fn name(&self) -> &str {
        GIT_CONFIG_FILE
    }

    fn handles(&self, name: &str) -> bool {
        name == GIT_CONFIG_FILE
    }

    fn setup(&self, base_dir: &Path, context: &mut Context) -> Result<()> {
        let config = secret_path(base_dir, GIT_CONFIG_FILE)?;
        ensure_git_config_includes(&config, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::include::{included_paths, GIT_CONFIG_VAR, HOME_VAR};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_handles_gitconfig() {
        let auth = GitConfig::new();
        assert_eq!(auth.name(), ".gitconfig");
        assert!(auth.handles(".gitconfig"));
        assert!(!auth.handles("gitconfig"));
    }

    #[test]
    fn test_setup_includes_secret_file_directly() {
        let secrets = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        fs::write(
            secrets.path().join(GIT_CONFIG_FILE),
            "[user]\n  name = builder\n",
        )
        .unwrap();
        let mut context = Context::with_scratch_dir(scratch.path());

        GitConfig::new().setup(secrets.path(), &mut context).unwrap();
        // Running twice keeps a single include
        GitConfig::new().setup(secrets.path(), &mut context).unwrap();

        let chain = PathBuf::from(context.get(GIT_CONFIG_VAR).unwrap());
        assert_eq!(
            included_paths(&chain).unwrap(),
            vec![secrets.path().join(GIT_CONFIG_FILE)]
        );
        assert!(context.get(HOME_VAR).is_some());
        assert_eq!(
            fs::read_to_string(secrets.path().join(GIT_CONFIG_FILE)).unwrap(),
            "[user]\n  name = builder\n"
        );
    }
}
