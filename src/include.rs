//! # Chained Git Configuration
//!
//! Several providers need to hand git a configuration fragment. Rather than
//! merging fragments into one file, each provider writes its own fragment and
//! calls [`ensure_git_config_includes`], which maintains a single chain file
//! of `include` directives:
//!
//! ```text
//! [include]
//! path = /tmp/gitcacertXXXX
//! path = /tmp/gitcredentialscfgXXXX
//! ```
//!
//! The chain file lives in a fresh directory that is also exported as `HOME`,
//! so git finds it both through `GIT_CONFIG` and as `~/.gitconfig`. The file
//! is append-only and a given path is only ever included once.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::context::Context;
use crate::error::Result;

/// Context variable holding the chain file path.
pub const GIT_CONFIG_VAR: &str = "GIT_CONFIG";
/// Context variable holding the directory that contains the chain file.
pub const HOME_VAR: &str = "HOME";

const CHAIN_FILE_NAME: &str = ".gitconfig";

fn include_line(path: &Path) -> String {
    format!("path = {}", path.display())
}

/// Adds an include of `path` to the chain file recorded in `context`,
/// creating the chain file on first use.
pub fn ensure_git_config_includes(path: &Path, context: &mut Context) -> Result<()> {
    let line = include_line(path);

    let Some(chain_file) = context.get(GIT_CONFIG_VAR).map(PathBuf::from) else {
        let home = tempfile::Builder::new()
            .prefix("git")
            .tempdir_in(context.scratch_dir())?
            .keep();
        let chain_file = home.join(CHAIN_FILE_NAME);
        write_private(&chain_file, &format!("[include]\n{}\n", line))?;
        debug!(
            "Created git config chain {} including {}",
            chain_file.display(),
            path.display()
        );

        context.set(GIT_CONFIG_VAR, &chain_file.to_string_lossy())?;
        context.set(HOME_VAR, &home.to_string_lossy())?;
        return Ok(());
    };

    let content = fs::read_to_string(&chain_file)?;
    let mut lines: Vec<&str> = content.lines().collect();
    if lines.iter().any(|existing| existing.trim() == line) {
        return Ok(());
    }

    lines.push(line.as_str());
    write_private(&chain_file, &format!("{}\n", lines.join("\n")))?;
    debug!(
        "Appended {} to git config chain {}",
        path.display(),
        chain_file.display()
    );
    Ok(())
}

/// Writes `contents` to `path`, owner-only on Unix.
fn write_private(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

/// Returns the paths included by the chain file at `chain_file`, in order.
pub fn included_paths(chain_file: &Path) -> Result<Vec<PathBuf>> {
    let content = fs::read_to_string(chain_file)?;
    Ok(content
        .lines()
        .filter_map(|line| line.trim().strip_prefix("path = "))
        .map(PathBuf::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn chain_file(context: &Context) -> PathBuf {
        PathBuf::from(context.get(GIT_CONFIG_VAR).unwrap())
    }

    #[test]
    fn test_first_include_creates_chain() {
        let scratch = TempDir::new().unwrap();
        let mut context = Context::with_scratch_dir(scratch.path());

        ensure_git_config_includes(Path::new("/secrets/.gitconfig"), &mut context).unwrap();

        let chain = chain_file(&context);
        assert!(chain.starts_with(scratch.path()));
        assert_eq!(
            fs::read_to_string(&chain).unwrap(),
            "[include]\npath = /secrets/.gitconfig\n"
        );

        let home = PathBuf::from(context.get(HOME_VAR).unwrap());
        assert_eq!(chain.parent().unwrap(), home);
        assert!(home.is_dir());
    }

    #[test]
    fn test_second_include_appends() {
        let scratch = TempDir::new().unwrap();
        let mut context = Context::with_scratch_dir(scratch.path());

        ensure_git_config_includes(Path::new("/tmp/a"), &mut context).unwrap();
        ensure_git_config_includes(Path::new("/tmp/b"), &mut context).unwrap();

        assert_eq!(
            fs::read_to_string(chain_file(&context)).unwrap(),
            "[include]\npath = /tmp/a\npath = /tmp/b\n"
        );
        assert_eq!(
            included_paths(&chain_file(&context)).unwrap(),
            vec![PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b")]
        );
    }

    #[test]
    fn test_same_include_twice_written_once() {
        let scratch = TempDir::new().unwrap();
        let mut context = Context::with_scratch_dir(scratch.path());

        ensure_git_config_includes(Path::new("/tmp/a"), &mut context).unwrap();
        ensure_git_config_includes(Path::new("/tmp/b"), &mut context).unwrap();
        ensure_git_config_includes(Path::new("/tmp/a"), &mut context).unwrap();

        let content = fs::read_to_string(chain_file(&context)).unwrap();
        assert_eq!(content.matches("path = /tmp/a").count(), 1);
        assert_eq!(content.matches("path = ").count(), 2);
    }

    #[test]
    fn test_chain_reuses_single_home() {
        let scratch = TempDir::new().unwrap();
        let mut context = Context::with_scratch_dir(scratch.path());

        ensure_git_config_includes(Path::new("/tmp/a"), &mut context).unwrap();
        ensure_git_config_includes(Path::new("/tmp/b"), &mut context).unwrap();

        let homes = fs::read_dir(scratch.path()).unwrap().count();
        assert_eq!(homes, 1);
        assert_eq!(context.env().len(), 2);
    }

    #[test]
    fn test_missing_chain_file_is_an_error() {
        let scratch = TempDir::new().unwrap();
        let mut context = Context::with_scratch_dir(scratch.path());
        context
            .set(GIT_CONFIG_VAR, &scratch.path().join("gone").to_string_lossy())
            .unwrap();

        assert!(ensure_git_config_includes(Path::new("/tmp/a"), &mut context).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_chain_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let scratch = TempDir::new().unwrap();
        let mut context = Context::with_scratch_dir(scratch.path());
        ensure_git_config_includes(Path::new("/tmp/a"), &mut context).unwrap();

        let mode = fs::metadata(chain_file(&context))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
