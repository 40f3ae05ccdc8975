//! Username, password and token provider.
//!
//! Credentials are resolved per field, first match wins:
//!
//! - username: `username` secret, then the URL's userinfo username, then
//!   [`DEFAULT_USERNAME`] when a password is needed but no username is known.
//! - password: `token` secret, then `password` secret, then the URL's
//!   userinfo password.
//!
//! When no secret supplies a value, or the resolved password is empty and
//! the username is the URL's own, the provider leaves everything untouched.
//! Otherwise the credentials are moved
//! out of the URL and into a git credential store: the context receives the
//! source URL with its userinfo stripped as the override URL, and a
//! `[credential]` fragment pointing at a store file with the
//! credential-bearing URL is chained into the git configuration.

use std::path::Path;

use log::debug;
use url::Url;

use super::{
    is_http_url, read_secret_line, write_scratch_file, ScmAuth, PASSWORD, TOKEN, USERNAME,
};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::include::ensure_git_config_includes;

/// Username used when only a password or token is available.
pub const DEFAULT_USERNAME: &str = "builder";

/// Credential helper configuration for username/password/token secrets.
#[derive(Debug, Clone)]
pub struct UsernamePassword {
    source_url: Url,
}

/// Result of resolving credentials against a source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredentials {
    /// Source URL without any userinfo.
    pub override_url: Url,
    /// Source URL carrying the resolved username and password.
    pub config_url: Url,
}

impl UsernamePassword {
    pub fn new(source_url: Url) -> Self {
        Self { source_url }
    }

    /// Resolves credentials from the secrets in `base_dir`.
    ///
    /// Returns `None` when there is nothing to inject: the source URL is not
    /// eligible, no secret file supplied a value, or the resolved password is
    /// empty and the username is unchanged.
    pub fn resolve(&self, base_dir: &Path) -> Result<Option<ResolvedCredentials>> {
        if !is_http_url(&self.source_url) {
            return Ok(None);
        }

        let url_username = self.source_url.username();
        let url_password = self.source_url.password().unwrap_or_default();

        let secret_username = read_secret_line(base_dir, USERNAME)?;
        let mut secret_password = read_secret_line(base_dir, TOKEN)?;
        if secret_password.is_empty() {
            secret_password = read_secret_line(base_dir, PASSWORD)?;
        }
        if secret_username.is_empty() && secret_password.is_empty() {
            return Ok(None);
        }

        let mut username = secret_username;
        if username.is_empty() {
            username = url_username.to_string();
        }
        let mut password = secret_password;
        if password.is_empty() {
            password = url_password.to_string();
        }

        if password.is_empty() && username == url_username {
            return Ok(None);
        }
        if username.is_empty() {
            username = DEFAULT_USERNAME.to_string();
        }

        let mut override_url = self.source_url.clone();
        set_userinfo(&mut override_url, "", None)?;

        let mut config_url = override_url.clone();
        set_userinfo(&mut config_url, &username, Some(&password))?;

        Ok(Some(ResolvedCredentials {
            override_url,
            config_url,
        }))
    }
}

fn set_userinfo(url: &mut Url, username: &str, password: Option<&str>) -> Result<()> {
    let invalid = |url: &Url| Error::InvalidUrl {
        url: url.origin().ascii_serialization(),
        message: "URL cannot carry credentials".to_string(),
    };
    url.set_username(username).map_err(|_| invalid(url))?;
    url.set_password(password).map_err(|_| invalid(url))?;
    Ok(())
}

fn credential_helper_config(store: &Path) -> String {
    format!("[credential]\n   helper = store --file={}\n", store.display())
}

impl ScmAuth for UsernamePassword {
    fn name(&self) -> &str {
        PASSWORD
    }

    fn handles(&self, name: &str) -> bool {
        matches!(name, USERNAME | PASSWORD | TOKEN)
    }

    fn setup(&self, base_dir: &Path, context: &mut Context) -> Result<()> {
        let Some(credentials) = self.resolve(base_dir)? else {
            debug!(
                "No credentials to configure for {} source",
                self.source_url.scheme()
            );
            return Ok(());
        };

        let store = write_scratch_file(
            context,
            "gitcredentials",
            &format!("{}\n", credentials.config_url),
        )?;
        let config = write_scratch_file(
            context,
            "gitcredentialscfg",
            &credential_helper_config(&store),
        )?;

        context.set_override_url(credentials.override_url)?;
        ensure_git_config_includes(&config, context)
    }
}
