//! CA certificate provider.
//!
//! Trusts the mounted `ca.crt` for `https` sources by chaining an
//! `[http] sslCAInfo` fragment into the git configuration.

use std::path::Path;

use log::debug;
use url::Url;

use super::{is_http_url, secret_path, write_scratch_file, ScmAuth, CA_CERT};
use crate::context::Context;
use crate::error::Result;
use crate::include::ensure_git_config_includes;

/// Adds a custom certificate authority for `https` sources.
#[derive(Debug, Clone)]
pub struct CaCert {
    source_url: Url,
}

impl CaCert {
    pub fn new(source_url: Url) -> Self {
        Self { source_url }
    }
}

fn ca_config(ca_file: &Path) -> String {
    format!("[http]\n   sslCAInfo = {}\n", ca_file.display())
}

impl ScmAuth for CaCert {
    fn name(&self) -> &str {
        CA_CERT
    }

    fn handles(&self, name: &str) -> bool {
        name == CA_CERT
    }

    fn setup(&self, base_dir: &Path, context: &mut Context) -> Result<()> {
        if self.source_url.scheme() != "https" || !is_http_url(&self.source_url) {
            debug!(
                "Ignoring {} for {} source",
                CA_CERT,
                self.source_url.scheme()
            );
            return Ok(());
        }

        let ca_file = secret_path(base_dir, CA_CERT)?;
        let config = write_scratch_file(context, "gitcacert", &ca_config(&ca_file))?;
        ensure_git_config_includes(&config, context)
    }
}
