//! State shared by all commands: profile, output, connection settings.

use std::cell::OnceCell;
use std::path::PathBuf;
use std::time::Duration;

use cfl_config::{LoadedProfile, Profile, ProfileStore, resolve_required};
use cfl_confluence::{ClientOptions, ConfluenceClient};
use clap::Args;
use tracing::debug;

use crate::error::CliError;
use crate::output::Output;

/// Global options resolved once in `main`.
pub(crate) struct Context {
    pub(crate) output: Output,
    pub(crate) json: bool,
    store: ProfileStore,
    profile_name: String,
    loaded: OnceCell<LoadedProfile>,
}

impl Context {
    pub(crate) fn new(
        config: Option<PathBuf>,
        profile: String,
        quiet: bool,
        json: bool,
    ) -> Self {
        Self {
            output: Output::new(quiet),
            json,
            store: ProfileStore::new(config.as_deref()),
            profile_name: profile,
            loaded: OnceCell::new(),
        }
    }

    pub(crate) fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub(crate) fn profile_name(&self) -> &str {
        &self.profile_name
    }

    /// Selected profile, loaded on first use.
    pub(crate) fn loaded(&self) -> Result<&LoadedProfile, CliError> {
        if let Some(loaded) = self.loaded.get() {
            return Ok(loaded);
        }
        let loaded = self.store.load(&self.profile_name)?;
        debug!(
            "Loaded profile [{}] from {} ({:?})",
            loaded.name,
            loaded.path.display(),
            loaded.source
        );
        Ok(self.loaded.get_or_init(|| loaded))
    }

    pub(crate) fn profile(&self) -> Result<&Profile, CliError> {
        Ok(&self.loaded()?.profile)
    }
}

/// Connection options shared by every command that talks to the API.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct ConnectionArgs {
    /// Base URL, e.g. <https://org.atlassian.net/wiki>.
    #[arg(long, env = "CONFLUENCE_BASE_URL")]
    pub(crate) base_url: Option<String>,

    /// Personal access token / API token.
    #[arg(long, env = "CONFLUENCE_PAT", hide_env_values = true)]
    pub(crate) pat: Option<String>,

    /// HTTP timeout in seconds (default: profile value or 15).
    #[arg(long)]
    pub(crate) timeout: Option<u64>,

    /// Retries on network errors and transient statuses (default: profile value or 3).
    #[arg(long)]
    pub(crate) retries: Option<u32>,
}

impl ConnectionArgs {
    /// Client options from flags, then profile, then defaults.
    pub(crate) fn options(&self, profile: &Profile) -> ClientOptions {
        let defaults = ClientOptions::default();
        ClientOptions {
            timeout: self
                .timeout
                .or(profile.timeout)
                .map_or(defaults.timeout, Duration::from_secs),
            retries: self.retries.or(profile.retries).unwrap_or(defaults.retries),
            ..defaults
        }
    }

    /// Build a client from flags and the selected profile.
    pub(crate) fn client(&self, ctx: &Context) -> Result<ConfluenceClient, CliError> {
        let profile = ctx.profile()?;
        let base_url =
            resolve_required("base_url", self.base_url.as_deref(), profile.base_url.as_deref())?;
        let pat = resolve_required("pat", self.pat.as_deref(), profile.pat.as_deref())?;
        Ok(ConfluenceClient::new(&base_url, &pat, self.options(profile)))
    }
}
