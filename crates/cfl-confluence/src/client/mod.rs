//! Confluence REST API client.
//!
//! Provides a sync HTTP client for the Confluence REST API with bearer-token
//! authentication, retry with exponential backoff on transient failures and
//! typed error mapping.

mod browse;
mod executor;
mod labels;
mod pages;
mod spaces;
mod transport;

use std::time::Duration;

pub use executor::RetryPolicy;
pub(crate) use executor::{Request, encode};
pub use pages::{DEFAULT_EXPAND, NewPage, PageUpdate};
pub use transport::{HttpRequest, HttpResponse, Method, Transport, UreqTransport};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 15;

/// Default number of retries after the first attempt.
const DEFAULT_RETRIES: u32 = 3;

/// Default backoff base in milliseconds.
const DEFAULT_BACKOFF_MS: u64 = 500;

/// Per-client network settings.
#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    /// Global timeout of a single HTTP exchange.
    pub timeout: Duration,
    /// Retries after the first attempt for network failures and transient statuses.
    pub retries: u32,
    /// Backoff base; attempt `n` waits `backoff * 2^(n-1)`.
    pub backoff: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            retries: DEFAULT_RETRIES,
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
        }
    }
}

/// Confluence REST API client.
pub struct ConfluenceClient {
    transport: Box<dyn Transport>,
    base_url: String,
    authorization: String,
    retry: RetryPolicy,
}

impl ConfluenceClient {
    /// Create a client for `base_url` authenticating with a personal access token.
    #[must_use]
    pub fn new(base_url: &str, token: &str, options: ClientOptions) -> Self {
        let transport = UreqTransport::new(options.timeout);
        Self::with_transport(base_url, token, options, Box::new(transport))
    }

    /// Create a client over a custom [`Transport`].
    #[must_use]
    pub fn with_transport(
        base_url: &str,
        token: &str,
        options: ClientOptions,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_owned(),
            authorization: format!("Bearer {token}"),
            retry: RetryPolicy {
                retries: options.retries,
                backoff: options.backoff,
            },
        }
    }

    /// Get the base URL (without trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the retry policy.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }
}

/// Clamp a page size to the range accepted by the API.
pub(crate) fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, 100)
}
