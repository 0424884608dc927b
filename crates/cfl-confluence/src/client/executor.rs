//! Request executor: one logical API call with bounded retries.

use std::fmt::Display;
use std::thread;
use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::ConfluenceClient;
use super::transport::{HttpRequest, HttpResponse, Method};
use crate::error::ConfluenceError;

/// Characters left unescaped in query values and path segments (RFC 3986 unreserved).
const ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Statuses retried automatically while the budget lasts.
const TRANSIENT_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Default statuses treated as success.
const DEFAULT_EXPECTED: &[u16] = &[200, 201];

/// Percent-encode a path segment or query value.
pub(crate) fn encode(value: &str) -> String {
    utf8_percent_encode(value, ENCODE_SET).to_string()
}

/// Retry budget and backoff base of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retries: u32,
    /// Base delay; attempt `n` waits `backoff * 2^(n-1)`.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Exponential backoff after the given (1-based) attempt.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.backoff.saturating_mul(factor)
    }

    /// Delay before retrying a transient status.
    ///
    /// A numeric `Retry-After` (seconds) wins; anything else, including the
    /// HTTP-date form, falls back to [`backoff_delay`](Self::backoff_delay).
    #[must_use]
    pub fn delay(&self, attempt: u32, retry_after: Option<&str>) -> Duration {
        retry_after
            .and_then(|value| value.trim().parse::<f64>().ok())
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or_else(|| self.backoff_delay(attempt))
    }
}

/// One logical API call.
#[derive(Debug)]
pub(crate) struct Request {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    json: Option<Value>,
    expected: &'static [u16],
}

impl Request {
    fn new(method: Method, path: impl Into<String>, json: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            json,
            expected: DEFAULT_EXPECTED,
        }
    }

    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path, None)
    }

    pub(crate) fn post(path: impl Into<String>, json: Value) -> Self {
        Self::new(Method::Post, path, Some(json))
    }

    pub(crate) fn put(path: impl Into<String>, json: Value) -> Self {
        Self::new(Method::Put, path, Some(json))
    }

    /// Append a query parameter.
    #[must_use]
    pub(crate) fn query(mut self, key: &'static str, value: impl Display) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Replace the set of statuses treated as success.
    #[must_use]
    pub(crate) fn expect(mut self, statuses: &'static [u16]) -> Self {
        self.expected = statuses;
        self
    }
}

impl ConfluenceClient {
    /// Absolute URL for an API path plus encoded query string.
    fn url(&self, path: &str, query: &[(&'static str, String)]) -> String {
        let mut url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };

        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&encode(value));
        }
        url
    }

    /// Execute a request, retrying network failures and transient statuses.
    ///
    /// Only idempotent methods are retried; a POST gets exactly one attempt.
    /// On success the body is parsed as JSON, or wrapped as
    /// `{"raw": <text>, "status": <code>}` when it is not JSON.
    pub(crate) fn execute(&self, request: Request) -> Result<Value, ConfluenceError> {
        let url = self.url(&request.path, &request.query);
        let body = request.json.as_ref().map(serde_json::to_vec).transpose()?;
        let http = HttpRequest {
            method: request.method,
            url: &url,
            authorization: &self.authorization,
            body: body.as_deref(),
        };

        let budget = if request.method.is_idempotent() {
            self.retry.retries
        } else {
            0
        };

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let can_retry = attempt <= budget;
            debug!("{} {} (attempt {})", request.method, url, attempt);

            let response = match self.transport.send(&http) {
                Ok(response) => response,
                Err(err) if can_retry => {
                    let delay = self.retry.backoff_delay(attempt);
                    warn!(
                        "retrying {} {} in {:?} ({})",
                        request.method, url, delay, err
                    );
                    thread::sleep(delay);
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            if request.expected.contains(&response.status) {
                return Ok(parse_success(response));
            }

            if TRANSIENT_STATUSES.contains(&response.status) && can_retry {
                let delay = self
                    .retry
                    .delay(attempt, response.retry_after.as_deref());
                warn!(
                    "retrying {} {} in {:?} (status {})",
                    request.method, url, delay, response.status
                );
                thread::sleep(delay);
                continue;
            }

            let payload = serde_json::from_str(&response.body).unwrap_or(Value::Null);
            return Err(ConfluenceError::from_status(
                response.status,
                &format!("{} {}", request.method, url),
                &payload,
            ));
        }
    }
}

fn parse_success(response: HttpResponse) -> Value {
    match serde_json::from_str(&response.body) {
        Ok(value) => value,
        Err(_) => json!({"raw": response.body, "status": response.status}),
    }
}
