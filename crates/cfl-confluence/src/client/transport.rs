//! HTTP transport seam.
//!
//! The executor talks to the network only through [`Transport`], so retry
//! and status handling can be driven by scripted responses in tests.

use std::fmt;
use std::time::Duration;

use ureq::Agent;
use ureq::http::Response;

/// HTTP method used by the Confluence REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    /// Method name as sent on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }

    /// Whether replaying the request cannot duplicate its effect.
    ///
    /// PUT on content carries an explicit version number, so a replay of an
    /// already-applied write is rejected by the server instead of applied twice.
    #[must_use]
    pub fn is_idempotent(self) -> bool {
        matches!(self, Self::Get | Self::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved request handed to a [`Transport`].
#[derive(Debug)]
pub struct HttpRequest<'a> {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including the encoded query string.
    pub url: &'a str,
    /// Value of the `Authorization` header.
    pub authorization: &'a str,
    /// JSON body, if any.
    pub body: Option<&'a [u8]>,
}

/// Completed HTTP exchange, whatever its status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw `Retry-After` header value.
    pub retry_after: Option<String>,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Response with a status and body, without a `Retry-After` header.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }

    /// Set the `Retry-After` header value.
    #[must_use]
    pub fn with_retry_after(mut self, value: impl Into<String>) -> Self {
        self.retry_after = Some(value.into());
        self
    }
}

/// Sends one HTTP request and returns the response, whatever its status.
///
/// Implementations must not treat HTTP error statuses as errors: only
/// failures where no response was received (connect, DNS, timeout, broken
/// body) are returned as `Err`.
pub trait Transport {
    /// Perform the request.
    fn send(&self, request: &HttpRequest<'_>) -> Result<HttpResponse, ureq::Error>;
}

/// [`Transport`] backed by a blocking `ureq` agent.
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Create a transport whose requests time out after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent }
    }

    fn read(response: Response<ureq::Body>) -> Result<HttpResponse, ureq::Error> {
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.into_body().read_to_string()?;

        Ok(HttpResponse {
            status,
            retry_after,
            body,
        })
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest<'_>) -> Result<HttpResponse, ureq::Error> {
        let body = request.body.unwrap_or_default();

        let response = match request.method {
            Method::Get => self
                .agent
                .get(request.url)
                .header("Authorization", request.authorization)
                .header("Accept", "application/json")
                .call()?,
            Method::Post => self
                .agent
                .post(request.url)
                .header("Authorization", request.authorization)
                .header("Content-Type", "application/json")
                .header("Accept", "application/json")
                .send(body)?,
            Method::Put => self
                .agent
                .put(request.url)
                .header("Authorization", request.authorization)
                .header("Content-Type", "application/json")
                .header("Accept", "application/json")
                .send(body)?,
        };

        Self::read(response)
    }
}
