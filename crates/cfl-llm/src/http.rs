//! JSON POST shared by both providers.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;
use ureq::Agent;

use crate::LlmError;

/// Agent that reports HTTP error statuses as responses.
pub(crate) fn agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// POST `body` as JSON and return the response text of a 2xx answer.
pub(crate) fn post_json<T: Serialize>(
    agent: &Agent,
    provider: &'static str,
    url: &str,
    bearer: Option<&str>,
    body: &T,
) -> Result<String, LlmError> {
    let payload = serde_json::to_vec(body)?;
    debug!("POST {url} ({} bytes)", payload.len());

    let mut request = agent
        .post(url)
        .header("Content-Type", "application/json")
        .header("Accept", "application/json");
    if let Some(token) = bearer {
        request = request.header("Authorization", &format!("Bearer {token}"));
    }
    let response = request.send(&payload[..])?;

    let status = response.status().as_u16();
    let text = response.into_body().read_to_string()?;
    if (200..300).contains(&status) {
        Ok(text)
    } else {
        Err(LlmError::Status {
            provider,
            status,
            body: text.trim().to_owned(),
        })
    }
}
