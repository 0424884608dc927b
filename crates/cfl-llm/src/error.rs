/// LLM client error.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Missing or invalid provider settings.
    #[error("LLM configuration error: {0}")]
    Config(String),

    /// Network failure, timeout or unreadable response.
    #[error("LLM request failed: {0}")]
    Http(#[from] ureq::Error),

    /// The server answered with a non-success status.
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        /// Provider name.
        provider: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, trimmed.
        body: String,
    },

    /// Response body is not the expected JSON.
    #[error("invalid LLM response: {0}")]
    Json(#[from] serde_json::Error),

    /// The response carried no assistant message.
    #[error("{0} returned no message content")]
    EmptyReply(&'static str),
}
