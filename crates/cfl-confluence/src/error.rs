//! Error types for Confluence API operations.

use std::fmt;

/// Error class derived from an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 401/403 authentication or authorization failure.
    Auth,
    /// 404 resource not found (space, page, parent).
    NotFound,
    /// 409 conflict, e.g. duplicate title or stale version.
    Conflict,
    /// 429 rate limit exceeded.
    RateLimited,
    /// 5xx server-side error.
    Server,
    /// Any other 4xx rejection.
    Validation,
}

impl ErrorKind {
    /// Map an HTTP status code to its error class.
    ///
    /// Returns `None` for statuses below 400, which are not failures.
    #[must_use]
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            401 | 403 => Some(Self::Auth),
            404 => Some(Self::NotFound),
            409 => Some(Self::Conflict),
            429 => Some(Self::RateLimited),
            500..=599 => Some(Self::Server),
            400..=499 => Some(Self::Validation),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Auth => "authentication failed",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::RateLimited => "rate limited",
            Self::Server => "server error",
            Self::Validation => "request rejected",
        };
        f.write_str(label)
    }
}

/// Error from Confluence API operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
    /// HTTP request failed before a response arrived (DNS, connect, timeout).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// Server answered with a failure status.
    #[error("{kind} ({status}): {detail}")]
    Api {
        /// Error class of the status.
        kind: ErrorKind,
        /// HTTP status code.
        status: u16,
        /// Request description plus any message from the response payload.
        detail: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Status outside the expected set that maps to no error class (1xx/3xx).
    #[error("unexpected HTTP status {status}: {detail}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Request description.
        detail: String,
    },
}

impl ConfluenceError {
    /// Build the error for a failure status, pulling detail text out of the payload.
    ///
    /// `description` names the request (e.g. `"GET https://host/rest/api/content"`);
    /// the payload's `message` (or `title`) and `reason` fields are appended.
    #[must_use]
    pub fn from_status(status: u16, description: &str, payload: &serde_json::Value) -> Self {
        let title = payload
            .get("message")
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .or_else(|| payload.get("title").and_then(serde_json::Value::as_str))
            .unwrap_or("");
        let reason = payload
            .get("reason")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("");

        let detail = format!("{description} {title} {reason}").trim().to_owned();

        match ErrorKind::from_status(status) {
            Some(kind) => Self::Api {
                kind,
                status,
                detail,
            },
            None => Self::UnexpectedStatus { status, detail },
        }
    }

    /// Error class of an API failure, `None` for transport and decoding errors.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Whether the server rejected the request as a conflict (HTTP 409).
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.kind() == Some(ErrorKind::Conflict)
    }

    /// Whether the server reported the resource as missing (HTTP 404).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorKind::from_status(401), Some(ErrorKind::Auth));
        assert_eq!(ErrorKind::from_status(403), Some(ErrorKind::Auth));
        assert_eq!(ErrorKind::from_status(404), Some(ErrorKind::NotFound));
        assert_eq!(ErrorKind::from_status(409), Some(ErrorKind::Conflict));
        assert_eq!(ErrorKind::from_status(429), Some(ErrorKind::RateLimited));
        assert_eq!(ErrorKind::from_status(500), Some(ErrorKind::Server));
        assert_eq!(ErrorKind::from_status(503), Some(ErrorKind::Server));
        assert_eq!(ErrorKind::from_status(599), Some(ErrorKind::Server));
        assert_eq!(ErrorKind::from_status(400), Some(ErrorKind::Validation));
        assert_eq!(ErrorKind::from_status(422), Some(ErrorKind::Validation));
        assert_eq!(ErrorKind::from_status(200), None);
        assert_eq!(ErrorKind::from_status(302), None);
    }

    #[test]
    fn test_detail_includes_payload_message_and_reason() {
        let payload = json!({"message": "Title already exists", "reason": "Conflict"});
        let err = ConfluenceError::from_status(409, "POST https://x/rest/api/content", &payload);

        assert!(err.is_conflict());
        assert_eq!(
            err.to_string(),
            "conflict (409): POST https://x/rest/api/content Title already exists Conflict"
        );
    }

    #[test]
    fn test_detail_falls_back_to_title() {
        let payload = json!({"title": "No space with key"});
        let err = ConfluenceError::from_status(404, "GET https://x/rest/api/space/NOPE", &payload);

        assert!(err.is_not_found());
        assert!(err.to_string().ends_with("No space with key"));
    }

    #[test]
    fn test_detail_without_payload() {
        let err = ConfluenceError::from_status(403, "GET https://x/p", &serde_json::Value::Null);

        assert_eq!(err.kind(), Some(ErrorKind::Auth));
        assert_eq!(err.to_string(), "authentication failed (403): GET https://x/p");
    }
}
