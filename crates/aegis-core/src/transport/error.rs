//! Normalized request error: the single failure shape the retry classifier
//! consumes.

use serde_json::Value;
use thiserror::Error;

/// Failure of a backend request, normalized to a numeric status (when the
/// backend produced one) plus a human-readable message.
///
/// Transport-level failures (connection refused, timeout) have no status;
/// classification then falls back to message inspection.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RequestError {
    /// HTTP status code, if the request reached the backend.
    pub status: Option<u16>,
    pub message: String,
}

impl RequestError {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Builds an error from a non-2xx response body, preferring the backend's
    /// own `error`/`message` field over a generic status line.
    pub fn from_response(status: u16, body: &Value) -> Self {
        let message = body
            .get("error")
            .or_else(|| body.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {status}"));
        Self {
            status: Some(status),
            message,
        }
    }
}
