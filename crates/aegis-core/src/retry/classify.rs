//! Classify normalized request errors into retry policy error classes.
//!
//! Status codes win when present. Message inspection is a best-effort
//! fallback only: upstream error wording is not a stable contract, so the
//! indicator lists below stay short and conservative.

use crate::transport::RequestError;

/// High-level classification of a request failure for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 4xx other than auth: the request itself is wrong, retrying cannot help.
    Client,
    /// 5xx: the backend failed, worth retrying.
    Server,
    /// 401/403 by status, or auth wording by message. Never retried, even
    /// without a status code, so a credential problem is not masked as a
    /// transient fault.
    Auth,
    /// Connection refused, timeout, generic fetch failure. Retryable.
    Network,
    /// No status and no recognizable message. Treated as transient.
    Unknown,
}

/// Substrings (lower-cased) that mark an error as an auth failure.
const AUTH_INDICATORS: &[&str] = &[
    "401",
    "403",
    "unauthorized",
    "forbidden",
    "authentication",
    "permission denied",
];

/// Substrings (lower-cased) that mark an error as a network-level failure.
const NETWORK_INDICATORS: &[&str] = &["network", "timeout", "econnrefused", "fetch failed"];

/// Classify a request error into an [`ErrorClass`].
pub fn classify(err: &RequestError) -> ErrorClass {
    if let Some(status) = err.status {
        return match status {
            401 | 403 => ErrorClass::Auth,
            400..=499 => ErrorClass::Client,
            500..=u16::MAX => ErrorClass::Server,
            _ => ErrorClass::Unknown,
        };
    }

    let message = err.message.to_lowercase();
    if AUTH_INDICATORS.iter().any(|ind| message.contains(ind)) {
        return ErrorClass::Auth;
    }
    if NETWORK_INDICATORS.iter().any(|ind| message.contains(ind)) {
        return ErrorClass::Network;
    }
    ErrorClass::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_err(status: u16) -> RequestError {
        RequestError::with_status(status, format!("HTTP {status}"))
    }

    #[test]
    fn status_4xx_is_client() {
        assert_eq!(classify(&status_err(400)), ErrorClass::Client);
        assert_eq!(classify(&status_err(404)), ErrorClass::Client);
        assert_eq!(classify(&status_err(429)), ErrorClass::Client);
    }

    #[test]
    fn status_401_403_is_auth() {
        assert_eq!(classify(&status_err(401)), ErrorClass::Auth);
        assert_eq!(classify(&status_err(403)), ErrorClass::Auth);
    }

    #[test]
    fn status_5xx_is_server() {
        assert_eq!(classify(&status_err(500)), ErrorClass::Server);
        assert_eq!(classify(&status_err(503)), ErrorClass::Server);
    }

    #[test]
    fn message_auth_indicators_without_status() {
        for msg in [
            "403 Forbidden",
            "Unauthorized request",
            "authentication required",
            "Permission Denied by policy",
        ] {
            assert_eq!(
                classify(&RequestError::message(msg)),
                ErrorClass::Auth,
                "{msg}"
            );
        }
    }

    #[test]
    fn message_network_indicators_without_status() {
        for msg in [
            "Network timeout occurred",
            "connect ECONNREFUSED 127.0.0.1:443",
            "fetch failed",
        ] {
            assert_eq!(
                classify(&RequestError::message(msg)),
                ErrorClass::Network,
                "{msg}"
            );
        }
    }

    #[test]
    fn unrecognized_message_is_unknown() {
        assert_eq!(
            classify(&RequestError::message("something odd happened")),
            ErrorClass::Unknown
        );
    }
}
