//! Client error types

use std::time::Duration;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Missing, expired, malformed or rejected token
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Server rejected the request payload
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Client-side deadline elapsed before the exchange completed
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Invalid client or request configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Any other non-2xx status
    #[error("Server error {status}: {message}")]
    UnknownServerError { status: u16, message: String },

    /// Network or transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response payload did not match the expected shape
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input rejected locally, nothing was sent
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Signed-in account is not allowed on the admin portal
    #[error("Role not permitted: {0}")]
    RoleNotPermitted(String),
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 | 403 => Self::Unauthenticated(message),
            _ => Self::UnknownServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether this error means the session can no longer be used
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }

    /// Status code carried by server-classified errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::UnknownServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_transport(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Request(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn auth_statuses_are_unauthenticated() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = ClientError::from_status(status, "nope".into());
            assert!(err.is_auth_expired());
        }
    }

    #[test]
    fn other_statuses_keep_their_code() {
        let err = ClientError::from_status(StatusCode::BAD_REQUEST, String::new());
        assert!(matches!(err, ClientError::BadRequest(_)));
        assert_eq!(err.status(), Some(400));

        let err = ClientError::from_status(StatusCode::NOT_FOUND, String::new());
        assert_eq!(err.status(), Some(404));

        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, "upstream".into());
        assert!(matches!(
            err,
            ClientError::UnknownServerError { status: 502, .. }
        ));
    }
}
