//! Error types for the nowplaying client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the job endpoints
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Endpoint returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Body returned with the error status
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The endpoint answered but refused the request (`{"error": ...}`)
    #[error("{0}")]
    Rejected(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }

    /// Message suitable for showing to a user
    ///
    /// Application-level rejections are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_predicates() {
        assert!(!ClientError::api_error(404, "missing").is_server_error());
        assert!(ClientError::api_error(502, "bad gateway").is_server_error());
        assert!(!ClientError::Rejected("bad user".into()).is_server_error());
    }

    #[test]
    fn test_rejection_message_is_verbatim() {
        assert_eq!(
            ClientError::Rejected("bad user".into()).user_message(),
            "bad user"
        );
        assert_eq!(
            ClientError::api_error(500, "oops").user_message(),
            "API error (status 500): oops"
        );
    }
}
