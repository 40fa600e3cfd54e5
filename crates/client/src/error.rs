//! Client error taxonomy.
//!
//! Every operation in this crate returns [`ClientError`]. None of them are
//! fatal: a failed call leaves the stores in their previous state and the
//! error's display text is what a user should see.

use thiserror::Error;
use wonderland_core::ValidationError;

/// Shown when a request never got a response.
pub const NETWORK_MESSAGE: &str =
    "Unable to connect to server. Please check if the backend is running.";

/// Fallback when an error response carries no usable message.
pub const GENERIC_API_MESSAGE: &str = "An error occurred";

/// Errors surfaced by the API client and the stores.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected before any request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend rejected the credentials or the bearer token (HTTP 401).
    #[error("{0}")]
    Auth(String),

    /// No response was received.
    #[error("{0}")]
    Network(String),

    /// Non-success response; `message` comes from the response body.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A success response whose body did not match the expected shape.
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    /// Durable token storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A local lookup found nothing.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ClientError {
    /// HTTP status of the response that caused this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Auth(_) => Some(401),
            _ => None,
        }
    }

    /// Whether this error means the session is no longer valid.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Text to show the user.
    ///
    /// Decode and storage failures are internal; they get a generic line
    /// and the detail stays in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Decode(_) | Self::Storage(_) => GENERIC_API_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        tracing::warn!(error = %err, "Request failed without a response");
        Self::Network(NETWORK_MESSAGE.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_message_is_shown_verbatim() {
        let err = ClientError::Api {
            status: 400,
            message: "Email already registered".to_string(),
        };
        assert_eq!(err.to_string(), "Email already registered");
        assert_eq!(err.user_message(), "Email already registered");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_validation_is_transparent() {
        let err = ClientError::from(ValidationError::PasswordMismatch);
        assert_eq!(err.to_string(), "Passwords do not match");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_internal_errors_get_generic_user_message() {
        let err = ClientError::Decode("missing field `id`".to_string());
        assert_eq!(err.user_message(), GENERIC_API_MESSAGE);
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_predicates() {
        assert!(ClientError::Auth("expired".into()).is_auth());
        assert_eq!(ClientError::Auth("expired".into()).status(), Some(401));
        assert!(ClientError::Network(NETWORK_MESSAGE.into()).is_network());
        assert!(!ClientError::NotFound("order 9".into()).is_network());
    }
}
