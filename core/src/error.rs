//! Error types for the notification API client.
//!
//! # Design
//! One variant per failure class so callers can match on the kind rather
//! than on message text. The five envelope-backed variants (`Auth`,
//! `BadRequest`, `NotFound`, `RateLimit`, `Server`) carry the remote
//! service's structured error type and message; everything the service
//! returned without a recognizable envelope lands in `Http` with the raw
//! status and body for debugging.

use std::fmt;

use crate::http::TransportError;

/// Message used when client construction rejects an API key.
pub const INVALID_API_KEY_MESSAGE: &str =
    "The API Key provided is invalid. Please ensure you are using a v2 API Key that is not empty or null";

/// Errors returned by `NotificationClient` operations.
#[derive(Debug)]
pub enum ApiError {
    /// The API key failed validation at construction, or the service
    /// returned 401/403.
    Auth { error: String, message: String },

    /// The service returned 400: the request failed validation.
    BadRequest { error: String, message: String },

    /// The service returned 404: no such notification or template.
    NotFound { error: String, message: String },

    /// The service returned 429: over the sending limit.
    RateLimit { error: String, message: String },

    /// The service returned 5xx.
    Server { error: String, message: String },

    /// A non-2xx response whose body was not a recognizable error
    /// envelope.
    Http { status: u16, body: String },

    /// A 2xx response whose body could not be deserialized into the
    /// expected type.
    UnexpectedResponse(String),

    /// No response was received. The message is the transport failure's
    /// text, unmodified.
    Transport(String),

    /// A request payload or token claim set could not be serialized.
    Serialization(String),
}

impl ApiError {
    /// The fixed construction-time failure for a key that is empty, too
    /// short, or not two valid UUID segments.
    pub(crate) fn invalid_api_key() -> Self {
        ApiError::Auth {
            error: "AuthError".to_string(),
            message: INVALID_API_KEY_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Auth { error, message }
            | ApiError::BadRequest { error, message }
            | ApiError::NotFound { error, message }
            | ApiError::RateLimit { error, message }
            | ApiError::Server { error, message } => {
                write!(f, "{error}: {message}")
            }
            ApiError::Http { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::UnexpectedResponse(msg) => {
                write!(f, "unexpected response body: {msg}")
            }
            ApiError::Transport(msg) => {
                write!(f, "transport failure: {msg}")
            }
            ApiError::Serialization(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Transport(err.0)
    }
}
