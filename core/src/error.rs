//! Error types for the Étoile API client.
//!
//! # Design
//! Every failure the client can surface lives in one enum, so callers
//! pattern-match exhaustively instead of sniffing field shapes. Local
//! contract violations (`InvalidInput`) are raised before any network I/O;
//! remote and transport failures are tagged at the single point where the
//! exchange runs. `code()` exposes a stable machine-readable code for
//! callers that log or branch without matching.

use std::fmt;

/// Errors returned by `EtoileClient` operations.
#[derive(Debug)]
pub enum ApiError {
    /// The caller's input violates the API contract. Raised before any
    /// request is built; `field` names the offending input.
    InvalidInput { field: String, message: String },

    /// The server returned a non-2xx status. `body` is the parsed JSON
    /// error body, or `{"error": "Request failed."}` when the body was not
    /// a JSON object.
    Remote { status: u16, body: serde_json::Value },

    /// The exchange failed before a response was received.
    Transport(String),

    /// The request payload could not be serialized to JSON.
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    Deserialization(String),
}

impl ApiError {
    pub(crate) fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        ApiError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput { .. } => "INVALID_INPUT",
            ApiError::Remote { .. } => "REMOTE_ERROR",
            ApiError::Transport(_) => "TRANSPORT_ERROR",
            ApiError::Serialization(_) => "SERIALIZATION_ERROR",
            ApiError::Deserialization(_) => "DESERIALIZATION_ERROR",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidInput { field, message } => {
                write!(f, "invalid input for `{field}`: {message}")
            }
            ApiError::Remote { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::Transport(cause) => {
                write!(f, "network request failed: {cause}")
            }
            ApiError::Serialization(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::Deserialization(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
