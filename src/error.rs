//! Error taxonomy for calls against the inference server.

use thiserror::Error;

use crate::models::{ErrorPayload, ErrorType};

/// Result alias used throughout the client.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Every way a call can fail, as seen by the caller.
///
/// Server-reported failures are normalized from the `error_type` tag of the
/// JSON error body. Nothing here is retried by the client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// `embed` was called with an empty input string. No request was sent.
    #[error("inputs cannot be empty")]
    EmptyInput,

    /// DNS, connect, timeout or body read failure.
    #[error("failed to execute http request: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not have the expected JSON shape.
    #[error("failed to parse response: {0}")]
    ResponseDecode(serde_json::Error),

    /// The request payload could not be serialized.
    #[error("failed to marshal request: {0}")]
    RequestEncode(serde_json::Error),

    /// A configured header or cookie cannot be put on the wire.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("backend error: {0}")]
    Backend(String),

    /// The server message is dropped for this kind.
    #[error("server overloaded")]
    Overloaded,

    #[error("unhandled error type {error_type} (status {status}): {message}")]
    UnknownServer {
        status: u16,
        error_type: String,
        message: String,
    },
}

impl ClientError {
    /// Map a decoded error body to its error kind.
    pub fn from_payload(status: u16, payload: ErrorPayload) -> Self {
        match payload.error_type {
            ErrorType::Validation => Self::Validation(payload.error),
            ErrorType::Tokenizer => Self::Tokenizer(payload.error),
            ErrorType::Backend => Self::Backend(payload.error),
            ErrorType::Overloaded => Self::Overloaded,
            // `unhealthy` is a known tag with no documented trigger.
            other @ (ErrorType::Unhealthy | ErrorType::Other(_)) => Self::UnknownServer {
                status,
                error_type: other.as_str().to_string(),
                message: payload.error,
            },
        }
    }

    /// Build a decode error from a message rather than a serde failure.
    pub(crate) fn decode(msg: impl std::fmt::Display) -> Self {
        Self::ResponseDecode(<serde_json::Error as serde::de::Error>::custom(msg))
    }

    /// Whether a caller-side retry could reasonably succeed.
    ///
    /// Informational only; the client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Overloaded => true,
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
