// Error types for the MiniDB HTTP API
//
// Two classes matter to callers: transport failures (no usable response)
// and server-declared refusals that carry a message meant for the operator.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the MiniDB service
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, broken body)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status returned by the service
        status: StatusCode,
        /// Raw response body, possibly empty
        body: String,
    },

    /// The response body did not have the expected shape
    #[error("malformed response: {0}")]
    Decode(String),

    /// The service refused an upload and said why
    #[error("{message}")]
    Rejected {
        /// HTTP status returned by the service
        status: StatusCode,
        /// Operator-facing reason supplied by the service
        message: String,
    },

    /// The upload payload could not be read from disk
    #[error("failed to read upload file: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// The operator-facing message carried by a server refusal, if any.
    pub fn rejection_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}
