//! Scoring-client error types.

use thiserror::Error;

use aivaluator_core::error::PayloadError;

/// Errors that can occur when talking to the scoring service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The server could not be reached.
    #[error("scoring service not reachable at {url}: {message}")]
    Unreachable { url: String, message: String },

    /// The server answered with an error status.
    #[error("scoring service error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    /// The response body was not a valid score report.
    #[error("malformed score report: {0}")]
    MalformedResponse(String),

    /// The payload was rejected before sending.
    #[error("invalid submission: {0}")]
    InvalidPayload(#[from] PayloadError),

    /// Any other transport failure.
    #[error("network error: {0}")]
    Network(String),
}

impl ClientError {
    /// Returns `true` if the failure came from the server rather than the
    /// transport.
    pub fn is_server_side(&self) -> bool {
        matches!(
            self,
            ClientError::Status { .. } | ClientError::MalformedResponse(_)
        )
    }
}
