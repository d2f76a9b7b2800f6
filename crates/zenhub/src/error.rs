//! Errors raised by the ZenHub adapter.

use board::UpstreamError;
use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a ZenHub request.
#[derive(Debug, Error)]
pub enum ZenhubError {
    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Response body, possibly empty.
        body: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response decoded but violates the board's invariants.
    #[error("Invalid board payload: {0}")]
    Payload(String),
}

impl From<ZenhubError> for UpstreamError {
    fn from(err: ZenhubError) -> Self {
        UpstreamError::board(err.to_string())
    }
}
