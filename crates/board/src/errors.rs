//! Error types for the card-move domain.
//!
//! [`ShuntError`] covers every condition that sends a run to `Failed`.
//! [`UpstreamError`] is the single currency adapters convert their transport
//! failures into; it also records per-issue move failures, which do not fail
//! the run.
//!
//! Nothing here is retryable. A failed request is reported and the run moves
//! on (moves) or stops (everything else).

use thiserror::Error;

use crate::PipelineName;

// ---------------------------------------------------------------------------
// Upstream failures
// ---------------------------------------------------------------------------

/// Which remote service a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamService {
    /// The project-tracking board (ZenHub).
    Board,
    /// The source-control host (GitHub).
    SourceControl,
}

impl std::fmt::Display for UpstreamService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Board => f.write_str("board service"),
            Self::SourceControl => f.write_str("source-control host"),
        }
    }
}

/// A network or HTTP failure reported by a remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{service} request failed: {message}")]
pub struct UpstreamError {
    /// The service that failed.
    pub service: UpstreamService,
    /// The service's own message (status line, response body, GraphQL errors).
    pub message: String,
}

impl UpstreamError {
    /// A failure of the board service.
    pub fn board(message: impl Into<String>) -> Self {
        Self {
            service: UpstreamService::Board,
            message: message.into(),
        }
    }

    /// A failure of the source-control host.
    pub fn source_control(message: impl Into<String>) -> Self {
        Self {
            service: UpstreamService::SourceControl,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Run-level errors
// ---------------------------------------------------------------------------

/// Errors that end a run in the `Failed` state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShuntError {
    /// The run parameters are incomplete or invalid.
    ///
    /// Produced before any network access.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },

    /// No pipeline on the board contains the requested name.
    #[error("No pipeline name of {name} found")]
    PipelineNotFound {
        /// The name fragment that was searched for.
        name: PipelineName,
    },

    /// A remote service failed while reading the board or fetching linked issues.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ShuntError {
    /// Shorthand for a [`ShuntError::ConfigurationError`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }
}
