//! Errors raised by the GitHub adapter.

use board::UpstreamError;
use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a GitHub GraphQL request.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The API answered with a non-2xx status.
    #[error("GitHub API error: HTTP {status}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response carried a GraphQL `errors` array.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// The response carried neither `data` nor `errors`.
    #[error("No data in GraphQL response")]
    NoData,

    /// The URL does not resolve to a pull request.
    #[error("No pull request at {0}")]
    NotAPullRequest(String),

    /// The request could not be sent or the response could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<GithubError> for UpstreamError {
    fn from(err: GithubError) -> Self {
        UpstreamError::source_control(err.to_string())
    }
}
