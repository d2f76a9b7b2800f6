//! Port traits implemented by the infrastructure adapters.
//!
//! Credentials are an explicit argument of every call; adapters must attach
//! them to the individual request and never to shared client state.

use async_trait::async_trait;

use crate::{
    AuthToken, Board, IssueNumber, IssueReference, PipelineId, PullRequestUrl, RepositoryId,
    UpstreamError, WorkspaceId,
};

/// The project-tracking board (ZenHub).
#[async_trait]
pub trait BoardService: Send + Sync {
    /// Reads the pipelines of a repository's board, in board order.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] on transport failure or a non-2xx status.
    async fn fetch_board(
        &self,
        token: &AuthToken,
        workspace: &WorkspaceId,
        repository: &RepositoryId,
    ) -> Result<Board, UpstreamError>;

    /// Moves the issue's card to the top of `pipeline`.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] on transport failure or a non-2xx status.
    async fn move_card(
        &self,
        token: &AuthToken,
        repository: &RepositoryId,
        workspace: &WorkspaceId,
        issue: IssueNumber,
        pipeline: &PipelineId,
    ) -> Result<(), UpstreamError>;
}

/// The source-control host's view of which issues a pull request closes.
#[async_trait]
pub trait LinkedIssueSource: Send + Sync {
    /// Returns up to the first ten issues the pull request closes, in the
    /// host's order and without deduplication.
    ///
    /// Entries that cannot name an issue are dropped: `null` nodes and issue
    /// number `0`, which no [`IssueNumber`] can hold. Every other entry is
    /// returned as the host reported it.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] carrying the host's message on any
    /// transport or host-side failure.
    async fn fetch_linked_issues(
        &self,
        pr_url: &PullRequestUrl,
        token: &AuthToken,
    ) -> Result<Vec<IssueReference>, UpstreamError>;
}
