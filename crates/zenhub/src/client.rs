//! HTTP client for the ZenHub REST API.

use async_trait::async_trait;
use board::{
    AuthToken, Board, BoardService, IssueNumber, PipelineId, RepositoryId, UpstreamError,
    WorkspaceId,
};
use reqwest::{header, Client, Response};
use tracing::{debug, instrument};

use crate::wire::{BoardResponse, MoveRequest};
use crate::ZenhubError;

/// Public ZenHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.zenhub.com";

const AUTH_HEADER: &str = "X-Authentication-Token";

/// ZenHub API client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ZenhubClient {
    client: Client,
    base_url: String,
}

impl ZenhubClient {
    /// Creates a client for the given API base URL (e.g. [`DEFAULT_API_URL`]
    /// or a ZenHub Enterprise endpoint).
    ///
    /// # Errors
    ///
    /// Returns [`ZenhubError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ZenhubError> {
        let client = Client::builder()
            .user_agent(concat!("shunt/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the API base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn board_url(&self, workspace: &WorkspaceId, repository: &RepositoryId) -> String {
        format!(
            "{}/p2/workspaces/{}/repositories/{}/board",
            self.base_url, workspace, repository
        )
    }

    fn move_url(
        &self,
        workspace: &WorkspaceId,
        repository: &RepositoryId,
        issue: IssueNumber,
    ) -> String {
        format!(
            "{}/p2/workspaces/{}/repositories/{}/issues/{}/moves",
            self.base_url, workspace, repository, issue
        )
    }

    /// Reads a repository's board.
    ///
    /// # Errors
    ///
    /// Returns [`ZenhubError`] on transport failure, a non-2xx status, or an
    /// invalid payload.
    #[instrument(skip_all, fields(workspace = %workspace, repository = %repository))]
    pub async fn get_board(
        &self,
        token: &AuthToken,
        workspace: &WorkspaceId,
        repository: &RepositoryId,
    ) -> Result<Board, ZenhubError> {
        let url = self.board_url(workspace, repository);
        let response = self
            .client
            .get(&url)
            .header(AUTH_HEADER, token.expose())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        debug!(url = %url, status = %response.status(), "GET board");

        let payload: BoardResponse = ensure_success(response).await?.json().await?;
        payload.into_board()
    }

    /// Moves an issue's card to the top of `pipeline`.
    ///
    /// # Errors
    ///
    /// Returns [`ZenhubError`] on transport failure or a non-2xx status.
    #[instrument(skip_all, fields(workspace = %workspace, repository = %repository, issue = %issue))]
    pub async fn post_move(
        &self,
        token: &AuthToken,
        repository: &RepositoryId,
        workspace: &WorkspaceId,
        issue: IssueNumber,
        pipeline: &PipelineId,
    ) -> Result<(), ZenhubError> {
        let url = self.move_url(workspace, repository, issue);
        let response = self
            .client
            .post(&url)
            .header(AUTH_HEADER, token.expose())
            .json(&MoveRequest::to_top(pipeline))
            .send()
            .await?;
        debug!(url = %url, status = %response.status(), "POST move");

        ensure_success(response).await?;
        Ok(())
    }
}

/// Passes 2xx responses through and turns anything else into [`ZenhubError::Status`].
async fn ensure_success(response: Response) -> Result<Response, ZenhubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ZenhubError::Status { status, body })
}

#[async_trait]
impl BoardService for ZenhubClient {
    async fn fetch_board(
        &self,
        token: &AuthToken,
        workspace: &WorkspaceId,
        repository: &RepositoryId,
    ) -> Result<Board, UpstreamError> {
        Ok(self.get_board(token, workspace, repository).await?)
    }

    async fn move_card(
        &self,
        token: &AuthToken,
        repository: &RepositoryId,
        workspace: &WorkspaceId,
        issue: IssueNumber,
        pipeline: &PipelineId,
    ) -> Result<(), UpstreamError> {
        Ok(self
            .post_move(token, repository, workspace, issue, pipeline)
            .await?)
    }
}
