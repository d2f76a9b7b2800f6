//! HTTP client for the GitHub GraphQL API.

use async_trait::async_trait;
use board::{AuthToken, IssueReference, LinkedIssueSource, PullRequestUrl, UpstreamError};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::query::{GraphQlResponse, LinkedIssuesData, LINKED_ISSUES_QUERY};
use crate::GithubError;

/// GraphQL endpoint of github.com.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// GitHub GraphQL client.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    graphql_url: String,
}

impl GithubClient {
    /// Creates a client for the given GraphQL endpoint (e.g.
    /// [`DEFAULT_GRAPHQL_URL`] or a GitHub Enterprise Server `/api/graphql`).
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Network`] if the HTTP client cannot be built.
    pub fn new(graphql_url: impl Into<String>) -> Result<Self, GithubError> {
        let client = Client::builder()
            .user_agent(concat!("shunt/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            graphql_url: graphql_url.into(),
        })
    }

    /// Returns the configured GraphQL endpoint.
    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    /// Execute a GraphQL query
    async fn graphql<T: DeserializeOwned>(
        &self,
        token: &AuthToken,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, GithubError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .client
            .post(&self.graphql_url)
            .bearer_auth(token.expose())
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        debug!(url = %self.graphql_url, status = %status, "POST graphql");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GithubError::Status { status, body });
        }

        let result: GraphQlResponse<T> = response.json().await?;
        result.into_data()
    }

    /// Returns the issues the pull request closes, up to the first ten.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError`] on transport failure, a non-2xx status,
    /// GraphQL errors, or when the URL is not a pull request.
    #[instrument(skip_all, fields(pull_request = %pr_url))]
    pub async fn closing_issues(
        &self,
        pr_url: &PullRequestUrl,
        token: &AuthToken,
    ) -> Result<Vec<IssueReference>, GithubError> {
        let variables = serde_json::json!({ "url": pr_url.as_str() });
        let data: LinkedIssuesData = self.graphql(token, LINKED_ISSUES_QUERY, variables).await?;
        let references = data.into_references(pr_url.as_str())?;
        info!(count = references.len(), "Closing issue references fetched");
        Ok(references)
    }
}

#[async_trait]
impl LinkedIssueSource for GithubClient {
    async fn fetch_linked_issues(
        &self,
        pr_url: &PullRequestUrl,
        token: &AuthToken,
    ) -> Result<Vec<IssueReference>, UpstreamError> {
        Ok(self.closing_issues(pr_url, token).await?)
    }
}
