//! Command-line and GitHub Actions input parsing.
//!
//! Every flag falls back to the `INPUT_<NAME>` variable GitHub Actions sets
//! for a `with:` input of the same name. All values are optional at the clap
//! layer so that missing inputs surface as configuration errors through the
//! normal failure report rather than as clap usage errors.

use board::{
    AuthToken, IssueSource, PipelineId, PipelineName, PullRequestUrl, RepositoryId,
    RunParameters, ShuntError, WorkspaceId,
};
use clap::{Parser, ValueEnum};
use github::DEFAULT_GRAPHQL_URL;
use zenhub::DEFAULT_API_URL;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Shunt: move ZenHub cards for the issues a commit or pull request references.
#[derive(Parser)]
#[command(name = "shunt", version, about, long_about = None)]
pub struct CliArgs {
    /// ZenHub API token
    #[arg(long, env = "INPUT_ZH-TOKEN", hide_env_values = true)]
    pub zh_token: Option<String>,

    /// ZenHub workspace id
    #[arg(long, env = "INPUT_ZH-WORKSPACE-ID")]
    pub zh_workspace_id: Option<String>,

    /// Repository id as known to ZenHub (GitHub repository databaseId)
    #[arg(long, env = "INPUT_ZH-REPOSITORY-ID")]
    pub zh_repository_id: Option<String>,

    /// Target pipeline id; takes precedence over the name
    #[arg(long, env = "INPUT_ZH-TARGET-PIPELINE-ID")]
    pub zh_target_pipeline_id: Option<String>,

    /// Target pipeline name, matched as a substring
    #[arg(long, env = "INPUT_ZH-TARGET-PIPELINE-NAME")]
    pub zh_target_pipeline_name: Option<String>,

    /// Message to scan for a single issue reference
    #[arg(long, env = "INPUT_COMMIT-MESSAGE")]
    pub commit_message: Option<String>,

    /// Issue references, separated by newlines or commas
    #[arg(long, env = "INPUT_ISSUES")]
    pub issues: Option<String>,

    /// Pull request whose closing issues are moved
    #[arg(long, env = "INPUT_PULL-REQUEST-URL")]
    pub pull_request_url: Option<String>,

    /// GitHub token, required with --pull-request-url
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// ZenHub API base URL
    #[arg(long, env = "INPUT_ZH-API-URL", default_value = DEFAULT_API_URL)]
    pub zh_api_url: String,

    /// GitHub GraphQL endpoint
    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = DEFAULT_GRAPHQL_URL)]
    pub github_graphql_url: String,

    /// Log output format
    #[arg(long, env = "SHUNT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Log at debug level (also enabled by RUNNER_DEBUG=1)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Everything the composition root needs to wire and start a run.
#[derive(Debug)]
pub struct Settings {
    /// Orchestrator input.
    pub params: RunParameters,
    /// ZenHub API base URL.
    pub zh_api_url: String,
    /// GitHub GraphQL endpoint.
    pub github_graphql_url: String,
}

/// Treats empty and whitespace-only values as absent.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<T>(
    value: Option<String>,
    input: &str,
    build: impl FnOnce(String) -> Option<T>,
) -> Result<T, ShuntError> {
    present(value)
        .and_then(build)
        .ok_or_else(|| ShuntError::configuration(format!("{input} is required")))
}

/// Splits an `issues` input on newlines and commas.
pub fn split_references(raw: &str) -> Vec<String> {
    raw.split(['\n', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl CliArgs {
    /// Validates the inputs and builds [`Settings`].
    ///
    /// The pipeline target is deliberately left unchecked here; the
    /// orchestrator validates it before any network access.
    ///
    /// # Errors
    ///
    /// Returns [`ShuntError::ConfigurationError`] when a required input is
    /// missing, or when `pull-request-url` is given without `github-token`.
    pub fn into_settings(self) -> Result<Settings, ShuntError> {
        let board_token = required(self.zh_token, "zh-token", AuthToken::new)?;
        let workspace_id = required(self.zh_workspace_id, "zh-workspace-id", WorkspaceId::new)?;
        let repository_id =
            required(self.zh_repository_id, "zh-repository-id", RepositoryId::new)?;

        let pull_request = present(self.pull_request_url).and_then(PullRequestUrl::new);
        let source = if let Some(url) = pull_request {
            let token = required(
                self.github_token,
                "github-token with pull-request-url",
                AuthToken::new,
            )?;
            IssueSource::PullRequest { url, token }
        } else if let Some(raw) = present(self.issues) {
            IssueSource::References(split_references(&raw))
        } else {
            IssueSource::Message(self.commit_message.unwrap_or_default())
        };

        Ok(Settings {
            params: RunParameters {
                board_token,
                workspace_id,
                repository_id,
                pipeline_id: present(self.zh_target_pipeline_id).and_then(PipelineId::new),
                pipeline_name: present(self.zh_target_pipeline_name).and_then(PipelineName::new),
                source,
            },
            zh_api_url: self.zh_api_url,
            github_graphql_url: self.github_graphql_url,
        })
    }
}
