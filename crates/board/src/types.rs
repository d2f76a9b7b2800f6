//! Shared value types for the card-move domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! invariants of their own (a pipeline target always names *something*, a
//! token is never empty) and flow between the extraction, resolution, and
//! move steps.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    IssueNumber, PipelineId, PipelineName, PullRequestUrl, RepositoryId, RunId, ShuntError,
    UpstreamError, WorkspaceId,
};

// ---------------------------------------------------------------------------
// Issue references
// ---------------------------------------------------------------------------

/// Repository context attached to an [`IssueReference`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueRepository {
    /// Owner and repository name as written in free text.
    Named {
        /// Repository owner (user or organisation login).
        owner: String,
        /// Repository name.
        name: String,
    },
    /// Opaque repository id reported by the source-control host.
    Id(RepositoryId),
}

/// One unit of work to move: an issue number plus optional repository context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueReference {
    /// Issue number within its repository.
    pub number: IssueNumber,
    /// Where the issue lives, when known.
    pub repository: Option<IssueRepository>,
}

impl IssueReference {
    /// A reference with no repository context.
    pub fn bare(number: IssueNumber) -> Self {
        Self {
            number,
            repository: None,
        }
    }

    /// A reference to an issue in the repository with the given host id.
    pub fn in_repository(number: IssueNumber, repository: RepositoryId) -> Self {
        Self {
            number,
            repository: Some(IssueRepository::Id(repository)),
        }
    }

    /// Returns the host-assigned repository id, if this reference carries one.
    pub fn repository_id(&self) -> Option<&RepositoryId> {
        match &self.repository {
            Some(IssueRepository::Id(id)) => Some(id),
            _ => None,
        }
    }
}

impl std::fmt::Display for IssueReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.repository {
            Some(IssueRepository::Named { owner, name }) => {
                write!(f, "{owner}/{name}#{}", self.number)
            }
            Some(IssueRepository::Id(id)) => write!(f, "repo:{id}#{}", self.number),
            None => write!(f, "#{}", self.number),
        }
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// An issue's card as it sits in a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Issue the card tracks.
    pub number: IssueNumber,
    /// Repository of the issue, when the board reports it.
    pub repository_id: Option<RepositoryId>,
}

/// A named column on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Board-assigned pipeline identifier.
    pub id: PipelineId,
    /// Display name, as configured on the board.
    pub name: String,
    /// Cards in the pipeline, top first.
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// A repository's board as read from the board service.
///
/// Pipelines are kept in board order; resolution depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Pipelines in the order the board service returned them.
    pub pipelines: Vec<Pipeline>,
}

impl Board {
    /// Returns the first pipeline whose name contains `fragment`.
    ///
    /// Matching is case-sensitive substring search in board order.
    pub fn find_by_name_fragment(&self, fragment: &PipelineName) -> Option<&Pipeline> {
        self.pipelines
            .iter()
            .find(|p| p.name.contains(fragment.as_str()))
    }

    /// Returns the pipeline currently holding the issue's card.
    ///
    /// Cards without a repository id match any repository.
    pub fn pipeline_of(&self, repository: &RepositoryId, issue: IssueNumber) -> Option<&Pipeline> {
        self.pipelines.iter().find(|p| {
            p.cards.iter().any(|c| {
                c.number == issue && c.repository_id.as_ref().is_none_or(|r| r == repository)
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Pipeline target
// ---------------------------------------------------------------------------

/// The pipeline cards should land in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineTarget {
    /// Explicit pipeline id; used as-is.
    Id(PipelineId),
    /// Name fragment to be resolved against the board.
    Name(PipelineName),
}

impl PipelineTarget {
    /// Builds a target from the two optional configuration values.
    ///
    /// An explicit id wins when both are supplied.
    ///
    /// # Errors
    ///
    /// Returns [`ShuntError::ConfigurationError`] when neither is supplied.
    pub fn from_parts(
        id: Option<PipelineId>,
        name: Option<PipelineName>,
    ) -> Result<Self, ShuntError> {
        match (id, name) {
            (Some(id), _) => Ok(Self::Id(id)),
            (None, Some(name)) => Ok(Self::Name(name)),
            (None, None) => Err(ShuntError::configuration(
                "one of zh-target-pipeline-id and zh-target-pipeline-name is required",
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// An API token for the board service or the source-control host.
///
/// The value is only reachable through [`AuthToken::expose`]; `Debug` output
/// is redacted.
pub struct AuthToken(SecretString);

impl AuthToken {
    /// Wraps a token, returning `None` if it is empty.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() {
            None
        } else {
            Some(Self(SecretString::from(v)))
        }
    }

    /// Returns the raw token for placing on an outgoing request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

// ---------------------------------------------------------------------------
// Run parameters
// ---------------------------------------------------------------------------

/// Where the issues to move come from.
#[derive(Debug)]
pub enum IssueSource {
    /// Scan one message (commit message, PR title) for a reference.
    Message(String),
    /// Scan each string of a list for a reference.
    References(Vec<String>),
    /// Ask the source-control host which issues the pull request closes.
    PullRequest {
        /// The pull request to inspect.
        url: PullRequestUrl,
        /// Host token used for the query.
        token: AuthToken,
    },
}

/// The complete, immutable input of one orchestrator run.
#[derive(Debug)]
pub struct RunParameters {
    /// Board service token.
    pub board_token: AuthToken,
    /// Workspace holding the board.
    pub workspace_id: WorkspaceId,
    /// Repository whose board is read, and the move target for text sources.
    pub repository_id: RepositoryId,
    /// Explicit target pipeline id.
    pub pipeline_id: Option<PipelineId>,
    /// Target pipeline name fragment.
    pub pipeline_name: Option<PipelineName>,
    /// Where issue references come from.
    pub source: IssueSource,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of one card move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    /// The issue that was moved.
    pub issue: IssueReference,
    /// Repository id the move request was addressed to.
    pub repository_id: RepositoryId,
    /// `Ok` when the board acknowledged the move.
    pub result: Result<(), UpstreamError>,
}

impl MoveOutcome {
    /// Returns `true` if the board acknowledged the move.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Terminal report of a run that reached `Done`.
///
/// `Done` does not imply every move succeeded; see [`RunReport::failures`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Identifier of the run.
    pub run_id: RunId,
    /// Resolved target pipeline; `None` when no references were found.
    pub pipeline_id: Option<PipelineId>,
    /// One entry per dispatched move, in dispatch order.
    pub outcomes: Vec<MoveOutcome>,
    /// When the run started.
    pub started_at: Timestamp,
    /// When the run reached `Done`.
    pub finished_at: Timestamp,
}

impl RunReport {
    /// Moves the board acknowledged.
    pub fn successes(&self) -> impl Iterator<Item = &MoveOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    /// Moves that failed.
    pub fn failures(&self) -> impl Iterator<Item = &MoveOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Returns `true` if no move failed (vacuously true for a no-op run).
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`, clamped at zero.
    pub fn millis_since(self, earlier: Timestamp) -> u64 {
        u64::try_from((self.0 - earlier.0).num_milliseconds()).unwrap_or(0)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
