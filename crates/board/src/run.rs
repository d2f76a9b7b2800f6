//! The card-move orchestrator.
//!
//! One [`Orchestrator::run`] call walks the state machine
//!
//! ```text
//! ReadingConfig → ValidatingConfig → ExtractingIssues → ResolvingPipeline → MovingCards → Done
//!                        │                  │                   │
//!                        └──────────────────┴───────────────────┴──→ Failed
//! ```
//!
//! `ExtractingIssues` short-circuits to `Done` when no reference is found.
//! `MovingCards` never fails the run: every move is attempted and its outcome
//! lands in the [`RunReport`].
//!
//! Moves are dispatched sequentially in reference order. Each requests top
//! placement, so the last processed card ends up on top.

use std::sync::Arc;

use tracing::{debug, error, info, info_span, Instrument};

use crate::{
    extract, extract_all, resolve_pipeline, BoardService, IssueReference, IssueSource,
    LinkedIssueSource, MoveOutcome, PipelineTarget, RepositoryId, RunId, RunParameters,
    RunReport, ShuntError, Timestamp,
};

/// States of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Run parameters are being read.
    ReadingConfig,
    /// The pipeline target is being checked.
    ValidatingConfig,
    /// Issue references are being collected from the configured source.
    ExtractingIssues,
    /// The target pipeline id is being determined.
    ResolvingPipeline,
    /// Cards are being moved.
    MovingCards,
    /// Terminal: the run completed (possibly with failed moves).
    Done,
    /// Terminal: the run stopped on an error.
    Failed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ReadingConfig => "reading_config",
            Self::ValidatingConfig => "validating_config",
            Self::ExtractingIssues => "extracting_issues",
            Self::ResolvingPipeline => "resolving_pipeline",
            Self::MovingCards => "moving_cards",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// An issue paired with the repository its move is addressed to.
#[derive(Debug, Clone)]
struct PlannedMove {
    issue: IssueReference,
    repository_id: RepositoryId,
}

fn enter(state: RunState) {
    debug!(state = %state, "Run state transition");
}

fn failed(from: RunState, err: ShuntError) -> ShuntError {
    debug!(state = %RunState::Failed, from = %from, error = %err, "Run state transition");
    err
}

/// Wires extraction, resolution, and card moves over the two ports.
#[derive(Clone)]
pub struct Orchestrator {
    board: Arc<dyn BoardService>,
    linked_issues: Arc<dyn LinkedIssueSource>,
}

impl Orchestrator {
    /// Creates an orchestrator over the given adapters.
    pub fn new(board: Arc<dyn BoardService>, linked_issues: Arc<dyn LinkedIssueSource>) -> Self {
        Self {
            board,
            linked_issues,
        }
    }

    /// Executes one run.
    ///
    /// # Errors
    ///
    /// Returns the error that sent the run to `Failed`:
    /// - [`ShuntError::ConfigurationError`] when no pipeline target is
    ///   configured (no network access is performed).
    /// - [`ShuntError::Upstream`] when the linked-issue query or the board
    ///   read fails.
    /// - [`ShuntError::PipelineNotFound`] when the pipeline name matches nothing.
    ///
    /// Failed moves are not errors; inspect [`RunReport::failures`].
    pub async fn run(&self, params: &RunParameters) -> Result<RunReport, ShuntError> {
        let run_id = RunId::new_random();
        let span = info_span!(
            "run",
            run_id = %run_id,
            workspace_id = %params.workspace_id,
            repository_id = %params.repository_id,
        );
        self.execute(run_id, params).instrument(span).await
    }

    async fn execute(&self, run_id: RunId, params: &RunParameters) -> Result<RunReport, ShuntError> {
        let started_at = Timestamp::now();
        enter(RunState::ReadingConfig);

        enter(RunState::ValidatingConfig);
        let target =
            PipelineTarget::from_parts(params.pipeline_id.clone(), params.pipeline_name.clone())
                .map_err(|e| failed(RunState::ValidatingConfig, e))?;

        enter(RunState::ExtractingIssues);
        let planned = self
            .plan_moves(params)
            .await
            .map_err(|e| failed(RunState::ExtractingIssues, e))?;
        if planned.is_empty() {
            info!("No issue reference found, nothing to move");
            enter(RunState::Done);
            return Ok(RunReport {
                run_id,
                pipeline_id: None,
                outcomes: Vec::new(),
                started_at,
                finished_at: Timestamp::now(),
            });
        }

        enter(RunState::ResolvingPipeline);
        let pipeline_id = resolve_pipeline(
            &target,
            self.board.as_ref(),
            &params.board_token,
            &params.workspace_id,
            &params.repository_id,
        )
        .await
        .map_err(|e| failed(RunState::ResolvingPipeline, e))?;

        enter(RunState::MovingCards);
        let mut outcomes = Vec::with_capacity(planned.len());
        for PlannedMove {
            issue,
            repository_id,
        } in planned
        {
            info!(issue = %issue.number, repository_id = %repository_id, pipeline_id = %pipeline_id, "Moving card");
            let result = self
                .board
                .move_card(
                    &params.board_token,
                    &repository_id,
                    &params.workspace_id,
                    issue.number,
                    &pipeline_id,
                )
                .await;
            match &result {
                Ok(()) => info!(issue = %issue.number, "Card moved"),
                Err(err) => error!(issue = %issue.number, error = %err, "Card move failed"),
            }
            outcomes.push(MoveOutcome {
                issue,
                repository_id,
                result,
            });
        }

        enter(RunState::Done);
        Ok(RunReport {
            run_id,
            pipeline_id: Some(pipeline_id),
            outcomes,
            started_at,
            finished_at: Timestamp::now(),
        })
    }

    /// Collects references from the configured source.
    ///
    /// Text sources address every move to the configured repository. Linked
    /// issues are addressed to their own repository, since a pull request may
    /// close issues that live elsewhere.
    async fn plan_moves(&self, params: &RunParameters) -> Result<Vec<PlannedMove>, ShuntError> {
        let configured = |issue: IssueReference| PlannedMove {
            issue,
            repository_id: params.repository_id.clone(),
        };

        let planned = match &params.source {
            IssueSource::Message(text) => extract(text).map(configured).into_iter().collect(),
            IssueSource::References(inputs) => {
                extract_all(inputs).into_iter().map(configured).collect()
            }
            IssueSource::PullRequest { url, token } => {
                let linked = self.linked_issues.fetch_linked_issues(url, token).await?;
                info!(pull_request = %url, count = linked.len(), "Fetched linked issues");
                linked
                    .into_iter()
                    .map(|issue| {
                        let repository_id = issue
                            .repository_id()
                            .cloned()
                            .unwrap_or_else(|| params.repository_id.clone());
                        PlannedMove {
                            issue,
                            repository_id,
                        }
                    })
                    .collect()
            }
        };
        Ok(planned)
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
