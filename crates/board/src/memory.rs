//! In-memory board double for tests and local runs.
//!
//! Behaves like the board service from the orchestrator's point of view:
//! reads return the current pipelines with their cards, moves place the card
//! at the top of the target pipeline. Calls are counted and failures can be
//! injected per operation.
//!
//! This is a test-support API; nothing in the production path constructs it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{
    AuthToken, Board, BoardService, Card, IssueNumber, Pipeline, PipelineId, RepositoryId,
    UpstreamError, WorkspaceId,
};

/// A move request as the double received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMove {
    /// Repository the move was addressed to.
    pub repository: RepositoryId,
    /// Workspace the move was addressed to.
    pub workspace: WorkspaceId,
    /// Issue whose card was moved.
    pub issue: IssueNumber,
    /// Requested destination.
    pub pipeline: PipelineId,
}

/// Thread-safe in-memory board.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoard {
    state: Arc<RwLock<InMemoryBoardState>>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    board: Board,
    board_reads: usize,
    moves: Vec<RecordedMove>,
    tokens: Vec<String>,
    board_read_failure: Option<UpstreamError>,
    move_failures: HashMap<IssueNumber, UpstreamError>,
}

impl InMemoryBoard {
    /// Creates a board with no pipelines.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board from `(id, name)` pairs, in board order.
    ///
    /// Test-support constructor: the pairs are fixture literals.
    ///
    /// # Panics
    ///
    /// Panics if an id is empty.
    #[must_use]
    pub fn with_pipelines<'a>(pipelines: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let board = Board {
            pipelines: pipelines
                .into_iter()
                .map(|(id, name)| Pipeline {
                    id: PipelineId::new(id).expect("pipeline id must not be empty"),
                    name: name.to_string(),
                    cards: Vec::new(),
                })
                .collect(),
        };
        Self {
            state: Arc::new(RwLock::new(InMemoryBoardState {
                board,
                ..InMemoryBoardState::default()
            })),
        }
    }

    /// Places a card at the bottom of a pipeline without recording a move.
    pub fn place_card(&self, pipeline: &PipelineId, repository: &RepositoryId, issue: IssueNumber) {
        let mut state = self.state.write();
        if let Some(p) = state.board.pipelines.iter_mut().find(|p| &p.id == pipeline) {
            p.cards.push(Card {
                number: issue,
                repository_id: Some(repository.clone()),
            });
        }
    }

    /// Makes every subsequent board read fail with `error`.
    pub fn fail_board_reads(&self, error: UpstreamError) {
        self.state.write().board_read_failure = Some(error);
    }

    /// Makes every subsequent move of `issue` fail with `error`.
    pub fn fail_moves_of(&self, issue: IssueNumber, error: UpstreamError) {
        self.state.write().move_failures.insert(issue, error);
    }

    /// Number of board reads received, failed ones included.
    pub fn board_reads(&self) -> usize {
        self.state.read().board_reads
    }

    /// Every move request received, failed ones included, in arrival order.
    pub fn moves(&self) -> Vec<RecordedMove> {
        self.state.read().moves.clone()
    }

    /// Total number of calls of any kind.
    pub fn call_count(&self) -> usize {
        let state = self.state.read();
        state.board_reads + state.moves.len()
    }

    /// Tokens presented with each call, in arrival order.
    pub fn tokens_seen(&self) -> Vec<String> {
        self.state.read().tokens.clone()
    }
}

#[async_trait]
impl BoardService for InMemoryBoard {
    async fn fetch_board(
        &self,
        token: &AuthToken,
        _workspace: &WorkspaceId,
        _repository: &RepositoryId,
    ) -> Result<Board, UpstreamError> {
        let mut state = self.state.write();
        state.board_reads += 1;
        state.tokens.push(token.expose().to_string());
        if let Some(err) = &state.board_read_failure {
            return Err(err.clone());
        }
        Ok(state.board.clone())
    }

    async fn move_card(
        &self,
        token: &AuthToken,
        repository: &RepositoryId,
        workspace: &WorkspaceId,
        issue: IssueNumber,
        pipeline: &PipelineId,
    ) -> Result<(), UpstreamError> {
        let mut state = self.state.write();
        state.tokens.push(token.expose().to_string());
        state.moves.push(RecordedMove {
            repository: repository.clone(),
            workspace: workspace.clone(),
            issue,
            pipeline: pipeline.clone(),
        });
        if let Some(err) = state.move_failures.get(&issue) {
            return Err(err.clone());
        }
        if !state.board.pipelines.iter().any(|p| &p.id == pipeline) {
            return Err(UpstreamError::board(format!(
                "HTTP 404 Not Found: unknown pipeline {pipeline}"
            )));
        }

        for p in &mut state.board.pipelines {
            p.cards
                .retain(|c| !(c.number == issue && c.repository_id.as_ref() == Some(repository)));
        }
        if let Some(p) = state.board.pipelines.iter_mut().find(|p| &p.id == pipeline) {
            p.cards.insert(
                0,
                Card {
                    number: issue,
                    repository_id: Some(repository.clone()),
                },
            );
        }
        Ok(())
    }
}
