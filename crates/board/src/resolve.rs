//! Target pipeline resolution.

use tracing::{debug, info};

use crate::{
    AuthToken, BoardService, PipelineId, PipelineTarget, RepositoryId, ShuntError, WorkspaceId,
};

/// Turns a [`PipelineTarget`] into a concrete [`PipelineId`].
///
/// An explicit id is returned without touching the board. A name is matched
/// as a case-sensitive substring against the board's pipelines and the first
/// hit in board order wins; an ambiguous fragment therefore resolves to the
/// earliest pipeline rather than failing.
///
/// # Errors
///
/// - [`ShuntError::PipelineNotFound`] when no pipeline name contains the fragment.
/// - [`ShuntError::Upstream`] when the board read fails.
pub async fn resolve_pipeline(
    target: &PipelineTarget,
    board: &dyn BoardService,
    token: &AuthToken,
    workspace: &WorkspaceId,
    repository: &RepositoryId,
) -> Result<PipelineId, ShuntError> {
    let name = match target {
        PipelineTarget::Id(id) => {
            debug!(pipeline_id = %id, "Using explicit pipeline id");
            return Ok(id.clone());
        }
        PipelineTarget::Name(name) => name,
    };

    let state = board.fetch_board(token, workspace, repository).await?;
    match state.find_by_name_fragment(name) {
        Some(pipeline) => {
            info!(
                pipeline_name = %pipeline.name,
                pipeline_id = %pipeline.id,
                searched = %name,
                "Resolved pipeline by name"
            );
            Ok(pipeline.id.clone())
        }
        None => Err(ShuntError::PipelineNotFound { name: name.clone() }),
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::memory::InMemoryBoard;
    use crate::{PipelineName, UpstreamError};

    #[fixture]
    fn board() -> InMemoryBoard {
        InMemoryBoard::with_pipelines([
            ("p-todo", "To Do"),
            ("p-progress", "In Progress"),
            ("p-done", "Done ✅"),
        ])
    }

    fn scope() -> (AuthToken, WorkspaceId, RepositoryId) {
        (
            AuthToken::new("zh").unwrap(),
            WorkspaceId::new("ws").unwrap(),
            RepositoryId::new("100").unwrap(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn explicit_id_is_returned_without_reading_the_board(board: InMemoryBoard) {
        let (token, ws, repo) = scope();
        let target = PipelineTarget::Id(PipelineId::new("anything").unwrap());

        let id = resolve_pipeline(&target, &board, &token, &ws, &repo)
            .await
            .unwrap();

        assert_eq!(id.as_str(), "anything");
        assert_eq!(board.board_reads(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn name_fragment_resolves_by_substring(board: InMemoryBoard) {
        let (token, ws, repo) = scope();
        let target = PipelineTarget::Name(PipelineName::new("Done").unwrap());

        let id = resolve_pipeline(&target, &board, &token, &ws, &repo)
            .await
            .unwrap();

        assert_eq!(id.as_str(), "p-done");
        assert_eq!(board.board_reads(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn ambiguous_fragment_picks_first_pipeline(board: InMemoryBoard) {
        let (token, ws, repo) = scope();
        // "o" occurs in "To Do", "In Progress" and "Done ✅".
        let target = PipelineTarget::Name(PipelineName::new("o").unwrap());

        let id = resolve_pipeline(&target, &board, &token, &ws, &repo)
            .await
            .unwrap();

        assert_eq!(id.as_str(), "p-todo");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_name_is_not_found(board: InMemoryBoard) {
        let (token, ws, repo) = scope();
        let target = PipelineTarget::Name(PipelineName::new("Shipped").unwrap());

        let err = resolve_pipeline(&target, &board, &token, &ws, &repo)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ShuntError::PipelineNotFound {
                name: PipelineName::new("Shipped").unwrap()
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn board_read_failure_propagates(board: InMemoryBoard) {
        let (token, ws, repo) = scope();
        board.fail_board_reads(UpstreamError::board("HTTP 401 Unauthorized"));
        let target = PipelineTarget::Name(PipelineName::new("Done").unwrap());

        let err = resolve_pipeline(&target, &board, &token, &ws, &repo)
            .await
            .unwrap_err();

        assert!(matches!(err, ShuntError::Upstream(_)));
    }
}
