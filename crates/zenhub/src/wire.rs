//! ZenHub request and response payloads.

use board::{Board, Card, IssueNumber, Pipeline, PipelineId, RepositoryId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ZenhubError;

/// Where a moved card is placed in its destination pipeline.
///
/// Shunt always moves to the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardPosition {
    /// First position in the pipeline.
    Top,
}

/// Body of the card-move request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRequest<'a> {
    /// Destination pipeline.
    pub pipeline_id: &'a str,
    /// Placement within the destination.
    pub position: CardPosition,
}

impl<'a> MoveRequest<'a> {
    /// A move to the top of `pipeline`.
    pub fn to_top(pipeline: &'a PipelineId) -> Self {
        Self {
            pipeline_id: pipeline.as_str(),
            position: CardPosition::Top,
        }
    }
}

// ---------------------------------------------------------------------------
// Board response
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct BoardResponse {
    pipelines: Vec<PipelineNode>,
}

/// Only `id` and `name` are required. Cards are decoded one by one so that a
/// malformed card never fails the board read.
#[derive(Debug, Deserialize)]
struct PipelineNode {
    id: String,
    name: String,
    #[serde(default)]
    issues: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct IssueNode {
    #[serde(default)]
    issue_number: Option<u64>,
    #[serde(default)]
    repo_id: Option<u64>,
}

fn card(raw: serde_json::Value) -> Option<Card> {
    let node = match serde_json::from_value::<IssueNode>(raw) {
        Ok(node) => node,
        Err(err) => {
            debug!(error = %err, "Skipping unreadable card");
            return None;
        }
    };
    Some(Card {
        number: node.issue_number.and_then(IssueNumber::new)?,
        repository_id: node.repo_id.and_then(|r| RepositoryId::new(r.to_string())),
    })
}

impl BoardResponse {
    /// Converts the payload into the domain [`Board`], keeping board order.
    pub(crate) fn into_board(self) -> Result<Board, ZenhubError> {
        let pipelines = self
            .pipelines
            .into_iter()
            .map(|node| {
                let id = PipelineId::new(node.id).ok_or_else(|| {
                    ZenhubError::Payload(format!("pipeline '{}' has an empty id", node.name))
                })?;
                let cards = node.issues.into_iter().filter_map(card).collect();
                Ok(Pipeline {
                    id,
                    name: node.name,
                    cards,
                })
            })
            .collect::<Result<Vec<_>, ZenhubError>>()?;
        Ok(Board { pipelines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_request_serialises_to_fixed_shape() {
        let pipeline = PipelineId::new("5d1a").unwrap();
        let body = serde_json::to_value(MoveRequest::to_top(&pipeline)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "pipeline_id": "5d1a", "position": "top" })
        );
    }

    #[test]
    fn board_response_keeps_order_and_ignores_unknown_fields() {
        let raw = r#"{
            "pipelines": [
                { "id": "a1", "name": "To Do", "issues": [
                    { "issue_number": 12, "estimate": { "value": 3 }, "position": 0, "is_epic": false }
                ] },
                { "id": "b2", "name": "Done ✅", "issues": [] }
            ],
            "epics": []
        }"#;
        let board = serde_json::from_str::<BoardResponse>(raw)
            .unwrap()
            .into_board()
            .unwrap();

        let names: Vec<&str> = board.pipelines.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["To Do", "Done ✅"]);
        assert_eq!(board.pipelines[0].cards[0].number.as_u64(), 12);
        assert_eq!(board.pipelines[0].cards[0].repository_id, None);
    }

    #[test]
    fn pipeline_without_issues_field_parses() {
        let raw = r#"{ "pipelines": [ { "id": "x", "name": "Backlog" } ] }"#;
        let board = serde_json::from_str::<BoardResponse>(raw)
            .unwrap()
            .into_board()
            .unwrap();
        assert!(board.pipelines[0].cards.is_empty());
    }

    #[test]
    fn card_repository_id_is_kept_when_reported() {
        let raw = r#"{ "pipelines": [ { "id": "x", "name": "Backlog",
            "issues": [ { "issue_number": 4, "repo_id": 987 } ] } ] }"#;
        let board = serde_json::from_str::<BoardResponse>(raw)
            .unwrap()
            .into_board()
            .unwrap();
        assert_eq!(
            board.pipelines[0].cards[0].repository_id.as_ref().map(|r| r.as_str()),
            Some("987")
        );
    }

    #[test]
    fn malformed_cards_are_skipped_without_failing_the_board() {
        let raw = r#"{ "pipelines": [
            { "id": "a1", "name": "In Progress", "issues": [
                { "issue_number": "seven" },
                { "repo_id": 5 },
                { "issue_number": 0 },
                null,
                { "issue_number": 8, "repo_id": "abc" },
                { "issue_number": 3 }
            ] },
            { "id": "b2", "name": "Done" }
        ] }"#;
        let board = serde_json::from_str::<BoardResponse>(raw)
            .unwrap()
            .into_board()
            .unwrap();

        let numbers: Vec<u64> = board.pipelines[0]
            .cards
            .iter()
            .map(|c| c.number.as_u64())
            .collect();
        assert_eq!(numbers, vec![3]);
        assert_eq!(board.pipelines[1].id.as_str(), "b2");
    }

    #[test]
    fn empty_pipeline_id_is_a_payload_error() {
        let raw = r#"{ "pipelines": [ { "id": "", "name": "Ghost" } ] }"#;
        let err = serde_json::from_str::<BoardResponse>(raw)
            .unwrap()
            .into_board()
            .unwrap_err();
        assert!(matches!(err, ZenhubError::Payload(_)));
        assert!(err.to_string().contains("Ghost"));
    }
}
