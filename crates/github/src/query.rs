//! The linked-issues query and its response shape.

use board::{IssueNumber, IssueReference, RepositoryId};
use serde::Deserialize;

use crate::GithubError;

/// Number of closing references requested; later ones are not fetched.
pub const LINKED_ISSUES_PAGE_SIZE: u32 = 10;

/// GraphQL document resolving a pull-request URL to its closing issues.
pub const LINKED_ISSUES_QUERY: &str = r#"
    query LinkedIssues($url: URI!) {
        resource(url: $url) {
            ... on PullRequest {
                closingIssuesReferences(first: 10) {
                    nodes {
                        number
                        repository { databaseId }
                    }
                }
            }
        }
    }
"#;

/// GraphQL response wrapper
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub(crate) data: Option<T>,
    pub(crate) errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub(crate) message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LinkedIssuesData {
    resource: Option<ResourceNode>,
}

/// `resource` decodes to an empty object when the URL is not a pull request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceNode {
    closing_issues_references: Option<IssueConnection>,
}

#[derive(Debug, Deserialize)]
struct IssueConnection {
    nodes: Vec<Option<IssueNode>>,
}

#[derive(Debug, Deserialize)]
struct IssueNode {
    number: u64,
    repository: RepositoryNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    database_id: Option<u64>,
}

impl<T> GraphQlResponse<T> {
    /// Returns `data`, or the joined `errors` messages when present.
    pub(crate) fn into_data(self) -> Result<T, GithubError> {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(GithubError::GraphQl(message));
        }
        self.data.ok_or(GithubError::NoData)
    }
}

impl LinkedIssuesData {
    /// Converts the query result into references, in the host's order.
    ///
    /// Null nodes and zero issue numbers are skipped.
    pub(crate) fn into_references(self, pr_url: &str) -> Result<Vec<IssueReference>, GithubError> {
        let connection = self
            .resource
            .and_then(|r| r.closing_issues_references)
            .ok_or_else(|| GithubError::NotAPullRequest(pr_url.to_string()))?;

        Ok(connection
            .nodes
            .into_iter()
            .flatten()
            .filter_map(|node| {
                let number = IssueNumber::new(node.number)?;
                let repository = node
                    .repository
                    .database_id
                    .and_then(|id| RepositoryId::new(id.to_string()));
                Some(IssueReference {
                    number,
                    repository: repository.map(board::IssueRepository::Id),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PR: &str = "https://github.com/acme/app/pull/7";

    fn parse(raw: &str) -> Result<Vec<IssueReference>, GithubError> {
        serde_json::from_str::<GraphQlResponse<LinkedIssuesData>>(raw)
            .unwrap()
            .into_data()?
            .into_references(PR)
    }

    #[test]
    fn query_requests_first_ten_closing_references() {
        assert!(LINKED_ISSUES_QUERY.contains(&format!(
            "closingIssuesReferences(first: {LINKED_ISSUES_PAGE_SIZE})"
        )));
        assert!(LINKED_ISSUES_QUERY.contains("databaseId"));
    }

    #[test]
    fn closing_references_keep_host_order_and_repository() {
        let raw = r#"{ "data": { "resource": { "closingIssuesReferences": { "nodes": [
            { "number": 12, "repository": { "databaseId": 111 } },
            { "number": 3,  "repository": { "databaseId": 222 } }
        ] } } } }"#;

        let refs = parse(raw).unwrap();

        let got: Vec<(u64, Option<&str>)> = refs
            .iter()
            .map(|r| (r.number.as_u64(), r.repository_id().map(RepositoryId::as_str)))
            .collect();
        assert_eq!(got, vec![(12, Some("111")), (3, Some("222"))]);
    }

    #[test]
    fn duplicates_are_not_removed() {
        let raw = r#"{ "data": { "resource": { "closingIssuesReferences": { "nodes": [
            { "number": 5, "repository": { "databaseId": 1 } },
            { "number": 5, "repository": { "databaseId": 1 } }
        ] } } } }"#;
        assert_eq!(parse(raw).unwrap().len(), 2);
    }

    #[test]
    fn empty_connection_yields_no_references() {
        let raw = r#"{ "data": { "resource": { "closingIssuesReferences": { "nodes": [] } } } }"#;
        assert!(parse(raw).unwrap().is_empty());
    }

    #[test]
    fn unusable_nodes_are_dropped_and_missing_database_id_is_tolerated() {
        let raw = r#"{ "data": { "resource": { "closingIssuesReferences": { "nodes": [
            null,
            { "number": 0, "repository": { "databaseId": 4 } },
            { "number": 9, "repository": { "databaseId": null } }
        ] } } } }"#;
        let refs = parse(raw).unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].number.as_u64(), 9);
        assert_eq!(refs[0].repository, None);
    }

    #[test]
    fn non_pull_request_resource_is_an_error() {
        let raw = r#"{ "data": { "resource": {} } }"#;
        let err = parse(raw).unwrap_err();
        assert_eq!(err.to_string(), format!("No pull request at {PR}"));

        let raw = r#"{ "data": { "resource": null } }"#;
        assert!(matches!(parse(raw), Err(GithubError::NotAPullRequest(_))));
    }

    #[test]
    fn graphql_errors_are_joined() {
        let raw = r#"{ "data": null, "errors": [
            { "message": "Could not resolve to a Resource" },
            { "message": "Something else", "type": "NOT_FOUND" }
        ] }"#;
        let err = parse(raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "GraphQL error: Could not resolve to a Resource; Something else"
        );
    }

    #[test]
    fn missing_data_without_errors_is_reported() {
        assert!(matches!(parse(r#"{ "data": null }"#), Err(GithubError::NoData)));
    }
}
