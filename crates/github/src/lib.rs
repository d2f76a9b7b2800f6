//! Shunt source-control adapter for GitHub.
//!
//! Implements the [`board::LinkedIssueSource`] trait with one GraphQL query:
//! the first ten closing-issue references of a pull request, each with its
//! number and the owning repository's `databaseId` (the id ZenHub uses).
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Query text, bearer authentication, GraphQL error
//! handling, and response decoding live here. The [`board`] crate sees only
//! [`board::LinkedIssueSource`] and [`board::UpstreamError`].
//!
//! ## Limitations
//!
//! No pagination: closing references past the tenth are silently dropped.

mod client;
mod error;
mod query;

pub use client::{GithubClient, DEFAULT_GRAPHQL_URL};
pub use error::GithubError;
pub use query::{LINKED_ISSUES_PAGE_SIZE, LINKED_ISSUES_QUERY};
