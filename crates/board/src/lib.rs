//! Core domain for Shunt.
//!
//! Shunt runs as a CI step: it finds the issues a commit message or pull
//! request refers to and moves their cards on a ZenHub board into a target
//! pipeline. This crate holds every domain concept, the extraction and
//! resolution rules, the port traits, and the orchestrator. Infrastructure
//! crates implement the ports; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; the `zenhub` and `github` crates define *how*
//! to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`WorkspaceId`, `PipelineId`, `IssueNumber`, etc.) |
//! | [`types`] | Value types (`IssueReference`, `Board`, `PipelineTarget`, `RunReport`, etc.) |
//! | [`errors`] | `ShuntError` and `UpstreamError` |
//! | [`extract`] | Issue-reference extraction from free text |
//! | [`resolve`] | Pipeline id resolution by id or name fragment |
//! | [`ports`] | `BoardService` and `LinkedIssueSource` traits |
//! | [`run`] | The `Orchestrator` state machine |
//! | [`memory`] | In-memory `BoardService` double |

pub mod errors;
pub mod extract;
pub mod identifiers;
pub mod memory;
pub mod ports;
pub mod resolve;
pub mod run;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{ShuntError, UpstreamError, UpstreamService};
pub use extract::{extract, extract_all, ReferenceExtractor, ReferenceShape};
pub use identifiers::{
    IssueNumber, PipelineId, PipelineName, PullRequestUrl, RepositoryId, RunId, WorkspaceId,
};
pub use ports::{BoardService, LinkedIssueSource};
pub use resolve::resolve_pipeline;
pub use run::{Orchestrator, RunState};
pub use types::{
    AuthToken, Board, Card, IssueReference, IssueRepository, IssueSource, MoveOutcome, Pipeline,
    PipelineTarget, RunParameters, RunReport, Timestamp,
};
