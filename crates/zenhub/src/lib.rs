//! Shunt board-service adapter for ZenHub.
//!
//! Implements the [`board::BoardService`] trait over ZenHub's REST API:
//!
//! - `GET  /p2/workspaces/{workspace}/repositories/{repository}/board`
//! - `POST /p2/workspaces/{workspace}/repositories/{repository}/issues/{issue}/moves`
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** URL construction, the `X-Authentication-Token` header,
//! payload shapes, and status handling all live here. The [`board`] crate
//! sees only [`board::BoardService`] and [`board::UpstreamError`].
//!
//! The token is attached to each request individually; the underlying
//! `reqwest::Client` carries no credentials.

mod client;
mod error;
mod wire;

pub use client::{ZenhubClient, DEFAULT_API_URL};
pub use error::ZenhubError;
pub use wire::{CardPosition, MoveRequest};
