//! Newtype domain identifiers.
//!
//! Each identity that crosses a port boundary is a distinct newtype so that,
//! for example, a [`WorkspaceId`] can never be passed where a [`RepositoryId`]
//! is expected even though both are opaque strings on the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: board service (opaque strings)
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies a ZenHub workspace.
    WorkspaceId
}

string_id! {
    /// Identifies a repository as the board service knows it.
    ///
    /// For ZenHub this is the numeric GitHub repository id (`databaseId`),
    /// carried as a string because the board treats it as opaque.
    RepositoryId
}

string_id! {
    /// Identifies a pipeline (column) on a board.
    PipelineId
}

string_id! {
    /// A human-readable pipeline name, or a fragment of one.
    ///
    /// Resolution matches by substring, so `"Done"` selects `"Done ✅"`.
    PipelineName
}

// ---------------------------------------------------------------------------
// Identifiers: source-control host
// ---------------------------------------------------------------------------

string_id! {
    /// URL of a GitHub pull request, e.g. `https://github.com/acme/app/pull/7`.
    PullRequestUrl
}

// ---------------------------------------------------------------------------

/// A GitHub issue number.
///
/// Always strictly positive; `#0` is not an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IssueNumber(u64);

impl IssueNumber {
    /// Creates an issue number, returning `None` for zero.
    #[must_use]
    pub fn new(value: u64) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Parses a decimal digit string.
    ///
    /// Returns `None` for an empty string, zero, or a value that overflows `u64`.
    #[must_use]
    pub fn parse(digits: &str) -> Option<Self> {
        digits.parse::<u64>().ok().and_then(Self::new)
    }

    /// Returns the underlying integer value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single invocation of the orchestrator.
///
/// Generated fresh for every run and recorded on the `run` span so all log
/// lines from one CI step can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_ids_are_rejected() {
        assert!(WorkspaceId::new("").is_none());
        assert!(PipelineName::new(String::new()).is_none());
        assert_eq!(RepositoryId::new("123").unwrap().as_str(), "123");
    }

    #[test]
    fn issue_number_rejects_zero_and_overflow() {
        assert_eq!(IssueNumber::parse("42").map(IssueNumber::as_u64), Some(42));
        assert_eq!(IssueNumber::parse("0"), None);
        assert_eq!(IssueNumber::parse(""), None);
        assert_eq!(IssueNumber::parse("99999999999999999999999"), None);
    }

    #[test]
    fn run_ids_are_distinct() {
        assert_ne!(RunId::new_random(), RunId::new_random());
    }
}
