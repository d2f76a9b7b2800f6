//! Issue-reference extraction from free text.
//!
//! Three patterns are tried in a fixed order and the first one that matches
//! anywhere in the text decides the result:
//!
//! 1. `#123`
//! 2. `owner/issues#123` (the repository segment is the literal `issues`)
//! 3. `https://github.com/owner/repo/issues/123`
//!
//! A matching pattern is final. If its number cannot be turned into an
//! [`IssueNumber`] the text yields nothing, even when a later pattern would
//! have matched.
//!
//! Digit and word classes are ASCII only: `#５` is not a reference, and an
//! owner must be made of `[A-Za-z0-9_]`.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::{IssueNumber, IssueReference, IssueRepository};

/// Which shape of reference a pattern recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceShape {
    /// `#123`
    Hash,
    /// `owner/issues#123`
    OwnerIssues,
    /// `https://github.com/owner/repo/issues/123`
    IssueUrl,
}

/// A compiled pattern plus the shape it captures.
#[derive(Debug, Clone)]
struct ReferencePattern {
    shape: ReferenceShape,
    regex: Regex,
}

impl ReferencePattern {
    fn to_reference(&self, caps: &Captures<'_>) -> Option<IssueReference> {
        let number = IssueNumber::parse(caps.name("number")?.as_str())?;
        let repository = match self.shape {
            ReferenceShape::Hash => None,
            ReferenceShape::OwnerIssues | ReferenceShape::IssueUrl => {
                match (caps.name("owner"), caps.name("name")) {
                    (Some(owner), Some(name)) => Some(IssueRepository::Named {
                        owner: owner.as_str().to_string(),
                        name: name.as_str().to_string(),
                    }),
                    _ => None,
                }
            }
        };
        Some(IssueReference { number, repository })
    }
}

/// Ordered set of reference patterns.
#[derive(Debug, Clone)]
pub struct ReferenceExtractor {
    patterns: Vec<ReferencePattern>,
}

impl ReferenceExtractor {
    /// Compiles the built-in patterns.
    ///
    /// # Panics
    ///
    /// Only if a built-in pattern is malformed. The patterns are constants
    /// compiled by every test in this module, so this cannot happen at run
    /// time.
    pub fn new() -> Self {
        let compile = |shape, source: &str| ReferencePattern {
            shape,
            regex: Regex::new(source).expect("built-in reference pattern must compile"),
        };
        Self {
            patterns: vec![
                compile(ReferenceShape::Hash, r"(?i)#(?P<number>[0-9]+)"),
                compile(
                    ReferenceShape::OwnerIssues,
                    r"(?i)(?P<owner>[A-Za-z0-9_]+)/(?P<name>issues)#(?P<number>[0-9]+)",
                ),
                compile(
                    ReferenceShape::IssueUrl,
                    r"(?i)https?://github\.com/(?P<owner>[A-Za-z0-9_]+)/(?P<name>[A-Za-z0-9_]+)/issues/(?P<number>[0-9]+)",
                ),
            ],
        }
    }

    /// Returns the reference found by the first matching pattern.
    ///
    /// `None` means no pattern matched, or the first matching pattern did not
    /// yield a positive issue number.
    pub fn extract(&self, text: &str) -> Option<IssueReference> {
        for pattern in &self.patterns {
            if let Some(caps) = pattern.regex.captures(text) {
                let reference = pattern.to_reference(&caps);
                debug!(shape = ?pattern.shape, found = reference.is_some(), "Reference pattern matched");
                return reference;
            }
        }
        None
    }
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

static EXTRACTOR: LazyLock<ReferenceExtractor> = LazyLock::new(ReferenceExtractor::new);

/// Extracts one issue reference from `text` using the built-in patterns.
pub fn extract(text: &str) -> Option<IssueReference> {
    EXTRACTOR.extract(text)
}

/// Extracts a reference from each input, keeping hits in input order.
///
/// Inputs without a reference are skipped and logged.
pub fn extract_all<S: AsRef<str>>(inputs: &[S]) -> Vec<IssueReference> {
    inputs
        .iter()
        .filter_map(|input| {
            let input = input.as_ref();
            let found = extract(input);
            if found.is_none() {
                warn!(input = %input, "No issue reference found; entry skipped");
            }
            found
        })
        .collect()
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
