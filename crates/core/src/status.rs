//! Editorial status lifecycle for documents.
//!
//! Documents move draft → review → published → archived. Archived is
//! terminal: reactivation is a new-document operation (duplicate), not a
//! transition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Editorial status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Review,
    Published,
    Archived,
}

/// Status assigned to a newly created document.
pub const INITIAL_STATUS: DocumentStatus = DocumentStatus::Draft;

impl DocumentStatus {
    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Review => "review",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "review" => Ok(Self::Review),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            other => Err(CoreError::Validation(format!(
                "Unknown document status '{other}'"
            ))),
        }
    }
}

/// Returns the set of statuses that `from` may transition to.
///
/// Transition rules:
/// - `draft`     -> `review` (submit for review), `published`, `archived`
/// - `review`    -> `published`, `archived`
/// - `published` -> `archived`
/// - `archived`  -> (terminal)
pub fn valid_transitions(from: DocumentStatus) -> &'static [DocumentStatus] {
    use DocumentStatus::*;
    match from {
        Draft => &[Review, Published, Archived],
        Review => &[Published, Archived],
        Published => &[Archived],
        Archived => &[],
    }
}

/// Validate that a status transition from `from` to `to` is allowed.
pub fn validate_transition(from: DocumentStatus, to: DocumentStatus) -> Result<(), CoreError> {
    if valid_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition { from, to })
    }
}

/// Whether entering `to` should stamp `published_at`.
///
/// Only the first transition into `published` sets the timestamp; later
/// re-publishes and archival keep the original first-published provenance.
pub fn marks_published(to: DocumentStatus) -> bool {
    to == DocumentStatus::Published
}
