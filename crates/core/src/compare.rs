//! Version comparison: chronological ordering, field-level diffs, and a
//! line-level content diff for the history UI.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};
use crate::version::VersionNumber;

/// Fields reported in every field-level comparison.
pub const TRACKED_FIELDS: &[&str] = &["title", "content"];

/// The subset of snapshot state the comparison engine needs.
///
/// The repository layer builds these from `document_versions` rows; keeping
/// the type borrowed avoids cloning full content payloads just to diff them.
#[derive(Debug, Clone, Copy)]
pub struct VersionRef<'a> {
    pub document_id: DbId,
    pub version_number: VersionNumber,
    pub created_at: Timestamp,
    pub title: &'a str,
    pub content: &'a str,
}

/// Before/after state of one tracked field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub field: &'static str,
    pub old_value: String,
    pub new_value: String,
    pub changed: bool,
}

/// Result of comparing two snapshots of the same document.
#[derive(Debug, Clone)]
pub struct Comparison<'a> {
    pub older: VersionRef<'a>,
    pub newer: VersionRef<'a>,
    pub field_diffs: Vec<FieldDiff>,
}

/// Compare two snapshots, normalizing their order.
///
/// Ordering is by `created_at`, ties broken by version number, so the result
/// is independent of argument order. Snapshots of different documents fail
/// with [`CoreError::CrossDocumentComparison`].
pub fn compare_versions<'a>(
    a: VersionRef<'a>,
    b: VersionRef<'a>,
) -> Result<Comparison<'a>, CoreError> {
    if a.document_id != b.document_id {
        return Err(CoreError::CrossDocumentComparison);
    }

    let (older, newer) = if (a.created_at, a.version_number) <= (b.created_at, b.version_number) {
        (a, b)
    } else {
        (b, a)
    };

    let field_diffs = vec![
        diff_field("title", older.title, newer.title),
        diff_field("content", older.content, newer.content),
    ];

    Ok(Comparison {
        older,
        newer,
        field_diffs,
    })
}

fn diff_field(field: &'static str, old_value: &str, new_value: &str) -> FieldDiff {
    FieldDiff {
        field,
        old_value: old_value.to_string(),
        new_value: new_value.to_string(),
        changed: old_value != new_value,
    }
}

// ---------------------------------------------------------------------------
// Line-level content diff
// ---------------------------------------------------------------------------

/// The type of a line in a diff result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffLineType {
    Added,
    Removed,
    Unchanged,
}

/// A single line in a diff result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub line_type: DiffLineType,
    pub content: String,
}

/// Compute a line-level diff between two content payloads using LCS.
pub fn compute_line_diff(old: &str, new: &str) -> Vec<DiffLine> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let m = old_lines.len();
    let n = new_lines.len();

    // Longest-common-subsequence table.
    let mut lcs = vec![vec![0u32; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            lcs[i][j] = if old_lines[i - 1] == new_lines[j - 1] {
                lcs[i - 1][j - 1] + 1
            } else {
                lcs[i - 1][j].max(lcs[i][j - 1])
            };
        }
    }

    // Backtrack from the bottom-right corner to emit the diff.
    let mut result = Vec::new();
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old_lines[i - 1] == new_lines[j - 1] {
            result.push(DiffLine {
                line_type: DiffLineType::Unchanged,
                content: old_lines[i - 1].to_string(),
            });
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || lcs[i][j - 1] >= lcs[i - 1][j]) {
            result.push(DiffLine {
                line_type: DiffLineType::Added,
                content: new_lines[j - 1].to_string(),
            });
            j -= 1;
        } else {
            result.push(DiffLine {
                line_type: DiffLineType::Removed,
                content: old_lines[i - 1].to_string(),
            });
            i -= 1;
        }
    }

    result.reverse();
    result
}
