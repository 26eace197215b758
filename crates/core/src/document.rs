//! Document field validation and slug generation.

use crate::error::CoreError;
use crate::version::VersionBump;

/// Maximum length for a document title (characters).
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum length for a document description (characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 2_000;

/// Maximum length for a change log message (characters).
pub const MAX_CHANGE_LOG_LENGTH: usize = 1_000;

/// Maximum length for document content (characters).
pub const MAX_CONTENT_LENGTH: usize = 500_000;

/// Change log recorded on a document's first snapshot.
pub const INITIAL_CHANGE_LOG: &str = "Initial version";

// ---------------------------------------------------------------------------
// Slug generation
// ---------------------------------------------------------------------------

/// Generate a URL-safe slug from a document title.
///
/// Lowercases, maps every non-alphanumeric character to a hyphen, collapses
/// runs of hyphens, and trims leading/trailing hyphens.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut prev_hyphen = true; // swallow leading hyphens
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Derive the title of a duplicated document from its source title.
pub fn duplicate_title(source_title: &str) -> String {
    format!("{source_title} (copy)")
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a document title (non-empty, bounded length).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a slug (non-empty, lowercase alphanumeric and hyphens only).
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".into()));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "Slug must contain only lowercase alphanumeric characters and hyphens".into(),
        ));
    }
    Ok(())
}

/// Validate document content length.
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Content must be at most {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional description.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Require a usable change log message when an edit creates a new version.
///
/// Returns the trimmed message. Edits with `bump = none` do not create a
/// snapshot and therefore do not require a message; `None` is returned for
/// them regardless of input.
pub fn require_change_log(
    bump: VersionBump,
    change_log: Option<&str>,
) -> Result<Option<String>, CoreError> {
    if bump == VersionBump::None {
        return Ok(None);
    }
    let message = change_log.map(str::trim).unwrap_or_default();
    if message.is_empty() {
        return Err(CoreError::MissingChangeLog);
    }
    if message.chars().count() > MAX_CHANGE_LOG_LENGTH {
        return Err(CoreError::Validation(format!(
            "Change log must be at most {MAX_CHANGE_LOG_LENGTH} characters"
        )));
    }
    Ok(Some(message.to_string()))
}
