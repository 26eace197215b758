//! Content integrity: SHA-256 digests and payload sizing.
//!
//! Every snapshot stores the digest and sizes computed here, so stored
//! content can be verified independently of the database that holds it.

use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Number of Unicode characters in a content payload (what editors report).
pub fn content_length(content: &str) -> i64 {
    content.chars().count() as i64
}

/// UTF-8 byte length of a content payload (what storage and digests cover).
pub fn file_size_bytes(content: &str) -> i64 {
    content.len() as i64
}

/// Verify content against an externally supplied digest.
///
/// Used on import/verification paths where a caller presents a checksum it
/// recorded earlier.
pub fn verify_checksum(content: &str, expected: &str) -> Result<(), CoreError> {
    let computed = sha256_hex(content.as_bytes());
    if computed == expected {
        Ok(())
    } else {
        Err(CoreError::IntegrityMismatch {
            expected: expected.to_string(),
            computed,
        })
    }
}
