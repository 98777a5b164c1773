//! Text normalization and content fingerprints.
//!
//! The fingerprint is the cache key for a text: two texts that normalize
//! to the same string share one cache entry.

use sha2::{Digest, Sha256};

/// Maximum number of characters of a text that is classified.
pub const MAX_TEXT_CHARS: usize = 500;

/// Prefix applied to every fingerprint.
const KEY_PREFIX: &str = "sentiment:";

/// Normalize text for classification and fingerprinting.
///
/// Keeps the first [`MAX_TEXT_CHARS`] characters, replaces line breaks
/// with spaces and trims surrounding whitespace.
pub fn normalize(text: &str) -> String {
    let truncated: String = text
        .chars()
        .take(MAX_TEXT_CHARS)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    truncated.trim().to_string()
}

/// 128-bit content fingerprint of already-normalized text.
///
/// The first 16 bytes of SHA-256, hex encoded, behind a fixed prefix.
/// Stable across processes, so it can key an external store too.
pub fn fingerprint(normalized: &str) -> String {
    let digest = Sha256::digest(normalized.as_bytes());
    let hex: String = digest[..16].iter().map(|b| format!("{b:02x}")).collect();
    format!("{KEY_PREFIX}{hex}")
}
