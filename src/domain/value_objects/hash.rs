//! Content Hash Value Object
//!
//! A validated, immutable hash representing the content of a file or directory tree.
//! Used for drift detection and version lineage.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Content hash value object
///
/// Wraps a lowercase 64-character SHA-256 hex string. Legacy values carrying a
/// `sha256:` prefix are accepted and normalized on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Prefix used by older record files
    pub const LEGACY_PREFIX: &'static str = "sha256:";

    /// Length of a SHA-256 digest in hex
    pub const HEX_LEN: usize = 64;

    /// Create a ContentHash from a hex string (with or without legacy prefix)
    pub fn new(raw: &str) -> Self {
        let hex = raw.strip_prefix(Self::LEGACY_PREFIX).unwrap_or(raw);
        Self(hex.trim().to_ascii_lowercase())
    }

    /// Finish a running SHA-256 computation
    pub fn from_digest(hasher: Sha256) -> Self {
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Hash an in-memory buffer
    pub fn from_bytes(content: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(content)))
    }

    /// Get the hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this is a well-formed 64-char lowercase hex digest
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == Self::HEX_LEN && self.0.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Check if this hash matches a raw string (with or without prefix)
    pub fn matches_str(&self, s: &str) -> bool {
        *self == Self::new(s)
    }

    /// Short form for display (first 12 chars)
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ContentHash {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&str> for ContentHash {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
