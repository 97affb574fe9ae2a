//! ContentHasher port - deterministic hashing of deployed content
//!
//! Kept behind a trait so batch drift checks and graph builds can share one
//! implementation and tests can count invocations.

use std::path::Path;

use crate::domain::value_objects::ContentHash;
use crate::error::TetherResult;

pub trait ContentHasher: Send + Sync {
    /// Hash a file, or a directory as sorted (relative path, bytes) pairs.
    ///
    /// Fails with `NotFound` when the path is absent and `InvalidPath` when it is
    /// neither a file nor a directory.
    fn hash(&self, path: &Path) -> TetherResult<ContentHash>;

    /// Count regular files under a directory using metadata only (1 for a file).
    fn count_files(&self, path: &Path) -> TetherResult<u64>;
}
