//! Per-batch path hash cache
//!
//! Keyed by normalized absolute path. Each entry is initialized at most once,
//! so two records resolving to the same location never hash it twice, even
//! when workers reach it concurrently.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::domain::value_objects::{normalize_lexically, ContentHash};
use crate::error::TetherError;

pub type CachedHash = Result<ContentHash, Arc<TetherError>>;

#[derive(Default)]
pub struct PathHashCache {
    entries: Mutex<HashMap<PathBuf, Arc<OnceLock<CachedHash>>>>,
}

impl PathHashCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash for `path`, computing it with `compute` only on first request
    pub fn get_or_compute(
        &self,
        path: &Path,
        compute: impl FnOnce() -> Result<ContentHash, TetherError>,
    ) -> CachedHash {
        let slot = {
            let mut entries = self.entries.lock();
            entries
                .entry(normalize_lexically(path))
                .or_default()
                .clone()
        };
        slot.get_or_init(|| compute().map_err(Arc::new)).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}
