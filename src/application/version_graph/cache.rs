//! Version graph cache
//!
//! Entries live for a fixed TTL. Reads of a valid entry only take the shared
//! lock. A rebuild holds a per-key mutex, so concurrent callers that find the
//! same entry missing or expired wait for one build instead of each running it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use crate::domain::entities::VersionGraph;
use crate::domain::value_objects::ArtifactId;
use crate::error::TetherResult;

/// Default time a built graph stays valid
pub const DEFAULT_GRAPH_TTL: Duration = Duration::from_secs(300);

/// Artifact plus the collection filter the graph was built with
pub type GraphKey = (ArtifactId, Option<String>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub ttl_seconds: u64,
}

struct CacheEntry {
    graph: Arc<VersionGraph>,
    built_at: Instant,
}

pub struct GraphCache {
    ttl: Duration,
    entries: RwLock<HashMap<GraphKey, CacheEntry>>,
    builds: Mutex<HashMap<GraphKey, Arc<Mutex<()>>>>,
}

impl GraphCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            builds: Mutex::new(HashMap::new()),
        }
    }

    fn is_valid(&self, entry: &CacheEntry) -> bool {
        entry.built_at.elapsed() < self.ttl
    }

    fn lookup(&self, key: &GraphKey) -> Option<Arc<VersionGraph>> {
        self.entries
            .read()
            .get(key)
            .filter(|entry| self.is_valid(entry))
            .map(|entry| entry.graph.clone())
    }

    /// Cached graph for `key`, running `build` at most once per expiry
    pub fn get_or_build(
        &self,
        key: GraphKey,
        build: impl FnOnce() -> TetherResult<VersionGraph>,
    ) -> TetherResult<Arc<VersionGraph>> {
        if let Some(graph) = self.lookup(&key) {
            return Ok(graph);
        }

        let build_lock = self.builds.lock().entry(key.clone()).or_default().clone();
        let _building = build_lock.lock();

        if let Some(graph) = self.lookup(&key) {
            return Ok(graph);
        }

        let graph = Arc::new(build()?);
        self.entries.write().insert(
            key,
            CacheEntry {
                graph: graph.clone(),
                built_at: Instant::now(),
            },
        );
        Ok(graph)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
        self.builds.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        let valid_entries = entries.values().filter(|e| self.is_valid(e)).count();
        CacheStats {
            total_entries: entries.len(),
            valid_entries,
            expired_entries: entries.len() - valid_entries,
            ttl_seconds: self.ttl.as_secs(),
        }
    }
}

impl Default for GraphCache {
    fn default() -> Self {
        Self::new(DEFAULT_GRAPH_TTL)
    }
}
