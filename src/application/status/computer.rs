//! Batch drift computation
//!
//! Each record is checked independently, cheapest evidence first:
//!
//! 0. missing on disk → synced
//! 1. directory whose file count differs from the count recorded at deploy → modified
//! 2. hash already computed for the same location in this batch → reuse
//! 3. full content hash compared with the recorded hash
//!
//! The outcome for every record equals the single-record check
//! (`DeploymentRepository::detect_modifications`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use super::cache::PathHashCache;
use crate::application::workers::{default_workers, map_bounded};
use crate::domain::entities::{DeploymentKey, DeploymentRecord};
use crate::domain::ports::ContentHasher;
use crate::domain::services::{classify, status_keys, DeploymentStatus};

/// A record whose status could not be determined
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusFailure {
    pub key: String,
    pub path: PathBuf,
    pub error: String,
}

/// Status of one record, with what's needed to write the result back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStatus {
    pub key: String,
    pub profile_root: String,
    pub identity: DeploymentKey,
    pub status: DeploymentStatus,
}

/// Outcome of one batch call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub statuses: BTreeMap<String, DeploymentStatus>,
    pub failures: Vec<StatusFailure>,
    #[serde(skip)]
    pub records: Vec<RecordStatus>,
}

impl StatusReport {
    pub fn get(&self, key: &str) -> Option<DeploymentStatus> {
        self.statuses.get(key).copied()
    }

    pub fn modified(&self) -> impl Iterator<Item = &str> {
        self.statuses
            .iter()
            .filter(|(_, status)| status.is_modified())
            .map(|(key, _)| key.as_str())
    }
}

/// Which tier settled a record; logged at debug level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Missing,
    FileCount,
    Hash,
}

pub struct StatusComputer {
    hasher: Arc<dyn ContentHasher>,
    workers: usize,
}

impl StatusComputer {
    pub fn new(hasher: Arc<dyn ContentHasher>) -> Self {
        Self {
            hasher,
            workers: default_workers(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Compute statuses for `records` deployed under `project`.
    ///
    /// Keys are derived from the whole record set, so the profile filter never
    /// changes how a surviving record is named.
    pub fn compute(
        &self,
        project: &Path,
        records: &[DeploymentRecord],
        profile_filter: Option<&str>,
    ) -> StatusReport {
        let keys = status_keys(records);
        let selected: Vec<(String, &DeploymentRecord)> = keys
            .into_iter()
            .zip(records)
            .filter(|(_, r)| profile_filter.map_or(true, |p| r.profile_id() == p))
            .collect();

        let cache = PathHashCache::new();
        let outcomes = map_bounded(self.workers, &selected, |(_, record)| {
            self.check(project, record, &cache)
        });

        let mut report = StatusReport::default();
        for ((key, record), outcome) in selected.into_iter().zip(outcomes) {
            match outcome {
                Ok((status, tier)) => {
                    tracing::debug!(key = %key, ?tier, %status, "status resolved");
                    report.statuses.insert(key.clone(), status);
                    report.records.push(RecordStatus {
                        key,
                        profile_root: record.root_dir(),
                        identity: record.key(),
                        status,
                    });
                }
                Err(error) => {
                    let path = record.absolute_path(project);
                    tracing::warn!(key = %key, path = %path.display(), %error, "status check failed");
                    report.failures.push(StatusFailure {
                        key,
                        path,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            project = %project.display(),
            checked = report.statuses.len(),
            failed = report.failures.len(),
            hashed_paths = cache.len(),
            "status batch complete"
        );
        report
    }

    fn check(
        &self,
        project: &Path,
        record: &DeploymentRecord,
        cache: &PathHashCache,
    ) -> Result<(DeploymentStatus, Tier), String> {
        let path = record.absolute_path(project);

        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(_) => return Ok((DeploymentStatus::Synced, Tier::Missing)),
        };

        if let (true, Some(expected)) = (metadata.is_dir(), record.file_count) {
            match self.hasher.count_files(&path) {
                Ok(actual) if actual != expected => {
                    return Ok((DeploymentStatus::Modified, Tier::FileCount));
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "file count unavailable"),
            }
        }

        match cache.get_or_compute(&path, || self.hasher.hash(&path)) {
            Ok(current) => Ok((classify(&record.content_hash, &current), Tier::Hash)),
            Err(e) if e.is_not_found() => Ok((DeploymentStatus::Synced, Tier::Missing)),
            Err(e) => Err(e.to_string()),
        }
    }
}
