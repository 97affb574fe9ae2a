//! Deploy Result
//!
//! Per-item outcomes of deploy and undeploy operations.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::value_objects::{ArtifactId, ContentHash};

/// One artifact copied under one profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployedItem {
    pub artifact: ArtifactId,
    pub profile_id: String,
    pub destination: PathBuf,
    pub content_hash: ContentHash,
}

/// One artifact × profile pair left untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    pub artifact: ArtifactId,
    pub profile_id: String,
    pub reason: String,
}

/// One artifact × profile pair that failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployFailure {
    pub artifact: ArtifactId,
    /// Empty when the artifact failed before a profile was chosen
    pub profile_id: String,
    pub reason: String,
}

/// Result of a deploy operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    pub deployed: Vec<DeployedItem>,
    pub skipped: Vec<SkippedItem>,
    pub failed: Vec<DeployFailure>,
}

impl DeployReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn has_changes(&self) -> bool {
        !self.deployed.is_empty()
    }
}

/// Result of an undeploy operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UndeployReport {
    pub artifact: ArtifactId,
    /// On-disk copies that existed and were removed
    pub removed_paths: Vec<PathBuf>,
    pub removed_records: usize,
}
