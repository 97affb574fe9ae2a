//! Drift classification
//!
//! Pure helpers shared by the single-record check and the batch status
//! computation: status values and result-key naming.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::domain::entities::DeploymentRecord;
use crate::domain::value_objects::{ArtifactType, ContentHash};

/// Drift state of one deployed copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    Synced,
    Modified,
}

impl DeploymentStatus {
    pub fn from_modified(modified: bool) -> Self {
        if modified {
            DeploymentStatus::Modified
        } else {
            DeploymentStatus::Synced
        }
    }

    pub fn is_modified(&self) -> bool {
        matches!(self, DeploymentStatus::Modified)
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentStatus::Synced => f.write_str("synced"),
            DeploymentStatus::Modified => f.write_str("modified"),
        }
    }
}

/// Compare a freshly computed hash with the one recorded at deploy time
pub fn classify(recorded: &ContentHash, current: &ContentHash) -> DeploymentStatus {
    DeploymentStatus::from_modified(recorded != current)
}

/// Result key for a record: `name::type`, or `name::type::profile` when the
/// artifact is deployed under more than one profile in the project.
pub fn status_key(record: &DeploymentRecord, multi_profile: bool) -> String {
    if multi_profile {
        format!(
            "{}::{}::{}",
            record.artifact_name,
            record.artifact_type,
            record.profile_id()
        )
    } else {
        format!("{}::{}", record.artifact_name, record.artifact_type)
    }
}

/// Keys for a batch of records, in the same order as `records`
pub fn status_keys(records: &[DeploymentRecord]) -> Vec<String> {
    let mut profiles: BTreeMap<(&str, ArtifactType), BTreeSet<&str>> = BTreeMap::new();
    for record in records {
        profiles
            .entry((record.artifact_name.as_str(), record.artifact_type))
            .or_default()
            .insert(record.profile_id());
    }

    records
        .iter()
        .map(|record| {
            let multi = profiles
                .get(&(record.artifact_name.as_str(), record.artifact_type))
                .is_some_and(|set| set.len() > 1);
            status_key(record, multi)
        })
        .collect()
}
