//! Deployment entity - the tracked fact that an artifact was copied into a project
//!
//! Records are pure data. Persistence (one TOML file per project × profile root)
//! lives in `infrastructure::repositories::deployment`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{ArtifactType, ContentHash, Platform, SafePath};

/// Profile id assumed for records written before multi-profile support
pub const DEFAULT_PROFILE_ID: &str = "claude_code";

/// Maximum number of hashes kept in `version_lineage`
pub const MAX_LINEAGE: usize = 50;

/// One deployed artifact in one project under one profile
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentRecord {
    pub artifact_name: String,
    pub artifact_type: ArtifactType,
    pub source_collection_name: String,
    pub deployed_at: DateTime<Utc>,
    /// Path inside the profile root (e.g. `skills/review`)
    pub relative_path: SafePath,
    /// Hash of the deployed copy at deploy/sync time
    pub content_hash: ContentHash,
    pub local_modifications: bool,
    /// Collection hash this deployment was made from
    pub parent_hash: Option<ContentHash>,
    /// Newest first
    pub version_lineage: Vec<ContentHash>,
    pub last_modified_check: Option<DateTime<Utc>>,
    pub modification_detected_at: Option<DateTime<Utc>>,
    pub merge_base_snapshot: Option<ContentHash>,
    pub deployment_profile_id: Option<String>,
    pub platform: Option<Platform>,
    pub profile_root_dir: Option<String>,
    pub artifact_uuid: Option<String>,
    /// Files observed under a directory artifact at deploy time
    pub file_count: Option<u64>,
}

impl DeploymentRecord {
    /// Create a record with the required fields; everything else starts empty.
    pub fn new(
        artifact_name: impl Into<String>,
        artifact_type: ArtifactType,
        source_collection_name: impl Into<String>,
        relative_path: SafePath,
        content_hash: ContentHash,
    ) -> Self {
        Self {
            artifact_name: artifact_name.into(),
            artifact_type,
            source_collection_name: source_collection_name.into(),
            deployed_at: Utc::now(),
            relative_path,
            content_hash,
            local_modifications: false,
            parent_hash: None,
            version_lineage: Vec::new(),
            last_modified_check: None,
            modification_detected_at: None,
            merge_base_snapshot: None,
            deployment_profile_id: None,
            platform: None,
            profile_root_dir: None,
            artifact_uuid: None,
            file_count: None,
        }
    }

    pub fn with_profile(
        mut self,
        profile_id: impl Into<String>,
        platform: Platform,
        root_dir: impl Into<String>,
    ) -> Self {
        self.deployment_profile_id = Some(profile_id.into());
        self.platform = Some(platform);
        self.profile_root_dir = Some(root_dir.into());
        self
    }

    /// Profile id, defaulting for legacy records
    pub fn profile_id(&self) -> &str {
        self.deployment_profile_id
            .as_deref()
            .unwrap_or(DEFAULT_PROFILE_ID)
    }

    /// Profile root directory, derived from the platform table when not stored
    pub fn root_dir(&self) -> String {
        match &self.profile_root_dir {
            Some(root) => root.clone(),
            None => {
                let profile_id = self.profile_id();
                self.platform
                    .unwrap_or_else(|| Platform::from_profile_id(profile_id))
                    .default_root_dir(profile_id)
            }
        }
    }

    /// On-disk location of the deployed copy
    pub fn absolute_path(&self, project: &Path) -> PathBuf {
        project
            .join(self.root_dir())
            .join(self.relative_path.as_path())
    }

    pub fn key(&self) -> DeploymentKey {
        DeploymentKey {
            artifact_name: self.artifact_name.clone(),
            artifact_type: self.artifact_type,
            profile_id: self.profile_id().to_string(),
        }
    }

    /// Match on name and type, and on profile when one is given
    pub fn matches(&self, name: &str, artifact_type: ArtifactType, profile: Option<&str>) -> bool {
        self.artifact_name == name
            && self.artifact_type == artifact_type
            && profile.map_or(true, |p| self.profile_id() == p)
    }

    /// Prepend a hash to the lineage, dropping an older duplicate
    pub fn push_lineage(&mut self, hash: ContentHash) {
        self.version_lineage.retain(|h| *h != hash);
        self.version_lineage.insert(0, hash);
        self.version_lineage.truncate(MAX_LINEAGE);
    }
}

/// Identity of a record within a project: name, type and profile
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeploymentKey {
    pub artifact_name: String,
    pub artifact_type: ArtifactType,
    pub profile_id: String,
}

/// All records held by one record file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeploymentSet {
    records: Vec<DeploymentRecord>,
}

impl DeploymentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<DeploymentRecord>) -> Self {
        let mut set = Self::new();
        for record in records {
            set.upsert(record);
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Replace the record with the same identity in place, else append.
    ///
    /// Returns true when an existing record was replaced.
    pub fn upsert(&mut self, record: DeploymentRecord) -> bool {
        let key = record.key();
        match self.records.iter_mut().find(|r| r.key() == key) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => {
                self.records.push(record);
                false
            }
        }
    }

    /// Remove matching records; returns how many were removed
    pub fn remove(&mut self, name: &str, artifact_type: ArtifactType, profile: Option<&str>) -> usize {
        let before = self.records.len();
        self.records
            .retain(|r| !r.matches(name, artifact_type, profile));
        before - self.records.len()
    }

    pub fn get(
        &self,
        name: &str,
        artifact_type: ArtifactType,
        profile: Option<&str>,
    ) -> Option<&DeploymentRecord> {
        self.records
            .iter()
            .find(|r| r.matches(name, artifact_type, profile))
    }

    pub fn get_mut(
        &mut self,
        key: &DeploymentKey,
    ) -> Option<&mut DeploymentRecord> {
        self.records.iter_mut().find(|r| r.key() == *key)
    }

    pub fn records(&self) -> &[DeploymentRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DeploymentRecord> {
        self.records
    }
}
