//! TOML Deployment Store
//!
//! Implements the DeploymentRepository port. Each profile root inside a project
//! (e.g. `<project>/.claude`) holds one `.tether-deployed.toml`:
//!
//! ```toml
//! version = 1
//!
//! [[deployed]]
//! artifact_name = "pdf"
//! artifact_type = "skill"
//! content_hash = "2cf24dba..."
//! ```
//!
//! Writes to one file are serialized by an in-process mutex per path plus an
//! `fs2` lock file under `<project>/.tether/locks/`, and land atomically via
//! temp file + rename.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use fs2::FileExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{DeploymentKey, DeploymentRecord, DeploymentSet, DEFAULT_PROFILE_ID};
use crate::domain::ports::{ContentHasher, DeploymentRepository};
use crate::domain::value_objects::{
    ensure_within, validate_root_dir, ArtifactType, ContentHash, Platform, SafePath,
};
use crate::error::{TetherError, TetherResult};
use crate::infrastructure::fs::atomic_write;
use crate::infrastructure::repositories::PROJECT_STATE_DIR;

/// Record file name inside each profile root
pub const RECORD_FILE_NAME: &str = ".tether-deployed.toml";

/// Current record file format version
pub const RECORD_FORMAT_VERSION: u32 = 1;

/// TOML representation of one deployment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TomlDeploymentEntry {
    artifact_name: String,
    artifact_type: String,
    #[serde(default)]
    source_collection_name: String,
    deployed_at: DateTime<Utc>,
    relative_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_hash: Option<String>,
    /// Deprecated name for `content_hash`; read but never written
    #[serde(default, skip_serializing)]
    collection_sha: Option<String>,
    #[serde(default)]
    local_modifications: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    version_lineage: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_modified_check: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    modification_detected_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    merge_base_snapshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deployment_profile_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile_root_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artifact_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_count: Option<u64>,
}

/// TOML representation of a record file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlRecordFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    deployed: Vec<TomlDeploymentEntry>,
}

fn default_version() -> u32 {
    RECORD_FORMAT_VERSION
}

impl TomlDeploymentEntry {
    /// Decode with fallback: `content_hash` ← `collection_sha` for legacy records,
    /// `profile_root_dir` ← the directory the file was found in, and a missing
    /// `deployment_profile_id` ← the profile that root belongs to.
    fn decode(self, file_root: &str) -> TetherResult<DeploymentRecord> {
        let hash = self
            .content_hash
            .or(self.collection_sha)
            .ok_or_else(|| TetherError::MissingHash {
                artifact: self.artifact_name.clone(),
            })?;
        let artifact_type: ArtifactType = self.artifact_type.parse()?;
        let relative_path = SafePath::new(&self.relative_path).map_err(|e| {
            TetherError::validation(format!(
                "record '{}' has invalid relative_path '{}': {}",
                self.artifact_name, self.relative_path, e
            ))
        })?;

        let root_dir = self
            .profile_root_dir
            .unwrap_or_else(|| file_root.to_string());
        validate_root_dir(&root_dir).map_err(|e| {
            TetherError::validation(format!(
                "record '{}' has invalid profile_root_dir '{}': {}",
                self.artifact_name, root_dir, e
            ))
        })?;
        let deployment_profile_id = match self.deployment_profile_id {
            Some(id) => Some(id),
            None => {
                let inferred = Platform::profile_id_for_root_dir(&root_dir);
                (inferred != DEFAULT_PROFILE_ID).then_some(inferred)
            }
        };

        Ok(DeploymentRecord {
            artifact_name: self.artifact_name,
            artifact_type,
            source_collection_name: self.source_collection_name,
            deployed_at: self.deployed_at,
            relative_path,
            content_hash: ContentHash::new(&hash),
            local_modifications: self.local_modifications,
            parent_hash: self.parent_hash.as_deref().map(ContentHash::new),
            version_lineage: self
                .version_lineage
                .iter()
                .map(|h| ContentHash::new(h))
                .collect(),
            last_modified_check: self.last_modified_check,
            modification_detected_at: self.modification_detected_at,
            merge_base_snapshot: self.merge_base_snapshot.as_deref().map(ContentHash::new),
            deployment_profile_id,
            platform: self.platform,
            profile_root_dir: Some(root_dir),
            artifact_uuid: self.artifact_uuid,
            file_count: self.file_count,
        })
    }

    fn encode(record: &DeploymentRecord) -> Self {
        Self {
            artifact_name: record.artifact_name.clone(),
            artifact_type: record.artifact_type.as_str().to_string(),
            source_collection_name: record.source_collection_name.clone(),
            deployed_at: record.deployed_at,
            relative_path: record.relative_path.to_record_string(),
            content_hash: Some(record.content_hash.to_string()),
            collection_sha: None,
            local_modifications: record.local_modifications,
            parent_hash: record.parent_hash.as_ref().map(ToString::to_string),
            version_lineage: record
                .version_lineage
                .iter()
                .map(ToString::to_string)
                .collect(),
            last_modified_check: record.last_modified_check,
            modification_detected_at: record.modification_detected_at,
            merge_base_snapshot: record.merge_base_snapshot.as_ref().map(ToString::to_string),
            deployment_profile_id: record.deployment_profile_id.clone(),
            platform: record.platform,
            profile_root_dir: record.profile_root_dir.clone(),
            artifact_uuid: record.artifact_uuid.clone(),
            file_count: record.file_count,
        }
    }
}

/// TOML-backed deployment record store
pub struct TomlDeploymentStore {
    hasher: Arc<dyn ContentHasher>,
    file_locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl TomlDeploymentStore {
    pub fn new(hasher: Arc<dyn ContentHasher>) -> Self {
        Self {
            hasher,
            file_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Path of the record file for one profile root
    pub fn record_file(project: &Path, profile_root: &str) -> PathBuf {
        project.join(profile_root).join(RECORD_FILE_NAME)
    }

    /// Cross-process lock for one profile root's record file, kept out of the
    /// profile root itself
    pub fn lock_file(project: &Path, profile_root: &str) -> PathBuf {
        project
            .join(PROJECT_STATE_DIR)
            .join("locks")
            .join(format!("{}.lock", profile_root))
    }

    /// Profile roots under `project` that contain a record file, sorted
    pub fn discover_profile_roots(project: &Path) -> TetherResult<Vec<String>> {
        let entries = match fs::read_dir(project) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut roots = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if entry.path().join(RECORD_FILE_NAME).is_file() {
                roots.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        roots.sort();
        Ok(roots)
    }

    fn load_file(&self, project: &Path, profile_root: &str) -> TetherResult<DeploymentSet> {
        let path = Self::record_file(project, profile_root);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(DeploymentSet::new()),
            Err(e) => return Err(e.into()),
        };

        let corrupted = |message: String| TetherError::RecordFileCorrupted {
            path: path.clone(),
            message,
        };

        let file: TomlRecordFile =
            toml::from_str(&content).map_err(|e| corrupted(e.to_string()))?;
        if file.version > RECORD_FORMAT_VERSION {
            return Err(corrupted(format!(
                "unsupported format version {} (expected <= {})",
                file.version, RECORD_FORMAT_VERSION
            )));
        }

        let records = file
            .deployed
            .into_iter()
            .map(|entry| entry.decode(profile_root))
            .collect::<TetherResult<Vec<_>>>()
            .map_err(|e| match e {
                TetherError::MissingHash { .. } => e,
                other => corrupted(other.to_string()),
            })?;

        Ok(DeploymentSet::from_records(records))
    }

    fn save_file(
        &self,
        project: &Path,
        profile_root: &str,
        records: &DeploymentSet,
    ) -> TetherResult<()> {
        let file = TomlRecordFile {
            version: RECORD_FORMAT_VERSION,
            deployed: records
                .records()
                .iter()
                .map(TomlDeploymentEntry::encode)
                .collect(),
        };
        let content = toml::to_string_pretty(&file).map_err(|e| TetherError::Serialization {
            message: e.to_string(),
        })?;
        atomic_write(&Self::record_file(project, profile_root), content.as_bytes())
    }

    fn path_mutex(&self, path: &Path) -> Arc<Mutex<()>> {
        self.file_locks
            .lock()
            .entry(path.to_path_buf())
            .or_default()
            .clone()
    }

    /// Load, change and save one record file while holding both locks.
    ///
    /// The file is only rewritten when `apply` reports a change.
    fn mutate<T>(
        &self,
        project: &Path,
        profile_root: &str,
        apply: impl FnOnce(&mut DeploymentSet) -> (T, bool),
    ) -> TetherResult<T> {
        let root_path = ensure_within(project, Path::new(profile_root)).map_err(|_| {
            TetherError::PathEscape {
                path: project.join(profile_root),
                root: project.to_path_buf(),
            }
        })?;
        validate_root_dir(profile_root).map_err(|e| {
            TetherError::validation(format!("profile root '{}': {}", profile_root, e))
        })?;
        let record_path = root_path.join(RECORD_FILE_NAME);

        let mutex = self.path_mutex(&record_path);
        let _guard = mutex.lock();

        fs::create_dir_all(&root_path)?;
        let lock_path = Self::lock_file(project, profile_root);
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let lock_file = fs::File::create(&lock_path)?;
        lock_file.lock_exclusive()?;

        let result = self.load_file(project, profile_root).and_then(|mut set| {
            let (value, changed) = apply(&mut set);
            if changed {
                self.save_file(project, profile_root, &set)?;
            }
            Ok(value)
        });

        let _ = lock_file.unlock();
        result
    }
}

impl DeploymentRepository for TomlDeploymentStore {
    fn read_deployments(
        &self,
        project: &Path,
        profile_root: Option<&str>,
    ) -> TetherResult<Vec<DeploymentRecord>> {
        let roots = match profile_root {
            Some(root) => vec![root.to_string()],
            None => Self::discover_profile_roots(project)?,
        };

        let mut records = Vec::new();
        for root in roots {
            records.extend(self.load_file(project, &root)?.into_records());
        }
        Ok(records)
    }

    fn write_deployments(
        &self,
        project: &Path,
        profile_root: &str,
        records: &DeploymentSet,
    ) -> TetherResult<()> {
        let replacement = records.clone();
        self.mutate(project, profile_root, move |set| {
            *set = replacement;
            ((), true)
        })
    }

    fn record_deployment(&self, project: &Path, record: DeploymentRecord) -> TetherResult<()> {
        let root = record.root_dir();
        let replaced = self.mutate(project, &root, move |set| (set.upsert(record), true))?;
        tracing::debug!(project = %project.display(), root = %root, replaced, "recorded deployment");
        Ok(())
    }

    fn get_deployment(
        &self,
        project: &Path,
        name: &str,
        artifact_type: ArtifactType,
        profile: Option<&str>,
    ) -> TetherResult<Option<DeploymentRecord>> {
        Ok(self
            .read_deployments(project, None)?
            .into_iter()
            .find(|r| r.matches(name, artifact_type, profile)))
    }

    fn remove_deployment(
        &self,
        project: &Path,
        name: &str,
        artifact_type: ArtifactType,
        profile: Option<&str>,
    ) -> TetherResult<usize> {
        let mut removed = 0;
        for root in Self::discover_profile_roots(project)? {
            removed += self.mutate(project, &root, |set| {
                let count = set.remove(name, artifact_type, profile);
                (count, count > 0)
            })?;
        }
        Ok(removed)
    }

    fn detect_modifications(
        &self,
        project: &Path,
        record: &DeploymentRecord,
    ) -> TetherResult<bool> {
        let path = record.absolute_path(project);
        if fs::symlink_metadata(&path).is_err() {
            return Ok(false);
        }
        match self.hasher.hash(&path) {
            Ok(current) => Ok(current != record.content_hash),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn mark_checked(
        &self,
        project: &Path,
        results: &[(String, DeploymentKey, bool)],
        checked_at: DateTime<Utc>,
    ) -> TetherResult<()> {
        let mut by_root: BTreeMap<&str, Vec<(&DeploymentKey, bool)>> = BTreeMap::new();
        for (root, key, modified) in results {
            by_root
                .entry(root.as_str())
                .or_default()
                .push((key, *modified));
        }

        for (root, updates) in by_root {
            self.mutate(project, root, |set| {
                let mut changed = false;
                for (key, modified) in updates {
                    if let Some(record) = set.get_mut(key) {
                        if modified && !record.local_modifications {
                            record.modification_detected_at = Some(checked_at);
                        } else if !modified {
                            record.modification_detected_at = None;
                        }
                        record.local_modifications = modified;
                        record.last_modified_check = Some(checked_at);
                        changed = true;
                    }
                }
                ((), changed)
            })?;
        }
        Ok(())
    }
}
