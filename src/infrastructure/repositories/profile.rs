//! TOML Profile Store
//!
//! Persists deployment profiles per project at `<project>/.tether/profiles.toml`:
//!
//! ```toml
//! [[profiles]]
//! profile_id = "claude_code"
//! platform = "claude_code"
//! root_dir = ".claude"
//! primary = true
//!
//! [profiles.artifact_path_map]
//! skill = "skills"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::DeploymentProfile;
use crate::domain::ports::{ProfileStore, ProfileStoreError};
use crate::domain::value_objects::{ArtifactType, Platform};
use crate::error::TetherError;
use crate::infrastructure::fs::atomic_write;

/// Project-local directory holding tether's own state
pub const PROJECT_STATE_DIR: &str = ".tether";

const PROFILES_FILE: &str = "profiles.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlProfile {
    profile_id: String,
    #[serde(default)]
    platform: Option<Platform>,
    #[serde(default)]
    root_dir: Option<String>,
    #[serde(default)]
    primary: bool,
    /// Keyed by artifact type name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    artifact_path_map: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TomlProfiles {
    #[serde(default)]
    profiles: Vec<TomlProfile>,
}

impl TomlProfile {
    fn decode(self, path: &Path) -> Result<DeploymentProfile, ProfileStoreError> {
        let platform = self
            .platform
            .unwrap_or_else(|| Platform::from_profile_id(&self.profile_id));
        let mut profile = DeploymentProfile::for_platform(self.profile_id, platform);
        if let Some(root) = self.root_dir {
            profile.root_dir = root;
        }
        for (kind, dir) in self.artifact_path_map {
            let artifact_type: ArtifactType =
                kind.parse().map_err(|e: TetherError| {
                    ProfileStoreError::Corrupted {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    }
                })?;
            profile.artifact_path_map.insert(artifact_type, dir);
        }
        profile.primary = self.primary;
        Ok(profile)
    }
}

impl From<&DeploymentProfile> for TomlProfile {
    fn from(profile: &DeploymentProfile) -> Self {
        Self {
            profile_id: profile.profile_id.clone(),
            platform: Some(profile.platform),
            root_dir: Some(profile.root_dir.clone()),
            primary: profile.primary,
            artifact_path_map: profile
                .artifact_path_map
                .iter()
                .map(|(kind, dir)| (kind.as_str().to_string(), dir.clone()))
                .collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TomlProfileStore;

impl TomlProfileStore {
    pub fn new() -> Self {
        Self
    }

    pub fn profiles_path(project: &Path) -> PathBuf {
        project.join(PROJECT_STATE_DIR).join(PROFILES_FILE)
    }

    fn load(&self, project: &Path) -> Result<TomlProfiles, ProfileStoreError> {
        let path = Self::profiles_path(project);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(TomlProfiles::default()),
            Err(e) => {
                return Err(ProfileStoreError::Unavailable {
                    message: e.to_string(),
                })
            }
        };
        toml::from_str(&content).map_err(|e| ProfileStoreError::Corrupted {
            path,
            message: e.to_string(),
        })
    }
}

impl ProfileStore for TomlProfileStore {
    fn list_profiles(&self, project: &Path) -> Result<Vec<DeploymentProfile>, ProfileStoreError> {
        let path = Self::profiles_path(project);
        self.load(project)?
            .profiles
            .into_iter()
            .map(|raw| raw.decode(&path))
            .collect()
    }

    /// Insert or replace by `profile_id`
    fn save_profile(
        &self,
        project: &Path,
        profile: &DeploymentProfile,
    ) -> Result<(), ProfileStoreError> {
        let mut file = self.load(project)?;
        let entry = TomlProfile::from(profile);
        match file
            .profiles
            .iter_mut()
            .find(|p| p.profile_id == profile.profile_id)
        {
            Some(existing) => *existing = entry,
            None => file.profiles.push(entry),
        }

        let content =
            toml::to_string_pretty(&file).map_err(|e| ProfileStoreError::Unavailable {
                message: e.to_string(),
            })?;
        atomic_write(&Self::profiles_path(project), content.as_bytes()).map_err(|e| {
            ProfileStoreError::Unavailable {
                message: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_lists_nothing() {
        let dir = tempdir().unwrap();
        assert!(TomlProfileStore::new()
            .list_profiles(dir.path())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn save_replaces_by_id() {
        let dir = tempdir().unwrap();
        let store = TomlProfileStore::new();

        let mut profile = DeploymentProfile::fallback("codex");
        store.save_profile(dir.path(), &profile).unwrap();
        profile.root_dir = ".codex-alt".to_string();
        store.save_profile(dir.path(), &profile).unwrap();
        store
            .save_profile(dir.path(), &DeploymentProfile::default_primary())
            .unwrap();

        let profiles = store.list_profiles(dir.path()).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].root_dir, ".codex-alt");
        assert!(profiles[1].primary);
    }

    #[test]
    fn sparse_entries_fill_from_platform_table() {
        let dir = tempdir().unwrap();
        let path = TomlProfileStore::profiles_path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"
[[profiles]]
profile_id = "cursor"

[profiles.artifact_path_map]
command = "rules"
"#,
        )
        .unwrap();

        let profiles = TomlProfileStore::new().list_profiles(dir.path()).unwrap();
        assert_eq!(profiles[0].platform, Platform::Cursor);
        assert_eq!(profiles[0].root_dir, ".cursor");
        assert_eq!(profiles[0].directory_for(ArtifactType::Command), "rules");
        assert_eq!(profiles[0].directory_for(ArtifactType::Skill), "skills");
    }

    #[test]
    fn corrupted_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = TomlProfileStore::profiles_path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[[profiles]\n").unwrap();

        let err = TomlProfileStore::new()
            .list_profiles(dir.path())
            .unwrap_err();
        assert!(matches!(err, ProfileStoreError::Corrupted { .. }));
    }
}
