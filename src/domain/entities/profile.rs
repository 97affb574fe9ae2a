//! Deployment profile entity
//!
//! A profile is the convention one tool uses inside a project: a root directory
//! (e.g. `.claude`) plus where each artifact type lives beneath it.

use std::collections::BTreeMap;

use crate::domain::entities::DEFAULT_PROFILE_ID;
use crate::domain::value_objects::{ArtifactType, PathError, Platform, SafePath};

/// Deployment target convention for one tool in one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentProfile {
    pub profile_id: String,
    pub platform: Platform,
    /// Directory under the project root, e.g. `.claude`
    pub root_dir: String,
    /// Artifact type → directory under `root_dir`
    pub artifact_path_map: BTreeMap<ArtifactType, String>,
    /// The profile used when the caller doesn't name one
    pub primary: bool,
}

impl DeploymentProfile {
    /// Profile for a platform using its conventional root and layout
    pub fn for_platform(profile_id: impl Into<String>, platform: Platform) -> Self {
        let profile_id = profile_id.into();
        let root_dir = platform.default_root_dir(&profile_id);
        Self {
            profile_id,
            platform,
            root_dir,
            artifact_path_map: default_path_map(),
            primary: false,
        }
    }

    /// Profile synthesized from the static table when nothing is persisted
    pub fn fallback(profile_id: &str) -> Self {
        Self::for_platform(profile_id, Platform::from_profile_id(profile_id))
    }

    /// The default `claude_code` profile created for legacy projects
    pub fn default_primary() -> Self {
        let mut profile = Self::for_platform(DEFAULT_PROFILE_ID, Platform::ClaudeCode);
        profile.primary = true;
        profile
    }

    /// Directory (relative to `root_dir`) holding artifacts of this type
    pub fn directory_for(&self, artifact_type: ArtifactType) -> &str {
        self.artifact_path_map
            .get(&artifact_type)
            .map(String::as_str)
            .unwrap_or_else(|| artifact_type.directory_name())
    }

    /// Relative path (within the profile root) where an artifact lands.
    ///
    /// `entry_name` is the file or directory name of the artifact in its collection.
    pub fn relative_destination(
        &self,
        artifact_type: ArtifactType,
        entry_name: &str,
    ) -> Result<SafePath, PathError> {
        let dir = self.directory_for(artifact_type).trim_matches('/');
        if dir.is_empty() {
            SafePath::new(entry_name)
        } else {
            SafePath::new(format!("{}/{}", dir, entry_name))
        }
    }
}

fn default_path_map() -> BTreeMap<ArtifactType, String> {
    ArtifactType::ALL
        .iter()
        .map(|t| (*t, t.directory_name().to_string()))
        .collect()
}
