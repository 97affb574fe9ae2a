//! Profile resolution
//!
//! Decides which deployment profiles apply to a project. Resolution never fails
//! for a project without profile metadata: a default `claude_code` profile is
//! created, and when the store itself is unusable profiles are synthesized from
//! the platform table.

use std::path::Path;
use std::sync::Arc;

use crate::domain::entities::DeploymentProfile;
use crate::domain::ports::ProfileStore;
use crate::error::{TetherError, TetherResult};

/// Which profiles a caller wants
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProfileSelection {
    /// The project's primary profile
    #[default]
    Primary,
    /// Every profile known for the project
    All,
    /// One named profile; unknown ids are an error
    Explicit(String),
}

impl ProfileSelection {
    pub fn from_args(profile: Option<&str>, all: bool) -> Self {
        match (profile, all) {
            (Some(id), _) => ProfileSelection::Explicit(id.to_string()),
            (None, true) => ProfileSelection::All,
            (None, false) => ProfileSelection::Primary,
        }
    }
}

pub struct ProfileResolver {
    store: Arc<dyn ProfileStore>,
}

impl ProfileResolver {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub fn resolve(
        &self,
        project: &Path,
        selection: &ProfileSelection,
    ) -> TetherResult<Vec<DeploymentProfile>> {
        let profiles = match self.store.list_profiles(project) {
            Ok(profiles) => profiles,
            Err(e) => {
                tracing::warn!(
                    project = %project.display(),
                    error = %e,
                    "profile store unavailable; using built-in profiles"
                );
                return Ok(vec![synthesize(selection)]);
            }
        };

        let profiles = if profiles.is_empty() {
            vec![self.create_default(project)]
        } else {
            profiles
        };

        match selection {
            ProfileSelection::All => Ok(profiles),
            ProfileSelection::Primary => Ok(vec![primary_of(profiles)]),
            ProfileSelection::Explicit(id) => profiles
                .into_iter()
                .find(|p| p.profile_id == *id)
                .map(|p| vec![p])
                .ok_or_else(|| TetherError::ProfileNotFound {
                    profile_id: id.clone(),
                    project: project.to_path_buf(),
                }),
        }
    }

    /// Persist the default profile; a failed save still yields the profile
    fn create_default(&self, project: &Path) -> DeploymentProfile {
        let profile = DeploymentProfile::default_primary();
        match self.store.save_profile(project, &profile) {
            Ok(()) => tracing::debug!(project = %project.display(), "created default profile"),
            Err(e) => tracing::warn!(
                project = %project.display(),
                error = %e,
                "could not persist default profile"
            ),
        }
        profile
    }
}

fn synthesize(selection: &ProfileSelection) -> DeploymentProfile {
    match selection {
        ProfileSelection::Explicit(id) => DeploymentProfile::fallback(id),
        ProfileSelection::All | ProfileSelection::Primary => DeploymentProfile::default_primary(),
    }
}

/// First profile flagged primary, else the first listed
fn primary_of(profiles: Vec<DeploymentProfile>) -> DeploymentProfile {
    let index = profiles.iter().position(|p| p.primary).unwrap_or(0);
    profiles
        .into_iter()
        .nth(index)
        .unwrap_or_else(DeploymentProfile::default_primary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ProfileStoreError;
    use crate::domain::value_objects::Platform;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[derive(Default)]
    struct MemoryStore {
        profiles: Mutex<HashMap<PathBuf, Vec<DeploymentProfile>>>,
        fail_saves: bool,
    }

    impl ProfileStore for MemoryStore {
        fn list_profiles(
            &self,
            project: &Path,
        ) -> Result<Vec<DeploymentProfile>, ProfileStoreError> {
            Ok(self
                .profiles
                .lock()
                .get(project)
                .cloned()
                .unwrap_or_default())
        }

        fn save_profile(
            &self,
            project: &Path,
            profile: &DeploymentProfile,
        ) -> Result<(), ProfileStoreError> {
            if self.fail_saves {
                return Err(ProfileStoreError::Unavailable {
                    message: "read-only".to_string(),
                });
            }
            self.profiles
                .lock()
                .entry(project.to_path_buf())
                .or_default()
                .push(profile.clone());
            Ok(())
        }
    }

    struct BrokenStore;

    impl ProfileStore for BrokenStore {
        fn list_profiles(&self, _: &Path) -> Result<Vec<DeploymentProfile>, ProfileStoreError> {
            Err(ProfileStoreError::Unavailable {
                message: "no such table".to_string(),
            })
        }

        fn save_profile(&self, _: &Path, _: &DeploymentProfile) -> Result<(), ProfileStoreError> {
            Err(ProfileStoreError::Unavailable {
                message: "no such table".to_string(),
            })
        }
    }

    fn project() -> PathBuf {
        PathBuf::from("/work/project")
    }

    #[test]
    fn legacy_project_gets_default_primary() {
        let store = Arc::new(MemoryStore::default());
        let resolver = ProfileResolver::new(store.clone());

        let profiles = resolver
            .resolve(&project(), &ProfileSelection::Primary)
            .unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].profile_id, "claude_code");
        assert_eq!(store.list_profiles(&project()).unwrap().len(), 1);
    }

    #[test]
    fn all_returns_every_profile() {
        let store = Arc::new(MemoryStore::default());
        store
            .save_profile(&project(), &DeploymentProfile::default_primary())
            .unwrap();
        store
            .save_profile(&project(), &DeploymentProfile::fallback("codex"))
            .unwrap();
        let resolver = ProfileResolver::new(store);

        let all = resolver.resolve(&project(), &ProfileSelection::All).unwrap();
        assert_eq!(all.len(), 2);

        let primary = resolver
            .resolve(&project(), &ProfileSelection::Primary)
            .unwrap();
        assert_eq!(primary[0].profile_id, "claude_code");
    }

    #[test]
    fn unknown_explicit_profile_is_an_error() {
        let resolver = ProfileResolver::new(Arc::new(MemoryStore::default()));
        let err = resolver
            .resolve(&project(), &ProfileSelection::Explicit("gemini".to_string()))
            .unwrap_err();
        assert!(matches!(err, TetherError::ProfileNotFound { .. }));
    }

    #[test]
    fn failed_save_still_resolves() {
        let store = Arc::new(MemoryStore {
            fail_saves: true,
            ..MemoryStore::default()
        });
        let resolver = ProfileResolver::new(store);
        let profiles = resolver.resolve(&project(), &ProfileSelection::All).unwrap();
        assert_eq!(profiles[0].profile_id, "claude_code");
    }

    #[test]
    fn broken_store_synthesizes_from_platform_table() {
        let resolver = ProfileResolver::new(Arc::new(BrokenStore));

        let explicit = resolver
            .resolve(&project(), &ProfileSelection::Explicit("codex".to_string()))
            .unwrap();
        assert_eq!(explicit[0].platform, Platform::Codex);
        assert_eq!(explicit[0].root_dir, ".codex");

        let other = resolver
            .resolve(&project(), &ProfileSelection::Explicit("zed".to_string()))
            .unwrap();
        assert_eq!(other[0].root_dir, ".zed");

        let primary = resolver
            .resolve(&project(), &ProfileSelection::Primary)
            .unwrap();
        assert_eq!(primary[0].root_dir, ".claude");
    }

    #[test]
    fn selection_from_args() {
        assert_eq!(
            ProfileSelection::from_args(Some("codex"), true),
            ProfileSelection::Explicit("codex".to_string())
        );
        assert_eq!(ProfileSelection::from_args(None, true), ProfileSelection::All);
        assert_eq!(
            ProfileSelection::from_args(None, false),
            ProfileSelection::Primary
        );
    }
}
