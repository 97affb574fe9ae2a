//! ProfileStore port - persisted deployment profiles per project
//!
//! Failures here are never fatal: the profile resolver falls back to
//! synthesized profiles.

use std::path::{Path, PathBuf};

use crate::domain::entities::DeploymentProfile;

pub trait ProfileStore: Send + Sync {
    fn list_profiles(&self, project: &Path) -> Result<Vec<DeploymentProfile>, ProfileStoreError>;

    fn save_profile(
        &self,
        project: &Path,
        profile: &DeploymentProfile,
    ) -> Result<(), ProfileStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("profile store unavailable: {message}")]
    Unavailable { message: String },

    #[error("profile file corrupted: {path}: {message}")]
    Corrupted { path: PathBuf, message: String },
}
