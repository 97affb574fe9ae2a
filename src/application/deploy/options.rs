//! Deploy Options
//!
//! Configuration types for deploy operations.

use std::path::PathBuf;

use crate::application::profiles::ProfileSelection;

/// Options for one deploy call
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Project root receiving the artifacts
    pub project: PathBuf,
    /// Collection to take artifacts from; `None` searches every collection
    pub collection: Option<String>,
    /// Profiles to deploy under
    pub profiles: ProfileSelection,
    /// Replace existing content without asking
    pub overwrite: bool,
}

impl DeployOptions {
    pub fn new(project: impl Into<PathBuf>) -> Self {
        Self {
            project: project.into(),
            collection: None,
            profiles: ProfileSelection::default(),
            overwrite: false,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_profiles(mut self, profiles: ProfileSelection) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}
