//! Project registry ports
//!
//! Deploys register their project so version graphs know where to look.

use std::path::PathBuf;

use crate::domain::entities::{ProjectEntry, Registry};

/// Global list of projects that have received deployments
pub trait RegistryRepository: Send + Sync {
    fn load(&self) -> Result<Registry, RegistryError>;
    fn save(&self, registry: &Registry) -> Result<(), RegistryError>;

    /// Insert or refresh one project under the registry lock
    fn update_project(&self, entry: ProjectEntry) -> Result<(), RegistryError>;

    /// Forget projects whose directory is gone; returns what was removed
    fn prune(&self) -> Result<Vec<PathBuf>, RegistryError>;
}

/// Enumerates candidate project roots for graph building
pub trait ProjectDiscovery: Send + Sync {
    fn discover_projects(&self) -> Result<Vec<PathBuf>, RegistryError>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("failed to access project registry: {message}")]
    AccessError { message: String },

    #[error("failed to serialize project registry: {message}")]
    SerializationError { message: String },

    #[error(
        "registry file corrupted: {path}\n  → Fix: remove it, the next deploy recreates it\n  → Run: rm {path} && tether deploy\n  → Details: {message}"
    )]
    Corrupted { path: PathBuf, message: String },
}
