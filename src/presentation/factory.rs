//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::{DeploymentManager, VersionGraphBuilder};
use crate::config::Config;
use crate::domain::ports::{ConfirmOverwrite, ContentHasher, DeployEventSink};
use crate::infrastructure::{
    LocalCollection, Sha256Hasher, TomlDeploymentStore, TomlProfileStore, TomlRegistryRepository,
};

/// Hasher honoring the configured per-hash deadline
pub fn create_hasher(config: &Config) -> Arc<dyn ContentHasher> {
    Arc::new(Sha256Hasher::with_timeout(config.hash_timeout()))
}

/// Registry at the configured path, or the default location
pub fn create_registry(config: &Config) -> Arc<TomlRegistryRepository> {
    Arc::new(match config.registry_path() {
        Some(path) => TomlRegistryRepository::with_path(path),
        None => TomlRegistryRepository::new(),
    })
}

pub fn registry_path(config: &Config) -> PathBuf {
    create_registry(config).path().clone()
}

/// Create a deployment manager with all dependencies wired up
///
/// `events` and `confirm` come from the caller since they depend on how the
/// process was started (JSON mode, attached terminal).
pub fn create_deployment_manager(
    config: &Config,
    events: Arc<dyn DeployEventSink>,
    confirm: Arc<dyn ConfirmOverwrite>,
) -> DeploymentManager {
    let hasher = create_hasher(config);
    DeploymentManager::new(
        Arc::new(LocalCollection::new(config.collections_dir())),
        Arc::new(TomlDeploymentStore::new(hasher.clone())),
        hasher,
        Arc::new(TomlProfileStore::new()),
    )
    .with_registry(create_registry(config))
    .with_events(events)
    .with_confirm(confirm)
    .with_workers(config.worker_count())
    .with_status_workers(config.status_workers())
}

/// Create a version graph builder that discovers projects through the registry
pub fn create_graph_builder(config: &Config) -> VersionGraphBuilder {
    let hasher = create_hasher(config);
    VersionGraphBuilder::new(
        Arc::new(LocalCollection::new(config.collections_dir())),
        Arc::new(TomlDeploymentStore::new(hasher.clone())),
        hasher,
        create_registry(config),
    )
    .with_ttl(config.graph_ttl())
    .with_workers(config.worker_count())
}
