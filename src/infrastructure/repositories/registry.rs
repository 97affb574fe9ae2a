//! TOML Registry Repository
//!
//! Persists the global registry at `~/.tether/registry.toml` and doubles as the
//! project discovery source for version graphs.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{ProjectEntry, Registry};
use crate::domain::ports::{ProjectDiscovery, RegistryError, RegistryRepository};
use crate::infrastructure::fs::{atomic_write, tether_data_dir};

/// Environment variable overriding the registry location
pub const REGISTRY_PATH_VAR: &str = "TETHER_REGISTRY_PATH";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlProjectEntry {
    path: PathBuf,
    last_deployed: DateTime<Utc>,
    #[serde(default)]
    deployment_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlRegistry {
    version: u32,
    #[serde(default)]
    projects: Vec<TomlProjectEntry>,
}

pub struct TomlRegistryRepository {
    path: PathBuf,
}

impl TomlRegistryRepository {
    pub fn new() -> Self {
        Self {
            path: default_registry_path(),
        }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn load_from_disk(&self) -> Result<Registry, RegistryError> {
        if !self.path.exists() {
            return Ok(Registry::new());
        }

        let content = fs::read_to_string(&self.path).map_err(access_error)?;
        let toml_reg: TomlRegistry =
            toml::from_str(&content).map_err(|e| RegistryError::Corrupted {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        Ok(from_toml(toml_reg))
    }

    fn save_to_disk(&self, registry: &Registry) -> Result<(), RegistryError> {
        let content = toml::to_string_pretty(&to_toml(registry)).map_err(|e| {
            RegistryError::SerializationError {
                message: e.to_string(),
            }
        })?;

        atomic_write(&self.path, content.as_bytes()).map_err(|e| RegistryError::AccessError {
            message: e.to_string(),
        })
    }

    /// Run `f` while holding the registry's exclusive file lock
    fn with_lock<T>(
        &self,
        f: impl FnOnce() -> Result<T, RegistryError>,
    ) -> Result<T, RegistryError> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(access_error)?;
        }

        let lock_file = fs::File::create(&lock_path).map_err(access_error)?;
        lock_file.lock_exclusive().map_err(access_error)?;

        let result = f();

        let _ = lock_file.unlock();
        result
    }
}

impl Default for TomlRegistryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryRepository for TomlRegistryRepository {
    fn load(&self) -> Result<Registry, RegistryError> {
        self.load_from_disk()
    }

    fn save(&self, registry: &Registry) -> Result<(), RegistryError> {
        self.with_lock(|| self.save_to_disk(registry))
    }

    fn update_project(&self, entry: ProjectEntry) -> Result<(), RegistryError> {
        self.with_lock(|| {
            let mut registry = self.load_from_disk()?;
            registry.upsert(entry);
            self.save_to_disk(&registry)
        })
    }

    fn prune(&self) -> Result<Vec<PathBuf>, RegistryError> {
        self.with_lock(|| {
            let mut registry = self.load_from_disk()?;
            let removed = registry.prune();
            if !removed.is_empty() {
                self.save_to_disk(&registry)?;
            }
            Ok(removed)
        })
    }
}

impl ProjectDiscovery for TomlRegistryRepository {
    /// Registered projects that still exist on disk
    fn discover_projects(&self) -> Result<Vec<PathBuf>, RegistryError> {
        Ok(self.load_from_disk()?.live_paths())
    }
}

/// Fixed list of projects, for callers that already know where to look
pub struct StaticProjects(pub Vec<PathBuf>);

impl ProjectDiscovery for StaticProjects {
    fn discover_projects(&self) -> Result<Vec<PathBuf>, RegistryError> {
        Ok(self.0.clone())
    }
}

fn access_error(e: std::io::Error) -> RegistryError {
    RegistryError::AccessError {
        message: e.to_string(),
    }
}

fn default_registry_path() -> PathBuf {
    if let Ok(path) = std::env::var(REGISTRY_PATH_VAR) {
        return PathBuf::from(path);
    }
    tether_data_dir().join("registry.toml")
}

fn from_toml(toml_registry: TomlRegistry) -> Registry {
    let mut registry = Registry::new();
    registry.version = toml_registry.version;
    registry.projects = toml_registry
        .projects
        .into_iter()
        .map(|p| ProjectEntry {
            path: p.path,
            last_deployed: p.last_deployed,
            deployment_count: p.deployment_count,
        })
        .collect();
    registry
}

fn to_toml(registry: &Registry) -> TomlRegistry {
    TomlRegistry {
        version: registry.version,
        projects: registry
            .projects
            .iter()
            .map(|p| TomlProjectEntry {
                path: p.path.clone(),
                last_deployed: p.last_deployed,
                deployment_count: p.deployment_count,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(path: PathBuf, count: usize) -> ProjectEntry {
        ProjectEntry::deployed_now(path, count)
    }

    #[test]
    fn load_missing_returns_empty() {
        let dir = tempdir().unwrap();
        let repo = TomlRegistryRepository::with_path(dir.path().join("registry.toml"));
        let reg = repo.load().unwrap();
        assert!(reg.projects.is_empty());
        assert_eq!(reg.version, 1);
    }

    #[test]
    fn load_corrupted_returns_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.toml");
        fs::write(&path, "this is not toml = = =").unwrap();

        let repo = TomlRegistryRepository::with_path(path.clone());
        let err = repo.load().unwrap_err();
        assert!(matches!(err, RegistryError::Corrupted { .. }));

        let msg = err.to_string();
        assert!(msg.contains("registry file corrupted"));
        assert!(msg.contains(&path.display().to_string()));
    }

    #[test]
    fn update_project_is_upsert() {
        let dir = tempdir().unwrap();
        let repo = TomlRegistryRepository::with_path(dir.path().join("registry.toml"));

        repo.update_project(entry(PathBuf::from("/project"), 1))
            .unwrap();
        repo.update_project(entry(PathBuf::from("/project"), 2))
            .unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded.projects.len(), 1);
        assert_eq!(loaded.projects[0].deployment_count, 2);
    }

    #[test]
    fn discovery_skips_vanished_projects() {
        let dir = tempdir().unwrap();
        let alive = dir.path().join("alive");
        fs::create_dir_all(&alive).unwrap();

        let repo = TomlRegistryRepository::with_path(dir.path().join("registry.toml"));
        repo.update_project(entry(alive.clone(), 1)).unwrap();
        repo.update_project(entry(dir.path().join("gone"), 1))
            .unwrap();

        assert_eq!(repo.discover_projects().unwrap(), vec![alive.clone()]);
        assert_eq!(repo.load().unwrap().projects.len(), 2);

        assert_eq!(repo.prune().unwrap(), vec![dir.path().join("gone")]);
        assert_eq!(repo.load().unwrap().projects.len(), 1);
        assert!(repo.prune().unwrap().is_empty());
    }
}
