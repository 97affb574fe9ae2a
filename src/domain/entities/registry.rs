//! Registry entity
//!
//! Tracks every project that has received a deployment, so version graphs can
//! find all deployment sites without scanning the disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// One project that has received at least one deployment
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectEntry {
    pub path: PathBuf,
    pub last_deployed: DateTime<Utc>,
    pub deployment_count: usize,
}

impl ProjectEntry {
    /// Entry stamped with the current time
    pub fn deployed_now(path: impl Into<PathBuf>, deployment_count: usize) -> Self {
        Self {
            path: path.into(),
            last_deployed: Utc::now(),
            deployment_count,
        }
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    pub version: u32,
    pub projects: Vec<ProjectEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            version: 1,
            projects: Vec::new(),
        }
    }

    /// Insert or replace the entry for `entry.path`
    pub fn upsert(&mut self, entry: ProjectEntry) {
        match self.projects.iter_mut().find(|p| p.path == entry.path) {
            Some(existing) => *existing = entry,
            None => self.projects.push(entry),
        }
    }

    pub fn get(&self, path: &Path) -> Option<&ProjectEntry> {
        self.projects.iter().find(|p| p.path == path)
    }

    pub fn remove(&mut self, path: &Path) -> bool {
        let before = self.projects.len();
        self.projects.retain(|p| p.path != path);
        self.projects.len() != before
    }

    /// Drop projects whose directory no longer exists; returns the removed paths
    pub fn prune(&mut self) -> Vec<PathBuf> {
        let (alive, gone): (Vec<_>, Vec<_>) = self.projects.drain(..).partition(ProjectEntry::exists);
        self.projects = alive;
        gone.into_iter().map(|p| p.path).collect()
    }

    /// Sorted, deduplicated paths of projects still present on disk
    pub fn live_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .projects
            .iter()
            .filter(|p| p.exists())
            .map(|p| p.path.clone())
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }

    /// Entries ordered by most recent deployment
    pub fn recent_first(&self) -> Vec<&ProjectEntry> {
        let mut entries: Vec<_> = self.projects.iter().collect();
        entries.sort_by(|a, b| b.last_deployed.cmp(&a.last_deployed));
        entries
    }

    pub fn all(&self) -> &[ProjectEntry] {
        &self.projects
    }
}
