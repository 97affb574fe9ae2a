//! Version graph builder
//!
//! Rebuilds the lineage of one artifact from the collection's current copy and
//! the deployments found in every known project. A project that can't be read
//! is logged and left out; it never fails the whole build.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use super::cache::{CacheStats, GraphCache, DEFAULT_GRAPH_TTL};
use crate::application::workers::{default_workers, map_bounded};
use crate::domain::entities::{
    ArtifactVersion, DeploymentRecord, LocationType, VersionGraph, COLLECTION_LOCATION,
};
use crate::domain::ports::{CollectionProvider, ContentHasher, DeploymentRepository, ProjectDiscovery};
use crate::domain::services::assemble_graph;
use crate::domain::value_objects::ArtifactId;
use crate::error::TetherResult;

pub struct VersionGraphBuilder {
    collections: Arc<dyn CollectionProvider>,
    store: Arc<dyn DeploymentRepository>,
    hasher: Arc<dyn ContentHasher>,
    discovery: Arc<dyn ProjectDiscovery>,
    cache: GraphCache,
    workers: usize,
}

impl VersionGraphBuilder {
    pub fn new(
        collections: Arc<dyn CollectionProvider>,
        store: Arc<dyn DeploymentRepository>,
        hasher: Arc<dyn ContentHasher>,
        discovery: Arc<dyn ProjectDiscovery>,
    ) -> Self {
        Self {
            collections,
            store,
            hasher,
            discovery,
            cache: GraphCache::new(DEFAULT_GRAPH_TTL),
            workers: default_workers(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.cache = GraphCache::new(ttl);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Graph for `artifact`, served from cache while the entry is valid.
    ///
    /// `collection` restricts both the root lookup and which deployments count
    /// (by the collection they were deployed from).
    pub fn build_graph(
        &self,
        artifact: &ArtifactId,
        collection: Option<&str>,
    ) -> TetherResult<Arc<VersionGraph>> {
        let key = (artifact.clone(), collection.map(str::to_string));
        self.cache
            .get_or_build(key, || self.build_uncached(artifact, collection))
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn get_cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn build_uncached(
        &self,
        artifact: &ArtifactId,
        collection: Option<&str>,
    ) -> TetherResult<VersionGraph> {
        let now = Utc::now();
        let root = match self.collections.find_artifact(collection, artifact)? {
            Some(found) => {
                let mut metadata = BTreeMap::new();
                metadata.insert("path".to_string(), found.path.display().to_string());
                if let Some(uuid) = &found.uuid {
                    metadata.insert("artifact_uuid".to_string(), uuid.clone());
                }
                Some(ArtifactVersion {
                    artifact: artifact.clone(),
                    content_sha: self.hasher.hash(&found.path)?,
                    location: COLLECTION_LOCATION.to_string(),
                    location_type: LocationType::Collection,
                    collection_name: Some(found.collection),
                    parent_sha: None,
                    created_at: now,
                    metadata_snapshot: metadata,
                })
            }
            None => None,
        };

        let projects = self.discovery.discover_projects()?;
        let scanned = map_bounded(self.workers, &projects, |project| {
            self.scan_project(project, artifact, collection)
        });

        let mut deployments = Vec::new();
        for (project, result) in projects.iter().zip(scanned) {
            match result {
                Ok(versions) => deployments.extend(versions),
                Err(e) => tracing::warn!(
                    project = %project.display(),
                    error = %e,
                    "skipping project in version graph"
                ),
            }
        }

        let graph = assemble_graph(artifact.clone(), root, deployments, now);
        tracing::info!(
            artifact = %artifact,
            projects = projects.len(),
            deployments = graph.statistics.total_deployments,
            orphans = graph.statistics.orphan_count,
            "version graph built"
        );
        Ok(graph)
    }

    fn scan_project(
        &self,
        project: &Path,
        artifact: &ArtifactId,
        collection: Option<&str>,
    ) -> TetherResult<Vec<ArtifactVersion>> {
        let records = self.store.read_deployments(project, None)?;
        Ok(records
            .into_iter()
            .filter(|r| r.matches(&artifact.name, artifact.artifact_type, None))
            .filter(|r| collection.map_or(true, |c| r.source_collection_name == c))
            .map(|record| self.project_version(project, artifact, record))
            .collect())
    }

    fn project_version(
        &self,
        project: &Path,
        artifact: &ArtifactId,
        record: DeploymentRecord,
    ) -> ArtifactVersion {
        let path = record.absolute_path(project);
        let content_sha = match self.hasher.hash(&path) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "using recorded hash for unreadable deployment"
                );
                record.content_hash.clone()
            }
        };

        let mut metadata = BTreeMap::new();
        metadata.insert("profile_id".to_string(), record.profile_id().to_string());
        metadata.insert(
            "relative_path".to_string(),
            record.relative_path.to_record_string(),
        );
        metadata.insert("deployed_hash".to_string(), record.content_hash.to_string());
        if let Some(uuid) = &record.artifact_uuid {
            metadata.insert("artifact_uuid".to_string(), uuid.clone());
        }

        ArtifactVersion {
            artifact: artifact.clone(),
            content_sha,
            location: project.display().to_string(),
            location_type: LocationType::Project,
            collection_name: Some(record.source_collection_name.clone()),
            parent_sha: Some(
                record
                    .parent_hash
                    .clone()
                    .unwrap_or_else(|| record.content_hash.clone()),
            ),
            created_at: record.deployed_at,
            metadata_snapshot: metadata,
        }
    }
}
