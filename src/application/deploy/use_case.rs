//! Deployment Manager
//!
//! Orchestrates deploy, undeploy, listing and status for one project:
//! 1. Resolve profiles and destinations (sequential; confirms overwrites)
//! 2. Copy, hash and record each artifact × profile pair (worker pool)
//! 3. Register the project for version-graph discovery
//!
//! Per-pair failures land in the `DeployReport`; they never abort the batch.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;

use super::options::DeployOptions;
use super::result::{DeployFailure, DeployReport, DeployedItem, SkippedItem, UndeployReport};
use crate::application::profiles::{ProfileResolver, ProfileSelection};
use crate::application::status::{PathHashCache, StatusComputer, StatusReport};
use crate::application::workers::{default_workers, map_bounded};
use crate::domain::entities::{DeploymentProfile, DeploymentRecord, ProjectEntry};
use crate::domain::ports::{
    AlwaysConfirm, CollectionArtifact, CollectionProvider, ConfirmContext, ConfirmOverwrite,
    ContentHasher, DeployEvent, DeployEventSink, DeploymentRepository, NoopEventSink,
    ProfileStore, RegistryRepository,
};
use crate::domain::services::DeploymentStatus;
use crate::domain::value_objects::{ensure_within, ArtifactId, SafePath};
use crate::error::{TetherError, TetherResult};
use crate::infrastructure::fs::{copy_artifact, remove_path};

/// One artifact × profile pair that passed planning
struct PlannedCopy {
    artifact: CollectionArtifact,
    profile: DeploymentProfile,
    relative_path: SafePath,
    destination: PathBuf,
}

pub struct DeploymentManager {
    collections: Arc<dyn CollectionProvider>,
    store: Arc<dyn DeploymentRepository>,
    hasher: Arc<dyn ContentHasher>,
    profiles: ProfileResolver,
    registry: Option<Arc<dyn RegistryRepository>>,
    events: Arc<dyn DeployEventSink>,
    confirm: Arc<dyn ConfirmOverwrite>,
    workers: usize,
    status_workers: usize,
}

impl DeploymentManager {
    pub fn new(
        collections: Arc<dyn CollectionProvider>,
        store: Arc<dyn DeploymentRepository>,
        hasher: Arc<dyn ContentHasher>,
        profile_store: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            collections,
            store,
            hasher,
            profiles: ProfileResolver::new(profile_store),
            registry: None,
            events: Arc::new(NoopEventSink),
            confirm: Arc::new(AlwaysConfirm),
            workers: default_workers(),
            status_workers: default_workers(),
        }
    }

    pub fn with_registry(mut self, registry: Arc<dyn RegistryRepository>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_events(mut self, events: Arc<dyn DeployEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_confirm(mut self, confirm: Arc<dyn ConfirmOverwrite>) -> Self {
        self.confirm = confirm;
        self
    }

    /// Pool size for copies and, unless overridden, status batches
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self.status_workers = self.workers;
        self
    }

    pub fn with_status_workers(mut self, workers: usize) -> Self {
        self.status_workers = workers.max(1);
        self
    }

    /// Deploy each artifact under each resolved profile.
    ///
    /// Returns `Err` only for call-level problems: a missing project, an unknown
    /// explicit profile, or a destination escaping the project root. Those are
    /// detected before anything is written.
    pub fn deploy_artifacts(
        &self,
        artifacts: &[ArtifactId],
        options: &DeployOptions,
    ) -> TetherResult<DeployReport> {
        let project = options.project.as_path();
        if !project.is_dir() {
            return Err(TetherError::not_found(format!(
                "project {}",
                project.display()
            )));
        }
        let profiles = self.profiles.resolve(project, &options.profiles)?;

        let searched = match &options.collection {
            Some(name) => format!("collection '{}'", name),
            None => "any collection".to_string(),
        };

        let mut report = DeployReport::new();
        let mut sources = Vec::new();
        for id in artifacts {
            match self.collections.find_artifact(options.collection.as_deref(), id) {
                Ok(Some(found)) => sources.push(found),
                Ok(None) => self.fail(
                    &mut report,
                    project,
                    id,
                    "",
                    format!("not found in {}", searched),
                ),
                Err(e) => self.fail(&mut report, project, id, "", e.to_string()),
            }
        }

        let planned = self.plan(project, &sources, &profiles, options.overwrite, &mut report)?;

        let source_hashes = PathHashCache::new();
        let outcomes = map_bounded(self.workers, &planned, |copy| {
            self.copy_and_record(project, copy, &source_hashes)
        });

        for (copy, outcome) in planned.iter().zip(outcomes) {
            match outcome {
                Ok(item) => {
                    self.emit(&DeployEvent::Deployed {
                        artifact: item.artifact.clone(),
                        collection: copy.artifact.collection.clone(),
                        project: project.to_path_buf(),
                        profile_id: item.profile_id.clone(),
                        content_hash: item.content_hash.to_string(),
                    });
                    report.deployed.push(item);
                }
                Err(e) => self.fail(
                    &mut report,
                    project,
                    &copy.artifact.id,
                    &copy.profile.profile_id,
                    e.to_string(),
                ),
            }
        }

        if report.has_changes() {
            self.register_project(project);
        }

        tracing::info!(
            project = %project.display(),
            deployed = report.deployed.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "deploy complete"
        );
        Ok(report)
    }

    /// Deploy every artifact in the collection (or in all collections)
    pub fn deploy_all(&self, options: &DeployOptions) -> TetherResult<DeployReport> {
        let collections = match &options.collection {
            Some(name) => vec![name.clone()],
            None => self.collections.list_collections()?,
        };

        let mut ids: Vec<ArtifactId> = Vec::new();
        for collection in &collections {
            for artifact in self.collections.list_artifacts(collection)? {
                if !ids.contains(&artifact.id) {
                    ids.push(artifact.id);
                }
            }
        }
        self.deploy_artifacts(&ids, options)
    }

    /// Remove an artifact's on-disk copies and records.
    ///
    /// With no profile every profile's copy is removed. Absent on-disk content
    /// is fine; an absent record is `NotFound`.
    pub fn undeploy(
        &self,
        id: &ArtifactId,
        project: &Path,
        profile: Option<&str>,
    ) -> TetherResult<UndeployReport> {
        let records: Vec<DeploymentRecord> = self
            .store
            .read_deployments(project, None)?
            .into_iter()
            .filter(|r| r.matches(&id.name, id.artifact_type, profile))
            .collect();
        if records.is_empty() {
            return Err(TetherError::not_found(format!(
                "deployment of {} in {}",
                id,
                project.display()
            )));
        }

        let mut removed_paths = Vec::new();
        for record in &records {
            let relative = Path::new(&record.root_dir()).join(record.relative_path.as_path());
            let path = ensure_within(project, &relative).map_err(|_| TetherError::PathEscape {
                path: project.join(&relative),
                root: project.to_path_buf(),
            })?;
            if remove_path(&path)? {
                removed_paths.push(path);
            }
        }

        let removed_records =
            self.store
                .remove_deployment(project, &id.name, id.artifact_type, profile)?;

        self.emit(&DeployEvent::Undeployed {
            artifact: id.clone(),
            project: project.to_path_buf(),
            removed_records,
        });
        tracing::info!(artifact = %id, project = %project.display(), removed_records, "undeployed");

        Ok(UndeployReport {
            artifact: id.clone(),
            removed_paths,
            removed_records,
        })
    }

    pub fn list_deployments(
        &self,
        project: &Path,
        profile: Option<&str>,
    ) -> TetherResult<Vec<DeploymentRecord>> {
        Ok(self
            .store
            .read_deployments(project, None)?
            .into_iter()
            .filter(|r| profile.map_or(true, |p| r.profile_id() == p))
            .collect())
    }

    /// Drift status of one deployment
    pub fn check_deployment_status(
        &self,
        id: &ArtifactId,
        project: &Path,
        profile: Option<&str>,
    ) -> TetherResult<DeploymentStatus> {
        let record = self
            .store
            .get_deployment(project, &id.name, id.artifact_type, profile)?
            .ok_or_else(|| {
                TetherError::not_found(format!("deployment of {} in {}", id, project.display()))
            })?;
        self.store
            .detect_modifications(project, &record)
            .map(DeploymentStatus::from_modified)
    }

    /// Batch drift status for a project.
    ///
    /// Pass `records` when the caller already holds them to skip the store read.
    pub fn compute_deployment_statuses_batch(
        &self,
        project: &Path,
        records: Option<&[DeploymentRecord]>,
        profile: Option<&str>,
    ) -> TetherResult<StatusReport> {
        let computer = StatusComputer::new(self.hasher.clone()).with_workers(self.status_workers);
        match records {
            Some(records) => Ok(computer.compute(project, records, profile)),
            None => {
                let records = self.store.read_deployments(project, None)?;
                Ok(computer.compute(project, &records, profile))
            }
        }
    }

    /// Write a batch's results back onto the records
    pub fn refresh_modification_flags(
        &self,
        project: &Path,
        report: &StatusReport,
    ) -> TetherResult<usize> {
        let results: Vec<_> = report
            .records
            .iter()
            .map(|r| (r.profile_root.clone(), r.identity.clone(), r.status.is_modified()))
            .collect();
        self.store.mark_checked(project, &results, Utc::now())?;
        Ok(results.len())
    }

    /// Phase 1: destinations, path guard and overwrite confirmation
    fn plan(
        &self,
        project: &Path,
        sources: &[CollectionArtifact],
        profiles: &[DeploymentProfile],
        overwrite: bool,
        report: &mut DeployReport,
    ) -> TetherResult<Vec<PlannedCopy>> {
        let mut planned = Vec::new();
        for artifact in sources {
            for profile in profiles {
                let relative_path = profile
                    .relative_destination(artifact.id.artifact_type, &artifact.entry_name())
                    .map_err(|e| {
                        TetherError::validation(format!(
                            "{} under profile '{}': {}",
                            artifact.id, profile.profile_id, e
                        ))
                    })?;
                let relative = Path::new(&profile.root_dir).join(relative_path.as_path());
                let destination =
                    ensure_within(project, &relative).map_err(|_| TetherError::PathEscape {
                        path: project.join(&relative),
                        root: project.to_path_buf(),
                    })?;

                if !overwrite && fs::symlink_metadata(&destination).is_ok() {
                    let context = ConfirmContext {
                        artifact: &artifact.id,
                        profile_id: &profile.profile_id,
                        destination: &destination,
                    };
                    if !self.confirm.confirm(&context) {
                        let reason = "existing content kept".to_string();
                        self.emit(&DeployEvent::Skipped {
                            artifact: artifact.id.clone(),
                            project: project.to_path_buf(),
                            profile_id: profile.profile_id.clone(),
                            reason: reason.clone(),
                        });
                        report.skipped.push(SkippedItem {
                            artifact: artifact.id.clone(),
                            profile_id: profile.profile_id.clone(),
                            reason,
                        });
                        continue;
                    }
                }

                planned.push(PlannedCopy {
                    artifact: artifact.clone(),
                    profile: profile.clone(),
                    relative_path,
                    destination,
                });
            }
        }
        Ok(planned)
    }

    /// Phase 2: copy, hash, record
    fn copy_and_record(
        &self,
        project: &Path,
        copy: &PlannedCopy,
        source_hashes: &PathHashCache,
    ) -> TetherResult<DeployedItem> {
        let source = &copy.artifact.path;
        let parent_hash = source_hashes
            .get_or_compute(source, || self.hasher.hash(source))
            .map_err(|e| TetherError::validation(format!("hashing {}: {}", source.display(), e)))?;

        copy_artifact(source, &copy.destination)?;
        let deployed_hash = self.hasher.hash(&copy.destination)?;
        let file_count = if copy.destination.is_dir() {
            Some(self.hasher.count_files(&copy.destination)?)
        } else {
            None
        };

        let profile = &copy.profile;
        let previous = self.store.get_deployment(
            project,
            &copy.artifact.id.name,
            copy.artifact.id.artifact_type,
            Some(&profile.profile_id),
        )?;

        let mut record = DeploymentRecord::new(
            copy.artifact.id.name.clone(),
            copy.artifact.id.artifact_type,
            copy.artifact.collection.clone(),
            copy.relative_path.clone(),
            deployed_hash.clone(),
        )
        .with_profile(
            profile.profile_id.clone(),
            profile.platform,
            profile.root_dir.clone(),
        );
        record.parent_hash = Some(parent_hash);
        record.version_lineage = previous.map(|p| p.version_lineage).unwrap_or_default();
        record.push_lineage(deployed_hash.clone());
        record.merge_base_snapshot = Some(deployed_hash.clone());
        record.last_modified_check = Some(record.deployed_at);
        record.artifact_uuid = copy.artifact.uuid.clone();
        record.file_count = file_count;

        self.store.record_deployment(project, record)?;
        tracing::debug!(
            artifact = %copy.artifact.id,
            profile = %profile.profile_id,
            destination = %copy.destination.display(),
            "deployed"
        );

        Ok(DeployedItem {
            artifact: copy.artifact.id.clone(),
            profile_id: profile.profile_id.clone(),
            destination: copy.destination.clone(),
            content_hash: deployed_hash,
        })
    }

    fn fail(
        &self,
        report: &mut DeployReport,
        project: &Path,
        id: &ArtifactId,
        profile_id: &str,
        reason: String,
    ) {
        tracing::warn!(artifact = %id, profile = profile_id, %reason, "deploy failed");
        self.emit(&DeployEvent::Failed {
            artifact: id.clone(),
            project: project.to_path_buf(),
            profile_id: profile_id.to_string(),
            error: reason.clone(),
        });
        report.failed.push(DeployFailure {
            artifact: id.clone(),
            profile_id: profile_id.to_string(),
            reason,
        });
    }

    fn emit(&self, event: &DeployEvent) {
        if let Err(e) = self.events.on_event(event) {
            tracing::debug!(error = %e, "event sink failed");
        }
    }

    fn register_project(&self, project: &Path) {
        let Some(registry) = &self.registry else {
            return;
        };
        let deployment_count = match self.store.read_deployments(project, None) {
            Ok(records) => records.len(),
            Err(e) => {
                tracing::warn!(project = %project.display(), error = %e, "could not count deployments");
                0
            }
        };
        let path = project
            .canonicalize()
            .unwrap_or_else(|_| project.to_path_buf());
        if let Err(e) = registry.update_project(ProjectEntry::deployed_now(path, deployment_count)) {
            tracing::warn!(project = %project.display(), error = %e, "could not update project registry");
        }
    }

    /// Profiles that apply to `project` for the given selection
    pub fn resolve_profiles(
        &self,
        project: &Path,
        selection: &ProfileSelection,
    ) -> TetherResult<Vec<DeploymentProfile>> {
        self.profiles.resolve(project, selection)
    }
}
