//! DeploymentRepository port - persistence of deployment records
//!
//! One record file exists per (project, profile root). Reads without a root
//! aggregate every record file found under the project.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::domain::entities::{DeploymentKey, DeploymentRecord, DeploymentSet};
use crate::domain::value_objects::ArtifactType;
use crate::error::TetherResult;

pub trait DeploymentRepository: Send + Sync {
    /// Read records for one profile root, or all roots when `profile_root` is `None`
    fn read_deployments(
        &self,
        project: &Path,
        profile_root: Option<&str>,
    ) -> TetherResult<Vec<DeploymentRecord>>;

    /// Replace the contents of exactly one record file
    fn write_deployments(
        &self,
        project: &Path,
        profile_root: &str,
        records: &DeploymentSet,
    ) -> TetherResult<()>;

    /// Upsert by identity key into the record's own profile root file
    fn record_deployment(&self, project: &Path, record: DeploymentRecord) -> TetherResult<()>;

    /// First record matching name and type (and profile, when given)
    fn get_deployment(
        &self,
        project: &Path,
        name: &str,
        artifact_type: ArtifactType,
        profile: Option<&str>,
    ) -> TetherResult<Option<DeploymentRecord>>;

    /// Remove matching records; returns how many were removed (0 is not an error)
    fn remove_deployment(
        &self,
        project: &Path,
        name: &str,
        artifact_type: ArtifactType,
        profile: Option<&str>,
    ) -> TetherResult<usize>;

    /// Single-record drift check: true when the on-disk copy differs from the
    /// recorded hash. A missing copy is not modified.
    fn detect_modifications(&self, project: &Path, record: &DeploymentRecord)
        -> TetherResult<bool>;

    /// Persist drift results: `local_modifications`, `last_modified_check`, and
    /// `modification_detected_at` on first detection. `results` pairs each
    /// record's profile root with its key and whether it is modified.
    fn mark_checked(
        &self,
        project: &Path,
        results: &[(String, DeploymentKey, bool)],
        checked_at: DateTime<Utc>,
    ) -> TetherResult<()>;
}
