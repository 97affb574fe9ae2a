//! Domain Entities
//!
//! Core domain entities that have identity and lifecycle.
//! - `DeploymentRecord` - An artifact copied into a project under a profile
//! - `DeploymentProfile` - A tool's layout convention inside a project
//! - `VersionGraph` - Lineage of one artifact across collection and projects
//! - `Registry` - Projects known to have deployments

mod deployment;
mod profile;
mod registry;
mod version;

pub use deployment::{
    DeploymentKey, DeploymentRecord, DeploymentSet, DEFAULT_PROFILE_ID, MAX_LINEAGE,
};
pub use profile::DeploymentProfile;
pub use registry::{ProjectEntry, Registry};
pub use version::{
    ArtifactVersion, GraphStatistics, LocationType, VersionGraph, VersionGraphNode,
    COLLECTION_LOCATION,
};
