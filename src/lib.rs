//! Tether - deployment tracking and version lineage for AI assistant artifacts
//!
//! Tether copies skills, commands, agents, hooks and MCP definitions from
//! local collections into projects, records what was copied where, detects
//! local drift, and reconstructs how each project copy relates to the
//! collection's current version.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

// Re-exports for convenience
pub use application::{DeployOptions, DeployReport, DeploymentManager, VersionGraphBuilder};
pub use config::Config;
pub use domain::entities::{DeploymentProfile, DeploymentRecord, VersionGraph};
pub use domain::services::DeploymentStatus;
pub use domain::value_objects::{ArtifactId, ArtifactType, ContentHash};
pub use error::{TetherError, TetherResult};
