//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeploymentManager` - Deploy, undeploy, list, and status of project copies
//! - `StatusComputer` - Batch drift check over many records
//! - `VersionGraphBuilder` - Lineage of one artifact across projects
//! - `ProfileResolver` - Which profiles a call targets

pub mod deploy;
pub mod profiles;
pub mod status;
pub mod version_graph;
pub mod workers;

pub use deploy::{
    DeployFailure, DeployOptions, DeployReport, DeployedItem, DeploymentManager, SkippedItem,
    UndeployReport,
};
pub use profiles::{ProfileResolver, ProfileSelection};
pub use status::{RecordStatus, StatusComputer, StatusFailure, StatusReport};
pub use version_graph::{CacheStats, VersionGraphBuilder, DEFAULT_GRAPH_TTL};
pub use workers::{default_workers, map_bounded};
