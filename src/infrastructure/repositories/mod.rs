//! Repository Implementations
//!
//! Concrete implementations of domain repository ports.

mod collection;
mod deployment;
mod profile;
mod registry;

pub use collection::LocalCollection;
pub use deployment::{TomlDeploymentStore, RECORD_FILE_NAME, RECORD_FORMAT_VERSION};
pub use profile::{TomlProfileStore, PROJECT_STATE_DIR};
pub use registry::{StaticProjects, TomlRegistryRepository, REGISTRY_PATH_VAR};
