//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Hashing, copying, atomic writes, home directory
//! - `repositories/` - Record store, registry, profiles, collections
//! - `conflict/` - Interactive overwrite confirmation
//! - `events/` - Deploy event sinks

pub mod conflict;
pub mod events;
pub mod fs;
pub mod repositories;

// Re-export for convenience
pub use conflict::InteractiveConfirm;
pub use events::JsonEventSink;
pub use fs::Sha256Hasher;
pub use repositories::{
    LocalCollection, StaticProjects, TomlDeploymentStore, TomlProfileStore,
    TomlRegistryRepository,
};
