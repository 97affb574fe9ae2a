//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod collection;
pub mod confirm;
pub mod content_hasher;
pub mod deploy_events;
pub mod deployment_repository;
pub mod profile_store;
pub mod registry_repository;

pub use collection::{CollectionArtifact, CollectionProvider};
pub use confirm::{AlwaysConfirm, ConfirmContext, ConfirmOverwrite, NeverConfirm};
pub use content_hasher::ContentHasher;
pub use deploy_events::{DeployEvent, DeployEventSink, EventSinkError, NoopEventSink};
pub use deployment_repository::DeploymentRepository;
pub use profile_store::{ProfileStore, ProfileStoreError};
pub use registry_repository::{ProjectDiscovery, RegistryError, RegistryRepository};
