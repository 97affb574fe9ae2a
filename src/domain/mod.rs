//! Domain Layer
//!
//! Pure deployment-tracking logic without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Deployment records, profiles, version graphs, project registry
//! - `value_objects/` - Immutable value types (ArtifactId, ContentHash, Platform, SafePath)
//! - `services/` - Drift classification and version-tree assembly
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system directly
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
