//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod artifact;
mod hash;
mod path;
mod platform;

pub use artifact::{ArtifactId, ArtifactType};
pub use hash::ContentHash;
pub use path::{
    ensure_within, normalize_lexically, normalize_record_path, validate_root_dir, PathError,
    SafePath,
};
pub use platform::Platform;
