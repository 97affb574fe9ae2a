//! Domain Services
//!
//! Stateless logic with no I/O:
//! - `drift` - status values and batch result keys
//! - `version_tree` - attaching project copies to a collection root

pub mod drift;
pub mod version_tree;

pub use drift::{classify, status_key, status_keys, DeploymentStatus};
pub use version_tree::assemble_graph;
