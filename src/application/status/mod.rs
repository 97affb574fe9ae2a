//! Status Module
//!
//! Batch drift detection for the deployments of one project.
//!
//! ## Structure
//!
//! - `cache` - Per-batch path hash cache (`PathHashCache`)
//! - `computer` - Tiered status computation (`StatusComputer`, `StatusReport`)

mod cache;
mod computer;

pub use cache::PathHashCache;
pub use computer::{RecordStatus, StatusComputer, StatusFailure, StatusReport};
