//! Version Graph Module
//!
//! - `builder` - Collection root + project deployments → `VersionGraph`
//! - `cache` - TTL cache with single-flight rebuilds

mod builder;
mod cache;

pub use builder::VersionGraphBuilder;
pub use cache::{CacheStats, GraphCache, GraphKey, DEFAULT_GRAPH_TTL};
