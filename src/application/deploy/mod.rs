//! Deploy Module
//!
//! Copies collection artifacts into projects and tracks them.
//!
//! ## Structure
//!
//! - `options` - Configuration types (`DeployOptions`)
//! - `result` - Result types (`DeployReport`, `UndeployReport`)
//! - `use_case` - Core orchestration (`DeploymentManager`)
//!
//! ## Usage
//!
//! ```ignore
//! use tether::application::deploy::{DeployOptions, DeploymentManager};
//!
//! let manager = DeploymentManager::new(collections, store, hasher, profile_store);
//! let report = manager.deploy_artifacts(&ids, &DeployOptions::new(project))?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::DeployOptions;
pub use result::{DeployFailure, DeployReport, DeployedItem, SkippedItem, UndeployReport};
pub use use_case::DeploymentManager;
