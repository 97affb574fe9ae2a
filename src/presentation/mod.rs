//! Presentation Layer
//!
//! Wires use cases to their infrastructure for the `tether` binary.
//!
//! ## Usage
//!
//! ```ignore
//! use tether::presentation::factory;
//!
//! let manager = factory::create_deployment_manager(&config, events, confirm);
//! let report = manager.deploy_all(&options)?;
//! ```

pub mod factory;

pub use factory::{create_deployment_manager, create_graph_builder};
