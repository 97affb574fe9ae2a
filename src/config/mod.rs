//! Configuration module for Tether
//!
//! Hierarchy, highest priority first:
//! 1. CLI flags
//! 2. Environment variables (TETHER_*)
//! 3. Config file (`--config`, `TETHER_CONFIG`, or `~/.tether/config.toml`)
//! 4. Built-in defaults

mod loader;
mod types;

pub use loader::{user_config_path, ConfigWarning, CONFIG_PATH_VAR};
pub use types::{Config, GraphConfig, HashingConfig, LogFormat, LoggingConfig, StatusConfig};
