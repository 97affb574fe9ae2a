//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::{default_workers, DEFAULT_GRAPH_TTL};
use crate::error::TetherResult;
use crate::infrastructure::fs::{expand_home, tether_data_dir};

use super::loader::{self, ConfigWarning};

/// Status computation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Overrides the top-level `workers` for batch status checks
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Version graph settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_GRAPH_TTL.as_secs()
}

/// Content hashing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Per-hash deadline; 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `TETHER_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one subdirectory per collection
    #[serde(default)]
    pub collections_dir: Option<PathBuf>,

    #[serde(default)]
    pub registry_path: Option<PathBuf>,

    /// Collection used when a command doesn't name one
    #[serde(default)]
    pub default_collection: Option<String>,

    /// Worker pool size for deploys, status batches and graph scans
    #[serde(default)]
    pub workers: Option<usize>,

    #[serde(default)]
    pub status: StatusConfig,

    #[serde(default)]
    pub graph: GraphConfig,

    #[serde(default)]
    pub hashing: HashingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> TetherResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> TetherResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Explicit file, `TETHER_CONFIG`, or `~/.tether/config.toml`, then env overrides
    pub fn discover(explicit: Option<&Path>) -> TetherResult<(Self, Vec<ConfigWarning>)> {
        loader::discover(explicit)
    }

    /// Apply environment variable overrides (TETHER_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    pub fn collections_dir(&self) -> PathBuf {
        match &self.collections_dir {
            Some(dir) => expand_home(dir),
            None => tether_data_dir().join("collections"),
        }
    }

    /// `None` leaves the registry repository on its own default
    pub fn registry_path(&self) -> Option<PathBuf> {
        self.registry_path.as_deref().map(expand_home)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.filter(|w| *w > 0).unwrap_or_else(default_workers)
    }

    pub fn status_workers(&self) -> usize {
        self.status
            .workers
            .filter(|w| *w > 0)
            .unwrap_or_else(|| self.worker_count())
    }

    pub fn graph_ttl(&self) -> Duration {
        Duration::from_secs(self.graph.cache_ttl_secs)
    }

    pub fn hash_timeout(&self) -> Option<Duration> {
        match self.hashing.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
