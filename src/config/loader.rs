//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{TetherError, TetherResult};
use crate::infrastructure::fs::tether_data_dir;

use super::types::{Config, LogFormat};

/// Environment variable pointing at an alternate config file
pub const CONFIG_PATH_VAR: &str = "TETHER_CONFIG";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> TetherResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| TetherError::InvalidConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// `~/.tether/config.toml`
pub fn user_config_path() -> PathBuf {
    tether_data_dir().join("config.toml")
}

/// Load the first config that applies, then environment overrides.
///
/// An explicit path (argument or `TETHER_CONFIG`) must exist. The user config
/// is optional; when absent the built-in defaults are used.
pub fn discover(explicit: Option<&Path>) -> TetherResult<(Config, Vec<ConfigWarning>)> {
    let explicit = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from));

    let (config, warnings) = match explicit {
        Some(path) => load_with_warnings(&path)?,
        None => {
            let user_config = user_config_path();
            if user_config.is_file() {
                load_with_warnings(&user_config)?
            } else {
                (Config::default(), Vec::new())
            }
        }
    };

    Ok((with_env_overrides(config), warnings))
}

/// Apply environment variable overrides (TETHER_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_overrides(config, |name| std::env::var(name).ok())
}

pub(super) fn apply_overrides(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Config {
    if let Some(dir) = lookup("TETHER_COLLECTIONS_DIR") {
        config.collections_dir = Some(PathBuf::from(dir));
    }

    if let Some(path) = lookup("TETHER_REGISTRY_PATH") {
        config.registry_path = Some(PathBuf::from(path));
    }

    if let Some(name) = lookup("TETHER_DEFAULT_COLLECTION") {
        config.default_collection = Some(name);
    }

    // Unparseable numbers are ignored rather than clobbering the file value
    if let Some(workers) = lookup("TETHER_WORKERS").and_then(|v| v.trim().parse().ok()) {
        config.workers = Some(workers);
    }

    if let Some(secs) = lookup("TETHER_GRAPH_TTL_SECS").and_then(|v| v.trim().parse().ok()) {
        config.graph.cache_ttl_secs = secs;
    }

    if let Some(secs) = lookup("TETHER_HASH_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
        config.hashing.timeout_secs = secs;
    }

    if let Some(format) = lookup("TETHER_LOG_FORMAT") {
        config.logging.format = match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "collections_dir",
        "registry_path",
        "default_collection",
        "workers",
        "status",
        "graph",
        "cache_ttl_secs",
        "hashing",
        "timeout_secs",
        "logging",
        "level",
        "format",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
