//! Home directory resolution with test isolation support.
//!
//! On Windows, `dirs::home_dir()` ignores `HOME`/`USERPROFILE`, so tests set
//! `TETHER_TEST_HOME` instead. Internal paths (config, registry, collections)
//! resolve through `tether_home_dir()`.

use std::path::{Path, PathBuf};

/// Environment variable for test isolation of home directory.
pub const TETHER_TEST_HOME_VAR: &str = "TETHER_TEST_HOME";

/// Home directory for Tether-internal paths (`~/.tether/...`).
pub fn tether_home_dir() -> Option<PathBuf> {
    std::env::var(TETHER_TEST_HOME_VAR)
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

/// `~/.tether`, falling back to a relative `.tether` when no home is known
pub fn tether_data_dir() -> PathBuf {
    tether_home_dir()
        .map(|h| h.join(".tether"))
        .unwrap_or_else(|| PathBuf::from(".tether"))
}

/// Expand a leading `~` in user-provided paths
pub fn expand_home(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    if raw == "~" {
        return tether_home_dir().unwrap_or_else(|| path.to_path_buf());
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = tether_home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
