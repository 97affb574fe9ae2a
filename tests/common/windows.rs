//! Windows-compatible test environment helpers.
//!
//! On Windows, `dirs::home_dir()` uses the system API rather than `HOME` or
//! `USERPROFILE`, so setting those has no effect there. These helpers set the
//! Tether-specific overrides as well, so tests isolate the same way on every
//! platform.

use std::path::Path;
use std::process::Command;

pub trait WindowsCompatExt {
    /// Point every home-derived path at `home`.
    ///
    /// This sets:
    /// - `HOME` / `USERPROFILE`
    /// - `TETHER_TEST_HOME` (consulted before `dirs::home_dir()`)
    /// - `TETHER_REGISTRY_PATH`
    ///
    /// and clears `TETHER_CONFIG` / `TETHER_LOG` inherited from the caller.
    fn with_test_home(&mut self, home: &Path) -> &mut Self;
}

impl WindowsCompatExt for Command {
    fn with_test_home(&mut self, home: &Path) -> &mut Self {
        let registry_path = home.join(".tether").join("registry.toml");

        self.env("HOME", home)
            .env("USERPROFILE", home)
            .env("TETHER_TEST_HOME", home)
            .env("TETHER_REGISTRY_PATH", &registry_path)
            .env_remove("TETHER_CONFIG")
            .env_remove("TETHER_LOG")
    }
}
