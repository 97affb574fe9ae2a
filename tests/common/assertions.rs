//! Custom assertion macros for contract and scenario tests.
//!
//! These macros provide descriptive failure messages to aid debugging.

use std::path::Path;

/// List all files in a directory recursively (for debugging)
pub fn list_all_files(dir: &Path) -> Vec<String> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().display().to_string())
        .collect()
}

/// Assert that a path was deployed relative to the project root.
///
/// # Example
/// ```ignore
/// assert_deployed!(env, ".claude/skills/pdf/SKILL.md");
/// ```
#[macro_export]
macro_rules! assert_deployed {
    ($env:expr, $path:expr) => {
        let full_path = $env.project_path($path);
        assert!(
            full_path.exists(),
            "Expected '{}' to exist, but it doesn't.\n\
             Project root: {:?}\n\
             Files found:\n  {}",
            $path,
            $env.project_root.path(),
            $crate::common::list_all_files($env.project_root.path()).join("\n  ")
        );
    };
}

/// Assert that a path was NOT deployed (should not exist).
#[macro_export]
macro_rules! assert_not_deployed {
    ($env:expr, $path:expr) => {
        let full_path = $env.project_path($path);
        assert!(
            !full_path.exists(),
            "Expected '{}' to NOT exist, but it does.\n\
             Project root: {:?}",
            $path,
            $env.project_root.path()
        );
    };
}

/// Assert that output (stdout or stderr) contains expected pattern.
///
/// # Example
/// ```ignore
/// assert_output_contains!(result, "Deployed 1");
/// ```
#[macro_export]
macro_rules! assert_output_contains {
    ($result:expr, $pattern:expr) => {
        assert!(
            $result.stdout.contains($pattern) || $result.stderr.contains($pattern),
            "Expected output to contain '{}'\n\
             stdout:\n{}\n\
             stderr:\n{}",
            $pattern,
            $result.stdout,
            $result.stderr
        );
    };
}

/// Assert a command succeeded, printing both streams otherwise.
#[macro_export]
macro_rules! assert_success {
    ($result:expr) => {
        assert!(
            $result.success,
            "Command failed with exit code {}\n\
             stdout:\n{}\n\
             stderr:\n{}",
            $result.exit_code,
            $result.stdout,
            $result.stderr
        );
    };
}
