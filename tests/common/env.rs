//! Test environment builder for isolated Tether testing.
//!
//! Provides `TestEnv` - an isolated test environment with temp directories
//! for the project, home and collections, plus helpers to run the CLI.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use super::windows::WindowsCompatExt;

/// Result of running a Tether CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as a single JSON document
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(self.stdout.trim()).unwrap_or_else(|e| {
            panic!("stdout is not JSON ({}):\n{}", e, self.stdout)
        })
    }

    /// Parse stdout as newline-delimited JSON
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad line {l}: {e}")))
            .collect()
    }
}

/// Isolated test environment with temp directories.
pub struct TestEnv {
    /// Temporary directory for the project
    pub project_root: TempDir,
    /// Temporary directory for HOME (registry, config)
    pub home_dir: TempDir,
    /// Temporary directory holding collections
    pub collections_dir: TempDir,
}

impl TestEnv {
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::new()
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// Get path relative to home directory
    pub fn home_path(&self, relative: &str) -> PathBuf {
        self.home_dir.path().join(relative)
    }

    /// Get path relative to the collections directory
    pub fn collection_path(&self, relative: &str) -> PathBuf {
        self.collections_dir.path().join(relative)
    }

    /// Run tether in this environment from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_from(self.project_root.path(), args)
    }

    /// Run tether from a specific directory
    pub fn run_from(&self, cwd: &Path, args: &[&str]) -> TestResult {
        let output = Command::new(env!("CARGO_BIN_EXE_tether"))
            .current_dir(cwd)
            .args(args)
            .with_test_home(self.home_dir.path())
            .env("TETHER_COLLECTIONS_DIR", self.collections_dir.path())
            .output()
            .expect("Failed to execute tether");

        output_to_result(output)
    }

    pub fn read_project_file(&self, relative: &str) -> String {
        std::fs::read_to_string(self.project_path(relative))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
    }

    pub fn write_project_file(&self, relative: &str, content: &str) {
        write_file(&self.project_path(relative), content);
    }

    pub fn write_collection_file(&self, relative: &str, content: &str) {
        write_file(&self.collection_path(relative), content);
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create directories");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

/// Builder for TestEnv with fluent API
#[derive(Default)]
pub struct TestEnvBuilder {
    collection_files: Vec<(String, String)>,
    home_config: Option<String>,
}

impl TestEnvBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file under the collections directory (`<collection>/<type dir>/...`)
    pub fn with_collection_file(mut self, relative: &str, content: &str) -> Self {
        self.collection_files
            .push((relative.to_string(), content.to_string()));
        self
    }

    /// Add every file of a skill directory to `collection`
    pub fn with_skill(mut self, collection: &str, name: &str, files: &[(&str, &str)]) -> Self {
        for (rel, content) in files {
            self.collection_files.push((
                format!("{}/skills/{}/{}", collection, name, rel),
                content.to_string(),
            ));
        }
        self
    }

    /// Write `~/.tether/config.toml`
    pub fn with_home_config(mut self, toml: &str) -> Self {
        self.home_config = Some(toml.to_string());
        self
    }

    pub fn build(self) -> TestEnv {
        let env = TestEnv {
            project_root: TempDir::new().expect("Failed to create project dir"),
            home_dir: TempDir::new().expect("Failed to create home dir"),
            collections_dir: TempDir::new().expect("Failed to create collections dir"),
        };

        for (rel, content) in &self.collection_files {
            env.write_collection_file(rel, content);
        }
        if let Some(config) = &self.home_config {
            write_file(&env.home_path(".tether/config.toml"), config);
        }
        env
    }
}
