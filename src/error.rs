//! Error types for Tether
//!
//! Uses `thiserror` for library errors. The binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::RegistryError;

/// Result type alias for Tether operations
pub type TetherResult<T> = Result<T, TetherError>;

/// Main error type for Tether operations
#[derive(Error, Debug)]
pub enum TetherError {
    /// A record, artifact, collection or project is absent
    #[error("{what} not found")]
    NotFound { what: String },

    /// An explicit profile id is not known for the project
    #[error("profile '{profile_id}' is not configured for project {project}")]
    ProfileNotFound { profile_id: String, project: PathBuf },

    /// Path escapes project boundary (security issue)
    #[error("path '{path}' escapes project boundary '{root}'")]
    PathEscape { path: PathBuf, root: PathBuf },

    /// Input failed validation
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// A deployment record carries neither hash field
    #[error(
        "deployment record for '{artifact}' has no hash: expected 'content_hash' or 'collection_sha'"
    )]
    MissingHash { artifact: String },

    /// A deployment record file could not be parsed
    #[error("deployment record file corrupted: {path}\n  → Details: {message}")]
    RecordFileCorrupted { path: PathBuf, message: String },

    /// A deployment record file could not be serialized
    #[error("failed to serialize deployment records: {message}")]
    Serialization { message: String },

    /// Path is neither a regular file nor a directory
    #[error("not a file or directory: {path}")]
    InvalidPath { path: PathBuf },

    /// Hashing ran past its deadline
    #[error("hashing timed out: {path}")]
    Timeout { path: PathBuf },

    /// Config file exists but is not valid TOML for `Config`
    #[error("invalid config file {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    /// Project registry could not be read or written
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TetherError {
    pub fn not_found(what: impl Into<String>) -> Self {
        TetherError::NotFound { what: what.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        TetherError::Validation {
            message: message.into(),
        }
    }

    /// True when the error means the path or record simply isn't there
    pub fn is_not_found(&self) -> bool {
        match self {
            TetherError::NotFound { .. } => true,
            TetherError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
