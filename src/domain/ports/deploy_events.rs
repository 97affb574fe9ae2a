//! Deploy Event Port
//!
//! Fire-and-forget analytics for deploy operations. Sink failures are logged
//! by the caller and never change the outcome of a deploy.

use std::path::PathBuf;

use crate::domain::value_objects::ArtifactId;

/// Event emitted during deploy operations
#[derive(Debug, Clone)]
pub enum DeployEvent {
    /// An artifact was copied and recorded
    Deployed {
        artifact: ArtifactId,
        collection: String,
        project: PathBuf,
        profile_id: String,
        content_hash: String,
    },

    /// An artifact × profile pair was skipped (user declined overwrite)
    Skipped {
        artifact: ArtifactId,
        project: PathBuf,
        profile_id: String,
        reason: String,
    },

    /// An artifact × profile pair failed
    Failed {
        artifact: ArtifactId,
        project: PathBuf,
        profile_id: String,
        error: String,
    },

    /// An artifact was removed from a project
    Undeployed {
        artifact: ArtifactId,
        project: PathBuf,
        removed_records: usize,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("event sink error: {message}")]
pub struct EventSinkError {
    pub message: String,
}

/// Trait for receiving deploy events
pub trait DeployEventSink: Send + Sync {
    fn on_event(&self, event: &DeployEvent) -> Result<(), EventSinkError>;
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: &DeployEvent) -> Result<(), EventSinkError> {
        Ok(())
    }
}
