//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink, EventSinkError};
use std::io::{self, Write};

use parking_lot::Mutex;

/// Event sink that writes one JSON object per line
pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }
}

fn to_json(event: &DeployEvent) -> serde_json::Value {
    match event {
        DeployEvent::Deployed {
            artifact,
            collection,
            project,
            profile_id,
            content_hash,
        } => serde_json::json!({
            "event": "deployed",
            "artifact": artifact.to_string(),
            "collection": collection,
            "project": project.display().to_string(),
            "profile_id": profile_id,
            "content_hash": content_hash,
        }),

        DeployEvent::Skipped {
            artifact,
            project,
            profile_id,
            reason,
        } => serde_json::json!({
            "event": "deploy_skipped",
            "artifact": artifact.to_string(),
            "project": project.display().to_string(),
            "profile_id": profile_id,
            "reason": reason,
        }),

        DeployEvent::Failed {
            artifact,
            project,
            profile_id,
            error,
        } => serde_json::json!({
            "event": "deploy_failed",
            "artifact": artifact.to_string(),
            "project": project.display().to_string(),
            "profile_id": profile_id,
            "error": error,
        }),

        DeployEvent::Undeployed {
            artifact,
            project,
            removed_records,
        } => serde_json::json!({
            "event": "undeployed",
            "artifact": artifact.to_string(),
            "project": project.display().to_string(),
            "removed_records": removed_records,
        }),
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: &DeployEvent) -> Result<(), EventSinkError> {
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", to_json(event))
            .and_then(|_| writer.flush())
            .map_err(|e| EventSinkError {
                message: e.to_string(),
            })
    }
}
