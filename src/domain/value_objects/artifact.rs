//! Artifact identity value objects
//!
//! An artifact is identified by its type and name. `ArtifactId` renders as
//! `type:name` (e.g. `skill:code-review`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TetherError;

/// Kind of configuration artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactType {
    Skill,
    Command,
    Agent,
    Hook,
    Mcp,
}

impl ArtifactType {
    pub const ALL: [ArtifactType; 5] = [
        ArtifactType::Skill,
        ArtifactType::Command,
        ArtifactType::Agent,
        ArtifactType::Hook,
        ArtifactType::Mcp,
    ];

    /// Identifier used in record files and keys
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactType::Skill => "skill",
            ArtifactType::Command => "command",
            ArtifactType::Agent => "agent",
            ArtifactType::Hook => "hook",
            ArtifactType::Mcp => "mcp",
        }
    }

    /// Directory holding artifacts of this type, in collections and profile roots
    pub fn directory_name(&self) -> &'static str {
        match self {
            ArtifactType::Skill => "skills",
            ArtifactType::Command => "commands",
            ArtifactType::Agent => "agents",
            ArtifactType::Hook => "hooks",
            ArtifactType::Mcp => "mcp",
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactType {
    type Err = TetherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skill" | "skills" => Ok(ArtifactType::Skill),
            "command" | "commands" => Ok(ArtifactType::Command),
            "agent" | "agents" => Ok(ArtifactType::Agent),
            "hook" | "hooks" => Ok(ArtifactType::Hook),
            "mcp" | "mcp_server" | "mcp-server" => Ok(ArtifactType::Mcp),
            other => Err(TetherError::validation(format!(
                "unknown artifact type '{}'",
                other
            ))),
        }
    }
}

/// Stable artifact identifier: type plus name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ArtifactId {
    pub artifact_type: ArtifactType,
    pub name: String,
}

impl ArtifactId {
    pub fn new(artifact_type: ArtifactType, name: impl Into<String>) -> Self {
        Self {
            artifact_type,
            name: name.into(),
        }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.artifact_type, self.name)
    }
}

impl FromStr for ArtifactId {
    type Err = TetherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, name) = s.split_once(':').ok_or_else(|| {
            TetherError::validation(format!("artifact id '{}' must look like 'type:name'", s))
        })?;
        if name.is_empty() {
            return Err(TetherError::validation(format!(
                "artifact id '{}' has an empty name",
                s
            )));
        }
        Ok(Self::new(kind.parse()?, name))
    }
}
