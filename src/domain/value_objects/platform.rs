//! Platform value object - which AI tool a deployment profile targets

use std::fmt;

use serde::{Deserialize, Serialize};

/// Target platform of a deployment profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Claude Code (Anthropic)
    #[default]
    #[serde(alias = "claude-code")]
    ClaudeCode,
    /// OpenAI Codex CLI
    Codex,
    /// Google Gemini CLI
    Gemini,
    /// Cursor IDE
    Cursor,
    /// Any other tool; its root directory is derived from the profile id
    Other,
}

impl Platform {
    /// Concrete platforms with a well-known root directory
    pub const KNOWN: [Platform; 4] = [
        Platform::ClaudeCode,
        Platform::Codex,
        Platform::Gemini,
        Platform::Cursor,
    ];

    /// Identifier used in record files
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::ClaudeCode => "claude_code",
            Platform::Codex => "codex",
            Platform::Gemini => "gemini",
            Platform::Cursor => "cursor",
            Platform::Other => "other",
        }
    }

    /// Map a profile id onto a platform; unknown ids become `Other`
    pub fn from_profile_id(profile_id: &str) -> Self {
        match profile_id.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "claude_code" | "claude" => Platform::ClaudeCode,
            "codex" => Platform::Codex,
            "gemini" => Platform::Gemini,
            "cursor" => Platform::Cursor,
            _ => Platform::Other,
        }
    }

    /// Static platform → root directory table used when no profile is persisted
    pub fn default_root_dir(&self, profile_id: &str) -> String {
        match self {
            Platform::ClaudeCode => ".claude".to_string(),
            Platform::Codex => ".codex".to_string(),
            Platform::Gemini => ".gemini".to_string(),
            Platform::Cursor => ".cursor".to_string(),
            Platform::Other => format!(".{}", profile_id),
        }
    }

    /// Reverse of the root directory table: the profile id a bare root implies.
    ///
    /// `.codex` → `codex`, `.windsurf` → `windsurf`.
    pub fn profile_id_for_root_dir(root_dir: &str) -> String {
        if let Some(platform) = Self::KNOWN
            .iter()
            .find(|p| p.default_root_dir(p.as_str()) == root_dir)
        {
            return platform.as_str().to_string();
        }
        match root_dir.trim_start_matches('.') {
            "" => Platform::ClaudeCode.as_str().to_string(),
            id => id.to_string(),
        }
    }

    /// Get a human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::ClaudeCode => "Claude Code",
            Platform::Codex => "Codex",
            Platform::Gemini => "Gemini",
            Platform::Cursor => "Cursor",
            Platform::Other => "Other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
