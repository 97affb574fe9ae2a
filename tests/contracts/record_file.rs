//! Record file contracts.

use tether::domain::ports::ContentHasher;
use tether::infrastructure::Sha256Hasher;

use crate::common::*;
use crate::{assert_output_contains, assert_success};

fn env_with_review() -> TestEnv {
    TestEnv::builder()
        .with_collection_file("default/commands/review.md", REVIEW_COMMAND)
        .build()
}

/// CONTRACT: Record files are versioned and keyed by `[[deployed]]` tables.
#[test]
fn contract_record_file_layout() {
    let env = env_with_review();
    assert_success!(env.run(&["deploy", "command:review"]));

    let content = env.read_project_file(".claude/.tether-deployed.toml");
    let parsed: toml::Value = toml::from_str(&content).unwrap();

    assert_eq!(parsed["version"].as_integer(), Some(1));
    let entry = &parsed["deployed"][0];
    assert_eq!(entry["artifact_name"].as_str(), Some("review"));
    assert_eq!(entry["artifact_type"].as_str(), Some("command"));
    assert_eq!(entry["source_collection_name"].as_str(), Some("default"));
    assert_eq!(entry["relative_path"].as_str(), Some("commands/review.md"));
    assert_eq!(entry["deployment_profile_id"].as_str(), Some("claude_code"));
    assert!(entry.get("content_hash").is_some());
    assert!(entry.get("collection_sha").is_none());
}

/// CONTRACT: Records written before `content_hash` existed are still read.
#[test]
fn contract_legacy_collection_sha_is_read() {
    let env = env_with_review();
    env.write_project_file(".claude/commands/review.md", REVIEW_COMMAND);
    let hash = Sha256Hasher::new()
        .hash(&env.project_path(".claude/commands/review.md"))
        .unwrap();
    env.write_project_file(
        ".claude/.tether-deployed.toml",
        &format!(
            "[[deployed]]\n\
             artifact_name = \"review\"\n\
             artifact_type = \"command\"\n\
             source_collection_name = \"default\"\n\
             deployed_at = \"2024-05-01T12:00:00Z\"\n\
             relative_path = \"commands/review.md\"\n\
             collection_sha = \"{}\"\n",
            hash
        ),
    );

    let result = env.run(&["status", "--json"]);
    assert_success!(result);
    assert_eq!(result.json()["statuses"]["review::command"], "synced");

    let result = env.run(&["list", "--json"]);
    assert_success!(result);
    assert_eq!(result.json()[0]["profile_id"], "claude_code");
}

/// CONTRACT: A record with neither hash field is an error naming both fields.
#[test]
fn contract_missing_hash_is_reported() {
    let env = env_with_review();
    env.write_project_file(
        ".claude/.tether-deployed.toml",
        "version = 1\n\n[[deployed]]\n\
         artifact_name = \"review\"\n\
         artifact_type = \"command\"\n\
         deployed_at = \"2024-05-01T12:00:00Z\"\n\
         relative_path = \"commands/review.md\"\n",
    );

    let result = env.run(&["list"]);
    assert!(!result.success);
    assert_output_contains!(result, "content_hash");
    assert_output_contains!(result, "collection_sha");
}

/// CONTRACT: A corrupted record file is an error, never silently emptied.
#[test]
fn contract_corrupted_record_file_is_kept() {
    let env = env_with_review();
    env.write_project_file(".claude/.tether-deployed.toml", "[[deployed]\nbroken");

    let result = env.run(&["deploy", "command:review", "--yes"]);
    assert!(!result.success);
    assert_output_contains!(result, "corrupted");
    assert_eq!(
        env.read_project_file(".claude/.tether-deployed.toml"),
        "[[deployed]\nbroken"
    );
}
