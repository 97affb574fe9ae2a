//! JSON output contracts: `--json` stdout is machine-readable only.

use crate::common::*;
use crate::assert_success;

/// CONTRACT: Every stdout line of `deploy --json` is a JSON object with an `event`.
#[test]
fn contract_deploy_json_is_ndjson() {
    let env = TestEnv::builder()
        .with_skill("default", "pdf", PDF_SKILL)
        .with_collection_file("default/commands/review.md", REVIEW_COMMAND)
        .build();

    let result = env.run(&["deploy", "--all", "--json"]);
    assert_success!(result);

    let lines = result.json_lines();
    assert!(lines.iter().all(|l| l["event"].is_string()));
    assert_eq!(lines.iter().filter(|l| l["event"] == "deployed").count(), 2);
    let summary = lines.last().unwrap();
    assert_eq!(summary["event"], "deploy_complete");
    assert_eq!(summary["report"]["deployed"].as_array().unwrap().len(), 2);
}

/// CONTRACT: `status --json` keeps failures separate from statuses.
#[test]
fn contract_status_json_shape() {
    let env = TestEnv::builder()
        .with_collection_file("default/commands/review.md", REVIEW_COMMAND)
        .build();
    assert_success!(env.run(&["deploy", "command:review"]));

    let result = env.run(&["status", "--json"]);
    assert_success!(result);
    let json = result.json();
    assert!(json["statuses"].is_object());
    assert!(json["failures"].as_array().unwrap().is_empty());
    assert!(json.get("records").is_none());
}

/// CONTRACT: A deleted deployment counts as synced, not as an error.
#[test]
fn contract_missing_deployment_is_synced() {
    let env = TestEnv::builder()
        .with_collection_file("default/commands/review.md", REVIEW_COMMAND)
        .build();
    assert_success!(env.run(&["deploy", "command:review"]));
    std::fs::remove_file(env.project_path(".claude/commands/review.md")).unwrap();

    let result = env.run(&["status", "--json"]);
    assert_success!(result);
    assert_eq!(result.json()["statuses"]["review::command"], "synced");
}
