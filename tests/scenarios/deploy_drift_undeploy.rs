//! Scenario: Deploy, Drift, Undeploy
//!
//! Journey: A developer deploys a skill, edits it locally, notices the drift,
//! then removes it.
//!
//! Steps:
//! 1. Deploy a three-file skill under the default profile
//! 2. Deployed copy hashes identically to the collection copy
//! 3. Status reports synced
//! 4. Edit one deployed file; status reports modified
//! 5. Undeploy; the record and files are gone
//! 6. A second undeploy fails with "not found"

use tether::domain::ports::ContentHasher;
use tether::infrastructure::Sha256Hasher;

use crate::common::*;
use crate::{assert_deployed, assert_not_deployed, assert_output_contains, assert_success};

fn env_with_pdf() -> TestEnv {
    TestEnv::builder().with_skill("default", "pdf", PDF_SKILL).build()
}

#[test]
fn scenario_deploy_edit_undeploy() {
    let env = env_with_pdf();

    // Step 1
    let result = env.run(&["deploy", "skill:pdf", "--collection", "default", "--json"]);
    assert_success!(result);
    let lines = result.json_lines();
    assert!(lines.iter().any(|l| l["event"] == "deployed"));
    let summary = lines.last().unwrap();
    assert_eq!(summary["event"], "deploy_complete");
    assert_eq!(summary["status"], "success");
    assert_eq!(summary["report"]["deployed"][0]["profile_id"], "claude_code");

    assert_deployed!(env, ".claude/skills/pdf/SKILL.md");
    assert_deployed!(env, ".claude/skills/pdf/scripts/extract.py");
    assert_deployed!(env, ".claude/.tether-deployed.toml");

    // Step 2
    let hasher = Sha256Hasher::new();
    assert_eq!(
        hasher.hash(&env.collection_path("default/skills/pdf")).unwrap(),
        hasher.hash(&env.project_path(".claude/skills/pdf")).unwrap()
    );

    // Step 3
    let result = env.run(&["status", "--json"]);
    assert_success!(result);
    assert_eq!(result.json()["statuses"]["pdf::skill"], "synced");

    // Step 4
    env.write_project_file(".claude/skills/pdf/reference.md", "## Reference\n\nmine now\n");
    let result = env.run(&["status", "--json"]);
    assert_success!(result);
    assert_eq!(result.json()["statuses"]["pdf::skill"], "modified");

    let result = env.run(&["status", "skill:pdf"]);
    assert_success!(result);
    assert_output_contains!(result, "skill:pdf: modified");

    // Step 5
    let result = env.run(&["undeploy", "skill:pdf"]);
    assert_success!(result);
    assert_not_deployed!(env, ".claude/skills/pdf");

    let result = env.run(&["list", "--json"]);
    assert_success!(result);
    assert_eq!(result.json(), serde_json::json!([]));

    // Step 6
    let result = env.run(&["undeploy", "skill:pdf"]);
    assert!(!result.success);
    assert_output_contains!(result, "not found");
}

#[test]
fn scenario_refresh_writes_flags_back() {
    let env = env_with_pdf();
    assert_success!(env.run(&["deploy", "skill:pdf"]));
    env.write_project_file(".claude/skills/pdf/SKILL.md", "# PDF (local)\n");

    assert_success!(env.run(&["status", "--refresh"]));

    let records = env.read_project_file(".claude/.tether-deployed.toml");
    assert!(records.contains("local_modifications = true"), "{records}");
    assert!(records.contains("modification_detected_at"), "{records}");
}

#[test]
fn scenario_existing_content_is_kept_without_confirmation() {
    let env = TestEnv::builder()
        .with_collection_file("default/commands/review.md", REVIEW_COMMAND)
        .build();
    env.write_project_file(".claude/commands/review.md", "hand written\n");

    // Not a terminal and no --yes: the existing file is skipped
    let result = env.run(&["deploy", "command:review"]);
    assert_success!(result);
    assert_output_contains!(result, "skipped");
    assert_eq!(env.read_project_file(".claude/commands/review.md"), "hand written\n");

    let result = env.run(&["deploy", "command:review", "--yes"]);
    assert_success!(result);
    assert_eq!(env.read_project_file(".claude/commands/review.md"), REVIEW_COMMAND);
}

#[test]
fn scenario_missing_artifact_fails_the_command_but_deploys_the_rest() {
    let env = TestEnv::builder()
        .with_collection_file("default/agents/planner.md", PLANNER_AGENT)
        .build();

    let result = env.run(&["deploy", "agent:planner", "skill:ghost"]);

    assert!(!result.success);
    assert_output_contains!(result, "skill:ghost");
    assert_deployed!(env, ".claude/agents/planner.md");
}
