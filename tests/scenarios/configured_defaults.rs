//! Scenario: Configured Defaults
//!
//! Journey: A user keeps several collections and sets a default in
//! `~/.tether/config.toml`, with a typo in one key.
//!
//! Success Criteria:
//! - The default collection is used when `--collection` is omitted
//! - The typo is reported with a suggestion, not treated as an error

use crate::common::*;
use crate::{assert_deployed, assert_output_contains, assert_success};

#[test]
fn scenario_default_collection_from_config() {
    let env = TestEnv::builder()
        .with_collection_file("personal/commands/review.md", "personal\n")
        .with_collection_file("work/commands/review.md", "work\n")
        .with_home_config("default_collection = \"work\"\n\n[graph]\ncache_ttl_sec = 10\n")
        .build();

    let result = env.run(&["deploy", "command:review"]);
    assert_success!(result);
    assert_deployed!(env, ".claude/commands/review.md");
    assert_eq!(env.read_project_file(".claude/commands/review.md"), "work\n");
    assert_output_contains!(result, "cache_ttl_secs");

    let result = env.run(&["list", "--json"]);
    assert_success!(result);
    assert_eq!(result.json()[0]["collection"], "work");
}

#[test]
fn scenario_invalid_config_is_reported() {
    let env = TestEnv::builder()
        .with_home_config("workers = \"plenty\"\n")
        .build();

    let result = env.run(&["list"]);
    assert!(!result.success);
    assert_output_contains!(result, "invalid config file");
}
