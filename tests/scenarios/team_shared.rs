//! Scenario: Shared Command Across Projects
//!
//! Journey: A team lead deploys the same command into two projects, one
//! teammate edits their copy, then the lead updates the collection.
//!
//! Success Criteria:
//! - Both projects appear in the registry
//! - The graph shows both copies under the collection root until the
//!   collection changes, after which both are orphaned

use std::fs;

use tempfile::TempDir;

use crate::common::*;
use crate::{assert_output_contains, assert_success};

fn location(dir: &TempDir) -> String {
    fs::canonicalize(dir.path()).unwrap().display().to_string()
}

#[test]
fn scenario_graph_tracks_two_projects() {
    let env = TestEnv::builder()
        .with_collection_file("default/commands/review.md", REVIEW_COMMAND)
        .build();
    let second = TempDir::new().unwrap();
    let second_path = second.path().display().to_string();

    assert_success!(env.run(&["deploy", "command:review"]));
    assert_success!(env.run(&["deploy", "command:review", "-p", &second_path]));

    let result = env.run(&["projects", "--json"]);
    assert_success!(result);
    assert_eq!(result.json()["projects"].as_array().unwrap().len(), 2);

    // Teammate edits their copy
    write_file(&second.path().join(".claude/commands/review.md"), "my review\n");

    let result = env.run(&["graph", "command:review", "--json"]);
    assert_success!(result);
    let graph = result.json();
    let children = graph["root"]["children"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(graph["statistics"]["modified_count"], 1);
    assert_eq!(graph["statistics"]["unmodified_count"], 1);
    assert!(graph["orphaned_nodes"].as_array().unwrap().is_empty());
    assert!(children
        .iter()
        .any(|c| c["version"]["location"] == location(&second)));

    // Collection moves on
    env.write_collection_file("default/commands/review.md", "Review harder.\n");

    let result = env.run(&["graph", "command:review", "--json"]);
    assert_success!(result);
    let graph = result.json();
    assert!(graph["root"]["children"].as_array().unwrap().is_empty());
    assert_eq!(graph["statistics"]["orphan_count"], 2);

    let result = env.run(&["graph", "command:review"]);
    assert_success!(result);
    assert_output_contains!(result, "orphaned");
}

#[test]
fn scenario_prune_drops_vanished_projects() {
    let env = TestEnv::builder()
        .with_collection_file("default/commands/review.md", REVIEW_COMMAND)
        .build();
    let doomed = TempDir::new().unwrap();
    let doomed_path = doomed.path().display().to_string();

    assert_success!(env.run(&["deploy", "command:review"]));
    assert_success!(env.run(&["deploy", "command:review", "-p", &doomed_path]));
    drop(doomed);

    let result = env.run(&["projects", "--prune", "--json"]);
    assert_success!(result);
    let output = result.json();
    assert_eq!(output["pruned"].as_array().unwrap().len(), 1);
    assert_eq!(output["projects"].as_array().unwrap().len(), 1);
}
