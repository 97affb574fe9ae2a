//! Version tree assembly
//!
//! Attaches project copies to the collection root by comparing each copy's
//! recorded parent hash with the root's current hash.

use chrono::{DateTime, Utc};

use crate::domain::entities::{
    ArtifactVersion, GraphStatistics, VersionGraph, VersionGraphNode,
};
use crate::domain::value_objects::ArtifactId;

/// Build a graph from an optional collection version and discovered project copies.
///
/// A copy becomes a child of the root iff its `parent_sha` equals the root's
/// current `content_sha`; everything else (including every copy when there is
/// no root) is orphaned.
pub fn assemble_graph(
    artifact: ArtifactId,
    root: Option<ArtifactVersion>,
    mut deployments: Vec<ArtifactVersion>,
    now: DateTime<Utc>,
) -> VersionGraph {
    deployments.sort_by(|a, b| a.location.cmp(&b.location));

    let mut root_node = root.map(VersionGraphNode::new);
    let mut orphaned_nodes = Vec::new();

    for version in deployments {
        let attaches = match (&root_node, &version.parent_sha) {
            (Some(root), Some(parent)) => *parent == root.version.content_sha,
            _ => false,
        };
        match root_node.as_mut() {
            Some(root) if attaches => root.children.push(VersionGraphNode::new(version)),
            _ => orphaned_nodes.push(VersionGraphNode::new(version)),
        }
    }

    let statistics = compute_statistics(root_node.as_ref(), &orphaned_nodes);

    VersionGraph {
        artifact,
        root: root_node,
        orphaned_nodes,
        statistics,
        last_updated: now,
    }
}

/// Counts every project node, attached or orphaned; the collection root
/// itself is never a deployment.
fn compute_statistics(
    root: Option<&VersionGraphNode>,
    orphans: &[VersionGraphNode],
) -> GraphStatistics {
    let (attached, attached_modified) = match root {
        Some(root) => {
            let own = usize::from(root.version.is_modified());
            (root.total_instances() - 1, root.modification_count() - own)
        }
        None => (0, 0),
    };
    let orphan_modified: usize = orphans.iter().map(VersionGraphNode::modification_count).sum();
    let orphan_total: usize = orphans.iter().map(VersionGraphNode::total_instances).sum();

    let total_deployments = attached + orphan_total;
    let modified_count = attached_modified + orphan_modified;
    GraphStatistics {
        total_deployments,
        modified_count,
        unmodified_count: total_deployments - modified_count,
        orphan_count: orphans.len(),
    }
}
