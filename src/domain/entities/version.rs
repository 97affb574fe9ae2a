//! Version lineage entities
//!
//! A version graph is a tree rooted at the collection's current copy of an
//! artifact. Project deployments whose recorded parent hash matches the root
//! become its children; the rest are orphans.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::{ArtifactId, ContentHash};

/// Location label used for the collection copy
pub const COLLECTION_LOCATION: &str = "collection";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Collection,
    Project,
}

/// One observed copy of an artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactVersion {
    pub artifact: ArtifactId,
    pub content_sha: ContentHash,
    /// `"collection"` or the absolute project path
    pub location: String,
    pub location_type: LocationType,
    pub collection_name: Option<String>,
    pub parent_sha: Option<ContentHash>,
    pub created_at: DateTime<Utc>,
    pub metadata_snapshot: BTreeMap<String, String>,
}

impl ArtifactVersion {
    /// True when this copy has diverged from the version it was made from
    pub fn is_modified(&self) -> bool {
        self.parent_sha
            .as_ref()
            .is_some_and(|parent| *parent != self.content_sha)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionGraphNode {
    pub version: ArtifactVersion,
    pub children: Vec<VersionGraphNode>,
}

impl VersionGraphNode {
    pub fn new(version: ArtifactVersion) -> Self {
        Self {
            version,
            children: Vec::new(),
        }
    }

    pub fn artifact(&self) -> &ArtifactId {
        &self.version.artifact
    }

    pub fn is_collection_root(&self) -> bool {
        self.version.location_type == LocationType::Collection
    }

    /// Modified copies in this subtree, including this node
    pub fn modification_count(&self) -> usize {
        let own = usize::from(self.version.is_modified());
        own + self
            .children
            .iter()
            .map(VersionGraphNode::modification_count)
            .sum::<usize>()
    }

    /// Nodes in this subtree, including this node
    pub fn total_instances(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(VersionGraphNode::total_instances)
            .sum::<usize>()
    }
}

/// Project copies only; `modified_count + unmodified_count == total_deployments`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStatistics {
    pub total_deployments: usize,
    pub modified_count: usize,
    pub unmodified_count: usize,
    pub orphan_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionGraph {
    pub artifact: ArtifactId,
    pub root: Option<VersionGraphNode>,
    pub orphaned_nodes: Vec<VersionGraphNode>,
    pub statistics: GraphStatistics,
    pub last_updated: DateTime<Utc>,
}

impl VersionGraph {
    /// Every project node, attached or orphaned
    pub fn deployments(&self) -> impl Iterator<Item = &VersionGraphNode> {
        let attached = self.root.iter().flat_map(|root| root.children.iter());
        attached.chain(self.orphaned_nodes.iter())
    }

    pub fn find_by_location(&self, location: &str) -> Option<&VersionGraphNode> {
        self.deployments()
            .find(|node| node.version.location == location)
    }
}
