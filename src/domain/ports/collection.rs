//! CollectionProvider port - read-only access to artifact collections

use std::path::PathBuf;

use crate::domain::value_objects::ArtifactId;
use crate::error::TetherResult;

/// An artifact as it exists in a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionArtifact {
    pub id: ArtifactId,
    pub collection: String,
    /// File or directory holding the artifact
    pub path: PathBuf,
    pub uuid: Option<String>,
}

impl CollectionArtifact {
    /// Name of the file or directory in the collection (e.g. `review.md`)
    pub fn entry_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.id.name.clone())
    }
}

pub trait CollectionProvider: Send + Sync {
    fn list_collections(&self) -> TetherResult<Vec<String>>;

    fn list_artifacts(&self, collection: &str) -> TetherResult<Vec<CollectionArtifact>>;

    /// Search one collection, or all of them in order when `collection` is `None`
    fn find_artifact(
        &self,
        collection: Option<&str>,
        id: &ArtifactId,
    ) -> TetherResult<Option<CollectionArtifact>>;
}
