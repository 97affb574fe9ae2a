//! Local Collection Provider
//!
//! Collections are plain directories:
//!
//! ```text
//! <collections_dir>/<collection>/skills/pdf/SKILL.md
//! <collections_dir>/<collection>/commands/review.md
//! ```
//!
//! A directory artifact is named after the directory; a file artifact after its
//! file stem. Stable ids, when known, come from `<collection>/.tether-ids.toml`.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::ports::{CollectionArtifact, CollectionProvider};
use crate::domain::value_objects::{ArtifactId, ArtifactType};
use crate::error::{TetherError, TetherResult};

const IDS_FILE: &str = ".tether-ids.toml";

#[derive(Debug, Default, Deserialize)]
struct TomlIds {
    /// `"type:name"` → uuid
    #[serde(default)]
    ids: BTreeMap<String, String>,
}

pub struct LocalCollection {
    root: PathBuf,
}

impl LocalCollection {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> TetherResult<PathBuf> {
        if collection.is_empty() || collection.contains(['/', '\\']) || collection.starts_with('.')
        {
            return Err(TetherError::validation(format!(
                "invalid collection name '{}'",
                collection
            )));
        }
        Ok(self.root.join(collection))
    }

    fn load_ids(dir: &Path) -> TetherResult<BTreeMap<String, String>> {
        let path = dir.join(IDS_FILE);
        match fs::read_to_string(&path) {
            Ok(content) => toml::from_str::<TomlIds>(&content)
                .map(|f| f.ids)
                .map_err(|e| {
                    TetherError::validation(format!("{}: {}", path.display(), e))
                }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn artifacts_of_type(
        collection: &str,
        dir: &Path,
        artifact_type: ArtifactType,
        ids: &BTreeMap<String, String>,
    ) -> TetherResult<Vec<CollectionArtifact>> {
        let type_dir = dir.join(artifact_type.directory_name());
        let entries = match fs::read_dir(&type_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut artifacts = Vec::new();
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if file_name.starts_with('.') {
                continue;
            }
            let file_type = entry.file_type()?;
            let name = if file_type.is_dir() {
                file_name
            } else if file_type.is_file() {
                match Path::new(&file_name).file_stem() {
                    Some(stem) => stem.to_string_lossy().into_owned(),
                    None => continue,
                }
            } else {
                continue;
            };

            let id = ArtifactId::new(artifact_type, name);
            artifacts.push(CollectionArtifact {
                uuid: ids.get(&id.to_string()).cloned(),
                id,
                collection: collection.to_string(),
                path: entry.path(),
            });
        }
        Ok(artifacts)
    }
}

impl CollectionProvider for LocalCollection {
    fn list_collections(&self) -> TetherResult<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type()?.is_dir() && !name.starts_with('.') {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Every artifact in the collection, sorted by type then name
    fn list_artifacts(&self, collection: &str) -> TetherResult<Vec<CollectionArtifact>> {
        let dir = self.collection_dir(collection)?;
        if !dir.is_dir() {
            return Err(TetherError::not_found(format!("collection '{}'", collection)));
        }

        let ids = Self::load_ids(&dir)?;
        let mut artifacts = Vec::new();
        for artifact_type in ArtifactType::ALL {
            artifacts.extend(Self::artifacts_of_type(collection, &dir, artifact_type, &ids)?);
        }
        artifacts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(artifacts)
    }

    fn find_artifact(
        &self,
        collection: Option<&str>,
        id: &ArtifactId,
    ) -> TetherResult<Option<CollectionArtifact>> {
        let collections = match collection {
            Some(name) => vec![name.to_string()],
            None => self.list_collections()?,
        };

        for name in collections {
            let dir = self.collection_dir(&name)?;
            if !dir.is_dir() {
                continue;
            }
            let ids = Self::load_ids(&dir)?;
            let found = Self::artifacts_of_type(&name, &dir, id.artifact_type, &ids)?
                .into_iter()
                .find(|a| a.id == *id);
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }
}
