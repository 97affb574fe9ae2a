//! Artifact copy, removal and atomic writes
//!
//! Copies are staged next to the destination and renamed into place, so a
//! reader never observes a half-copied artifact.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{TetherError, TetherResult};
use crate::infrastructure::fs::hasher::sorted_files;

/// Write content to a file atomically (temp file in the same directory + rename)
pub fn atomic_write(path: &Path, content: &[u8]) -> TetherResult<()> {
    let parent = parent_dir(path)?;
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| TetherError::Io(e.error))?;
    Ok(())
}

/// Copy a file or directory artifact to `dest`, replacing whatever is there
pub fn copy_artifact(source: &Path, dest: &Path) -> TetherResult<()> {
    let metadata = fs::metadata(source).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            TetherError::not_found(format!("artifact source {}", source.display()))
        } else {
            TetherError::Io(e)
        }
    })?;
    let parent = parent_dir(dest)?;
    fs::create_dir_all(parent)?;

    if metadata.is_file() {
        let temp = NamedTempFile::new_in(parent)?;
        fs::copy(source, temp.path())?;
        if dest.is_dir() {
            fs::remove_dir_all(dest)?;
        }
        temp.persist(dest).map_err(|e| TetherError::Io(e.error))?;
        return Ok(());
    }

    if !metadata.is_dir() {
        return Err(TetherError::InvalidPath {
            path: source.to_path_buf(),
        });
    }

    let staging = tempfile::Builder::new()
        .prefix(".tether-staging-")
        .tempdir_in(parent)?;
    for (relative, file) in sorted_files(source)? {
        let target = staging.path().join(&relative);
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::copy(&file, &target)?;
    }

    remove_path(dest)?;
    fs::rename(staging.path(), dest)?;
    Ok(())
}

/// Remove a file or directory tree. Returns false when nothing was there.
pub fn remove_path(path: &Path) -> TetherResult<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(true)
}

fn parent_dir(path: &Path) -> TetherResult<&Path> {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| TetherError::InvalidPath {
            path: path.to_path_buf(),
        })
}
