//! SHA-256 content hasher
//!
//! A file hashes as its raw bytes. A directory hashes as the sequence of
//! (relative path, bytes) for every regular file beneath it, sorted by the
//! forward-slash relative path. No absolute paths enter the digest, so the hash
//! survives copying or moving the tree.

use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::domain::ports::ContentHasher;
use crate::domain::value_objects::{normalize_record_path, ContentHash};
use crate::error::{TetherError, TetherResult};

/// Read buffer size for streaming file content
pub const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Default)]
pub struct Sha256Hasher {
    timeout: Option<Duration>,
}

impl Sha256Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound each `hash` call; `None` or zero disables the deadline
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            timeout: timeout.filter(|t| !t.is_zero()),
        }
    }

    fn deadline(&self) -> Option<Instant> {
        self.timeout.map(|t| Instant::now() + t)
    }
}

impl ContentHasher for Sha256Hasher {
    fn hash(&self, path: &Path) -> TetherResult<ContentHash> {
        let metadata = stat(path)?;
        let deadline = self.deadline();
        let mut hasher = Sha256::new();

        if metadata.is_file() {
            stream_file(&mut hasher, path, deadline)?;
        } else if metadata.is_dir() {
            for (relative, file) in sorted_files(path)? {
                check_deadline(path, deadline)?;
                hasher.update(relative.as_bytes());
                stream_file(&mut hasher, &file, deadline)?;
            }
        } else {
            return Err(TetherError::InvalidPath {
                path: path.to_path_buf(),
            });
        }

        Ok(ContentHash::from_digest(hasher))
    }

    fn count_files(&self, path: &Path) -> TetherResult<u64> {
        let metadata = stat(path)?;
        if metadata.is_file() {
            return Ok(1);
        }
        if !metadata.is_dir() {
            return Err(TetherError::InvalidPath {
                path: path.to_path_buf(),
            });
        }

        let mut count = 0;
        for entry in WalkDir::new(path).follow_links(false) {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_file() {
                count += 1;
            }
        }
        Ok(count)
    }
}

/// Every regular file under `root`, keyed and sorted by relative path.
///
/// Symlinks are not followed and not included.
pub fn sorted_files(root: &Path) -> TetherResult<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map(normalize_record_path)
            .map_err(|_| TetherError::InvalidPath {
                path: entry.path().to_path_buf(),
            })?;
        files.push((relative, entry.into_path()));
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

fn stat(path: &Path) -> TetherResult<fs::Metadata> {
    fs::metadata(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            TetherError::not_found(format!("path {}", path.display()))
        } else {
            TetherError::Io(e)
        }
    })
}

fn stream_file(hasher: &mut Sha256, path: &Path, deadline: Option<Instant>) -> TetherResult<()> {
    let mut file = File::open(path)?;
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        check_deadline(path, deadline)?;
        let read = file.read(&mut buffer)?;
        if read == 0 {
            return Ok(());
        }
        hasher.update(&buffer[..read]);
    }
}

fn check_deadline(path: &Path, deadline: Option<Instant>) -> TetherResult<()> {
    match deadline {
        Some(deadline) if Instant::now() > deadline => Err(TetherError::Timeout {
            path: path.to_path_buf(),
        }),
        _ => Ok(()),
    }
}
