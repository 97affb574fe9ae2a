//! Safe Path Value Object
//!
//! Deployment paths are stored relative to a profile root and must never
//! leave the project directory:
//! - No path traversal (`..`)
//! - No absolute paths
//! - Resolved destinations stay within the project boundary

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Error when path validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Path contains traversal components (..)
    ContainsTraversal,
    /// Path escapes the root boundary
    EscapesBoundary { path: PathBuf, root: PathBuf },
    /// Path is absolute when relative is required
    AbsoluteNotAllowed,
    /// Path is empty
    Empty,
    /// A profile root must be exactly one directory name
    NotSingleComponent,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::ContainsTraversal => {
                write!(f, "Path contains traversal components (..)")
            }
            PathError::EscapesBoundary { path, root } => {
                write!(
                    f,
                    "Path '{}' escapes boundary '{}'",
                    path.display(),
                    root.display()
                )
            }
            PathError::AbsoluteNotAllowed => write!(f, "Absolute paths are not allowed"),
            PathError::Empty => write!(f, "Path is empty"),
            PathError::NotSingleComponent => {
                write!(f, "Profile root must be a single directory name")
            }
        }
    }
}

impl std::error::Error for PathError {}

/// A validated relative path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(PathBuf);

impl SafePath {
    /// Create a new SafePath after validation
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, PathError> {
        let path = path.as_ref();

        if path.as_os_str().is_empty() {
            return Err(PathError::Empty);
        }
        if path.is_absolute() || path.has_root() {
            return Err(PathError::AbsoluteNotAllowed);
        }
        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(PathError::ContainsTraversal);
        }

        Ok(Self(path.to_path_buf()))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Forward-slash form used in record files
    pub fn to_record_string(&self) -> String {
        normalize_record_path(&self.0)
    }
}

impl fmt::Display for SafePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for SafePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl TryFrom<&str> for SafePath {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalize a path for record storage (always use forward slashes).
pub fn normalize_record_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Check a profile root directory such as `.claude`: one plain name directly
/// under the project.
pub fn validate_root_dir(root: &str) -> Result<(), PathError> {
    let path = Path::new(root);
    if root.is_empty() {
        return Err(PathError::Empty);
    }
    if path.is_absolute() || path.has_root() {
        return Err(PathError::AbsoluteNotAllowed);
    }
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        (Some(Component::ParentDir), _) => Err(PathError::ContainsTraversal),
        _ if path.components().any(|c| c == Component::ParentDir) => {
            Err(PathError::ContainsTraversal)
        }
        _ => Err(PathError::NotSingleComponent),
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Ensure `candidate` resolves inside `root`.
///
/// The check is lexical first, then repeated on canonical paths for the
/// deepest existing ancestor so a symlinked directory can't smuggle the
/// destination outside the project.
pub fn ensure_within(root: &Path, candidate: &Path) -> Result<PathBuf, PathError> {
    let root_norm = normalize_lexically(root);
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    };
    let resolved = normalize_lexically(&joined);

    let escape = || PathError::EscapesBoundary {
        path: resolved.clone(),
        root: root.to_path_buf(),
    };

    if resolved == root_norm || !resolved.starts_with(&root_norm) {
        return Err(escape());
    }

    if let Ok(canonical_root) = root.canonicalize() {
        let mut probe = resolved.as_path();
        while !probe.exists() {
            match probe.parent() {
                Some(parent) => probe = parent,
                None => break,
            }
        }
        if let Ok(canonical_probe) = probe.canonicalize() {
            if !canonical_probe.starts_with(&canonical_root) {
                return Err(escape());
            }
        }
    }

    Ok(resolved)
}
