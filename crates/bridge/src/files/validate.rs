//! Local path validation.
//!
//! Every path the local filesystem adapter touches goes through
//! [`PathValidator`] first: user-home shorthand is expanded, relative paths
//! are resolved against the working directory, `.` and `..` components are
//! folded, and the result must exist on disk. Validation is an existence
//! check, not a containment check: any existing absolute path on the host
//! is reachable. Callers must not assume a subtree sandbox.

use std::env;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Errors from local path validation and filesystem operations.
#[derive(Debug, Error)]
pub enum FsError {
    /// The resolved path does not exist on disk.
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// A file read was attempted on a directory.
    #[error("path is a directory: {0}")]
    IsADirectory(PathBuf),

    /// A directory was expected but the path is something else.
    #[error("path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A file name that would escape its directory was rejected.
    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    /// Underlying IO failure.
    #[error("IO error on {path}: {source}")]
    Io {
        /// Path the operation touched.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Wrap an IO error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FsError::Io {
            path: path.into(),
            source,
        }
    }
}

/// An absolute, existence-checked local path.
///
/// The only way to obtain one is [`PathValidator::validate`]; adapter
/// operations take this type instead of raw strings so unvalidated input
/// cannot reach the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLocalPath(PathBuf);

impl ValidatedLocalPath {
    /// The validated absolute path.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Parent directory, or the path itself when it has none (root).
    ///
    /// An existing path's ancestors exist, so rewrapping keeps the
    /// invariant.
    pub fn parent_or_self(&self) -> ValidatedLocalPath {
        match self.0.parent() {
            Some(parent) => ValidatedLocalPath(parent.to_path_buf()),
            None => self.clone(),
        }
    }

    /// Join a plain file name onto this path.
    ///
    /// Rejects empty names and names containing path separators or dot
    /// components, so the result cannot land outside this directory.
    pub fn join_name(&self, name: &str) -> Result<PathBuf, FsError> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name == "."
            || name == ".."
        {
            return Err(FsError::InvalidFileName(name.to_string()));
        }
        Ok(self.0.join(name))
    }
}

impl AsRef<Path> for ValidatedLocalPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for ValidatedLocalPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.display().fmt(f)
    }
}

/// Validates raw user-supplied paths against the local filesystem.
#[derive(Debug, Clone)]
pub struct PathValidator {
    /// Default root used for empty and `/` input.
    root: PathBuf,
}

impl PathValidator {
    /// Create a validator with the given default root.
    ///
    /// The root is typically the user's home directory; it is returned
    /// as-is for empty input and is assumed to exist.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The configured default root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate a raw path into a [`ValidatedLocalPath`].
    ///
    /// Empty and `"/"` input resolve to the default root. `~` expands to
    /// the user's home directory, relative input is resolved against the
    /// current working directory, and `.`/`..` components are folded.
    /// Fails with [`FsError::PathNotFound`] when the resolved path does
    /// not exist.
    pub fn validate(&self, raw: &str) -> Result<ValidatedLocalPath, FsError> {
        if raw.is_empty() || raw == "/" {
            return Ok(ValidatedLocalPath(self.root.clone()));
        }

        let expanded = expand_home(raw);
        let absolute = if expanded.is_absolute() {
            expanded
        } else {
            env::current_dir()
                .map_err(|e| FsError::io(&expanded, e))?
                .join(expanded)
        };
        let normalized = normalize(&absolute);

        if !normalized.exists() {
            return Err(FsError::PathNotFound(normalized));
        }
        Ok(ValidatedLocalPath(normalized))
    }
}

/// Expand a leading `~` or `~/` to the user's home directory.
fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

/// Fold `.` and `..` components lexically. `..` above the root stays at
/// the root.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
