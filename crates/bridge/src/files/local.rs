//! Local filesystem adapter.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use protocol::FileEntry;
use tokio::fs;
use tracing::warn;

use super::validate::{FsError, ValidatedLocalPath};

/// Marker for hidden entries in local listings.
pub const HIDDEN_PREFIX: char = '.';

/// Lists, reads and writes the local filesystem.
///
/// Listing and reading accept only [`ValidatedLocalPath`]s; writing takes a
/// path derived from a validated directory (see
/// [`ValidatedLocalPath::join_name`]) because the target itself may not
/// exist yet. All I/O goes through `tokio::fs` so large files land on the
/// blocking pool instead of stalling the runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Create the adapter.
    pub fn new() -> Self {
        Self
    }

    /// List the direct children of a directory, in listing order.
    ///
    /// Hidden entries are skipped. Entries whose metadata cannot be read
    /// (permission errors, broken symlinks) are logged and skipped; the
    /// listing continues.
    pub async fn list(&self, dir: &ValidatedLocalPath) -> Result<Vec<FileEntry>, FsError> {
        let mut read_dir = fs::read_dir(dir.as_path())
            .await
            .map_err(|e| FsError::io(dir.as_path(), e))?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| FsError::io(dir.as_path(), e))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with(HIDDEN_PREFIX) {
                continue;
            }

            let path = entry.path();
            // Stat follows symlinks; a broken link counts as unreadable.
            let metadata = match fs::metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            let mut file_entry = FileEntry::new(
                name,
                path.to_string_lossy(),
                metadata.is_dir(),
                metadata.len(),
            );
            if let Some(modified) = unix_seconds(metadata.modified().ok()) {
                file_entry = file_entry.with_modified(modified);
            }
            entries.push(file_entry);
        }

        entries.sort_by(FileEntry::listing_order);
        Ok(entries)
    }

    /// Read a file's contents.
    ///
    /// Fails with [`FsError::IsADirectory`] when the path is a directory.
    pub async fn read(&self, path: &ValidatedLocalPath) -> Result<Vec<u8>, FsError> {
        let metadata = fs::metadata(path.as_path())
            .await
            .map_err(|e| FsError::io(path.as_path(), e))?;
        if metadata.is_dir() {
            return Err(FsError::IsADirectory(path.as_path().to_path_buf()));
        }
        fs::read(path.as_path())
            .await
            .map_err(|e| FsError::io(path.as_path(), e))
    }

    /// Write contents to a path, creating intermediate directories as
    /// needed and overwriting any existing file.
    pub async fn write(&self, path: &Path, contents: &[u8]) -> Result<(), FsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FsError::io(parent, e))?;
        }
        fs::write(path, contents)
            .await
            .map_err(|e| FsError::io(path, e))
    }
}

fn unix_seconds(time: Option<SystemTime>) -> Option<u64> {
    time.and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
}
