//! Remote directory listing via shell output parsing.
//!
//! The shell channel offers no structured listing protocol, so the lister
//! runs `ls -la` and parses the human-oriented table heuristically. Column
//! positions are named constants so a format drift is a one-place fix; an
//! unparseable line is skipped, never fatal. Filenames containing the
//! literal date/size pattern and unusual listing locales will mis-parse;
//! that is an accepted limit of the format.

use std::sync::Arc;

use protocol::FileEntry;
use thiserror::Error;
use tracing::debug;

use super::quote_arg;
use crate::adb::{BridgeError, DeviceBridge, DeviceHandle};
use crate::devices::DeviceRegistry;

/// Token index of the permission string.
const PERMISSIONS_FIELD: usize = 0;
/// Token index of the size field.
const SIZE_FIELD: usize = 4;
/// Token index the name starts at, after the 3-token date.
const NAME_FIELD: usize = 8;

/// Prefix of the summary line `ls` emits before the entries.
const TOTAL_PREFIX: &str = "total";

/// Errors from remote directory listing.
#[derive(Debug, Error)]
pub enum ListError {
    /// The serial did not resolve to a reachable device.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// The listing command failed on the device.
    #[error("remote listing of {path} failed on {serial}: {source}")]
    Listing {
        /// Serial of the device.
        serial: String,
        /// Path whose listing failed.
        path: String,
        /// The underlying transport error.
        #[source]
        source: BridgeError,
    },
}

/// Lists remote directories by parsing long-listing shell output.
pub struct ShellLister<B: DeviceBridge> {
    registry: Arc<DeviceRegistry<B>>,
}

impl<B: DeviceBridge> ShellLister<B> {
    /// Create a lister resolving devices through the given registry.
    pub fn new(registry: Arc<DeviceRegistry<B>>) -> Self {
        Self { registry }
    }

    /// List the direct children of a remote directory, in listing order.
    ///
    /// Fails with [`ListError::DeviceNotFound`] before issuing any command
    /// when the serial cannot be resolved; shell failures surface as
    /// [`ListError::Listing`].
    pub async fn list(&self, serial: &str, path: &str) -> Result<Vec<FileEntry>, ListError> {
        let device = self
            .registry
            .resolve(serial)
            .await
            .map_err(|_| ListError::DeviceNotFound(serial.to_string()))?;

        let command = format!("ls -la {}", quote_arg(path));
        let output = device
            .shell(&command)
            .await
            .map_err(|e| ListError::Listing {
                serial: serial.to_string(),
                path: path.to_string(),
                source: e,
            })?;

        let mut entries = parse_listing(path, &output);
        entries.sort_by(FileEntry::listing_order);
        debug!(serial = %serial, path = %path, count = entries.len(), "Listed remote directory");
        Ok(entries)
    }
}

/// Parse a whole listing; lines that do not parse are dropped.
fn parse_listing(base: &str, output: &str) -> Vec<FileEntry> {
    output
        .lines()
        .filter_map(|line| parse_line(base, line))
        .collect()
}

/// Parse one listing line into an entry.
///
/// Expects `permissions links owner group size month day time name...`;
/// the name may contain spaces and is rejoined from its tokens. Returns
/// `None` for blank lines, the summary line, `.`/`..` and anything with
/// too few tokens. Directory-ness comes from the `d` prefix of the
/// permission string; a non-numeric size token (fields shift for device
/// files) degrades to zero.
fn parse_line(base: &str, line: &str) -> Option<FileEntry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(TOTAL_PREFIX) {
        return None;
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() <= NAME_FIELD {
        return None;
    }

    let name = fields[NAME_FIELD..].join(" ");
    if name == "." || name == ".." {
        return None;
    }

    let permissions = fields[PERMISSIONS_FIELD];
    let is_directory = permissions.starts_with('d');
    let size = if is_directory {
        0
    } else {
        fields[SIZE_FIELD].parse::<u64>().unwrap_or(0)
    };

    Some(
        FileEntry::new(name.clone(), join_remote(base, &name), is_directory, size)
            .with_permissions(permissions),
    )
}

/// Join a remote base path and an entry name with `/`.
fn join_remote(base: &str, name: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, name)
    } else {
        format!("{}/{}", base, name)
    }
}
