//! Wire message definitions for DroidBridge.
//!
//! This module defines the data shapes shared between the service core and
//! its clients: device snapshots, directory listings, transfer requests and
//! the presence broadcast message. All types serialize to JSON; the field
//! names are part of the wire contract and must not change.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Snapshot of a single reachable device.
///
/// Produced fresh on every enumeration poll; never cached or persisted.
/// Identifying properties that cannot be read degrade to `"Unknown"` rather
/// than dropping the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Stable unique identifier of the physical device.
    pub serial: String,
    /// Marketing model name (`ro.product.model`).
    pub model: String,
    /// Vendor name (`ro.product.manufacturer`).
    pub manufacturer: String,
    /// Android release string (`ro.build.version.release`).
    pub android_version: String,
    /// Connection state; only reachable devices are reported.
    pub state: DeviceState,
}

/// Connection state of an enumerated device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceState {
    /// Connected and ready for shell and sync commands.
    Device,
}

/// A single file or directory entry in a listing.
///
/// `modified` is only populated for local listings, `permissions` only for
/// remote ones; both are omitted from the wire when absent. `kind`
/// serializes under the legacy field name `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Entry name (not full path).
    pub name: String,
    /// Full path of the entry within its filesystem.
    pub path: String,
    /// Whether the entry is a directory.
    pub is_directory: bool,
    /// Size in bytes (always 0 for directories).
    pub size: u64,
    /// Last modified time, Unix epoch seconds (local listings only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<u64>,
    /// Raw mode string such as `drwxr-xr-x` (remote listings only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
    /// Entry kind, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

/// Kind of a listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file (or anything that is not a directory).
    File,
    /// Directory.
    Directory,
}

impl FileEntry {
    /// Create an entry, deriving `kind` from `is_directory` and forcing the
    /// size of directories to zero.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        is_directory: bool,
        size: u64,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_directory,
            size: if is_directory { 0 } else { size },
            modified: None,
            permissions: None,
            kind: if is_directory {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
        }
    }

    /// Attach a last-modified timestamp (local listings).
    pub fn with_modified(mut self, modified: u64) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Attach a raw permission string (remote listings).
    pub fn with_permissions(mut self, permissions: impl Into<String>) -> Self {
        self.permissions = Some(permissions.into());
        self
    }

    /// Ordering shared by every listing: directories before files, then
    /// case-insensitive ascending by name.
    pub fn listing_order(a: &FileEntry, b: &FileEntry) -> Ordering {
        match (a.is_directory, b.is_directory) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}

/// Normalized directory-listing envelope shared by both filesystem kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryListing {
    /// The path that was listed.
    pub current_path: String,
    /// Parent of `current_path`; the root is its own parent.
    pub parent_path: String,
    /// Entries in listing order.
    pub files: Vec<FileEntry>,
}

impl DirectoryListing {
    /// Create a listing, sorting the entries into listing order.
    pub fn new(
        current_path: impl Into<String>,
        parent_path: impl Into<String>,
        mut files: Vec<FileEntry>,
    ) -> Self {
        files.sort_by(FileEntry::listing_order);
        Self {
            current_path: current_path.into(),
            parent_path: parent_path.into(),
            files,
        }
    }
}

/// A single-file transfer request, consumed by one orchestration call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Path of the file to transfer, on the side named by `direction`.
    pub source_path: String,
    /// Destination path on the opposite side.
    pub destination_path: String,
    /// Serial of the device involved in the transfer.
    pub device_serial: String,
    /// Which way the bytes flow.
    pub direction: TransferDirection,
}

/// Direction of a transfer relative to the local machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferDirection {
    /// Local source pushed to the device.
    ToRemote,
    /// Remote source pulled to the local machine.
    ToLocal,
}

/// Result of a completed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutcome {
    /// Whether the transfer completed. Failures are reported as errors, so
    /// any outcome a caller receives has this set.
    pub success: bool,
    /// The destination path exactly as requested.
    pub destination_path: String,
}

impl TransferOutcome {
    /// Outcome for a completed transfer to `destination_path`.
    pub fn completed(destination_path: impl Into<String>) -> Self {
        Self {
            success: true,
            destination_path: destination_path.into(),
        }
    }
}

/// Message pushed to presence subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresenceUpdate {
    /// The full current device set.
    DeviceList {
        /// Devices reachable at poll time.
        devices: Vec<DeviceDescriptor>,
    },
}

impl PresenceUpdate {
    /// Wrap a device snapshot in the broadcast message shape.
    pub fn device_list(devices: Vec<DeviceDescriptor>) -> Self {
        PresenceUpdate::DeviceList { devices }
    }
}
