//! Stable error kinds exposed at the service boundary.

use serde::{Deserialize, Serialize};

/// Closed set of error kinds the boundary layer translates into
/// transport-appropriate statuses and messages.
///
/// Every failure the service core reports maps to exactly one kind; the set
/// is versioned with the wire format and additions are backwards-compatible,
/// removals are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A local path failed validation because it does not exist.
    PathNotFound,
    /// A file read was attempted on a directory.
    IsADirectory,
    /// No reachable device matches the requested serial.
    DeviceNotFound,
    /// A transfer request arrived without a device serial.
    MissingDeviceSerial,
    /// The transfer source does not exist on its side.
    SourceNotFound,
    /// The transfer source is a directory; only single files transfer.
    DirectoryNotSupported,
    /// A remote directory listing could not be produced.
    RemoteListing,
    /// A push or pull failed at the transport level.
    Transfer,
    /// A local disk operation failed.
    Io,
}

impl ErrorKind {
    /// Wire-stable snake_case name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::PathNotFound => "path_not_found",
            ErrorKind::IsADirectory => "is_a_directory",
            ErrorKind::DeviceNotFound => "device_not_found",
            ErrorKind::MissingDeviceSerial => "missing_device_serial",
            ErrorKind::SourceNotFound => "source_not_found",
            ErrorKind::DirectoryNotSupported => "directory_not_supported",
            ErrorKind::RemoteListing => "remote_listing",
            ErrorKind::Transfer => "transfer",
            ErrorKind::Io => "io",
        }
    }
}
