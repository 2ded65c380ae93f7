//! Device bridge transport.
//!
//! The service core reaches devices through the narrow [`DeviceBridge`] /
//! [`DeviceHandle`] seam: enumeration and resolution on the bridge; shell
//! commands, property reads and byte-sync transfers on the handle. The
//! production implementation ([`ExecBridge`]) shells out to the host `adb`
//! binary; the test suite substitutes in-memory fakes.

pub mod exec;
#[cfg(test)]
pub mod fake;

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

pub use exec::{ExecBridge, ExecDevice};

/// Errors from the device bridge transport.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No reachable device matches the serial.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// The bridge executable could not be located.
    #[error("bridge binary not found: {0}")]
    BinaryNotFound(String),

    /// A bridge command exited unsuccessfully.
    #[error("bridge command failed ({command}): {stderr}")]
    CommandFailed {
        /// The command that failed, without the binary path.
        command: String,
        /// Trimmed stderr of the failed command.
        stderr: String,
    },

    /// The bridge process could not be spawned or awaited.
    #[error("failed to run bridge command: {0}")]
    Io(#[from] std::io::Error),
}

/// Enumerates and resolves reachable devices.
#[async_trait]
pub trait DeviceBridge: Send + Sync + 'static {
    /// Handle type for a single device.
    type Device: DeviceHandle + 'static;

    /// All currently reachable devices.
    async fn devices(&self) -> Result<Vec<Self::Device>, BridgeError>;

    /// Resolve a serial to a device handle.
    async fn device(&self, serial: &str) -> Result<Self::Device, BridgeError>;
}

/// Shell, property and sync operations against one device.
#[async_trait]
pub trait DeviceHandle: Send + Sync {
    /// The device's serial.
    fn serial(&self) -> &str;

    /// Read a system property; absent or unreadable properties yield
    /// `None` and callers apply their own defaults.
    async fn prop(&self, key: &str) -> Option<String>;

    /// Run a shell command on the device and return its stdout.
    async fn shell(&self, command: &str) -> Result<String, BridgeError>;

    /// Stream a remote file to a local path over the sync channel.
    async fn sync_pull(&self, remote_path: &str, local_path: &Path) -> Result<(), BridgeError>;

    /// Stream a local file to a remote path over the sync channel.
    async fn sync_push(&self, local_path: &Path, remote_path: &str) -> Result<(), BridgeError>;
}
