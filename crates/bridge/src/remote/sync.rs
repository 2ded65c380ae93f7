//! Byte transfers and existence probes over the sync channel.
//!
//! No partial-transfer recovery exists at this level: a mid-stream failure
//! leaves whatever bytes were written and surfaces the transport error;
//! retrying is the caller's decision.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use super::quote_arg;
use crate::adb::{BridgeError, DeviceBridge, DeviceHandle};
use crate::devices::DeviceRegistry;

/// Marker echoed by the existence probe when the path exists.
const EXISTS_MARKER: &str = "exists";
/// Marker echoed when it does not.
const MISSING_MARKER: &str = "not_exists";

/// Errors from transfers, at the validation or the transport level.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The request carried no device serial.
    #[error("device serial is required")]
    MissingDeviceSerial,

    /// The transfer source does not exist on its side.
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// The source is a directory; only single files transfer.
    #[error("directory transfers are not supported: {0}")]
    DirectoryNotSupported(String),

    /// The serial did not resolve to a reachable device.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// The local destination could not be prepared.
    #[error("could not prepare local destination {path}: {source}")]
    LocalIo {
        /// The local path involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The transport failed mid-operation.
    #[error("{operation} failed on {serial}: {source}")]
    Transport {
        /// Which operation failed.
        operation: &'static str,
        /// Serial of the device involved.
        serial: String,
        /// The transport's native error.
        #[source]
        source: BridgeError,
    },
}

impl TransferError {
    fn transport(operation: &'static str, serial: &str, source: BridgeError) -> Self {
        TransferError::Transport {
            operation,
            serial: serial.to_string(),
            source,
        }
    }
}

/// Moves file bytes between the local machine and a device.
pub struct SyncTransport<B: DeviceBridge> {
    registry: Arc<DeviceRegistry<B>>,
}

impl<B: DeviceBridge> SyncTransport<B> {
    /// Create a transport resolving devices through the given registry.
    pub fn new(registry: Arc<DeviceRegistry<B>>) -> Self {
        Self { registry }
    }

    /// Pull a remote file to a local path.
    ///
    /// The local parent directory is created first.
    pub async fn pull(
        &self,
        serial: &str,
        remote_path: &str,
        local_path: &Path,
    ) -> Result<(), TransferError> {
        let device = self.resolve(serial).await?;

        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TransferError::LocalIo {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        device
            .sync_pull(remote_path, local_path)
            .await
            .map_err(|e| TransferError::transport("pull", serial, e))?;
        info!(serial = %serial, remote = %remote_path, local = %local_path.display(), "Pulled file");
        Ok(())
    }

    /// Push a local file to a remote path.
    pub async fn push(
        &self,
        serial: &str,
        local_path: &Path,
        remote_path: &str,
    ) -> Result<(), TransferError> {
        let device = self.resolve(serial).await?;
        device
            .sync_push(local_path, remote_path)
            .await
            .map_err(|e| TransferError::transport("push", serial, e))?;
        info!(serial = %serial, local = %local_path.display(), remote = %remote_path, "Pushed file");
        Ok(())
    }

    /// Whether a remote path exists.
    ///
    /// An unresolvable device yields `false`, not an error. The probe
    /// compares the trimmed stdout against the exact marker, so the
    /// negative response cannot be mistaken for a positive one.
    pub async fn exists(&self, serial: &str, path: &str) -> Result<bool, TransferError> {
        let device = match self.registry.resolve(serial).await {
            Ok(device) => device,
            Err(_) => {
                debug!(serial = %serial, "Existence probe for unresolvable device");
                return Ok(false);
            }
        };

        let command = format!(
            "test -e {} && echo {} || echo {}",
            quote_arg(path),
            EXISTS_MARKER,
            MISSING_MARKER
        );
        let output = device
            .shell(&command)
            .await
            .map_err(|e| TransferError::transport("existence probe", serial, e))?;
        Ok(output.trim() == EXISTS_MARKER)
    }

    async fn resolve(&self, serial: &str) -> Result<B::Device, TransferError> {
        self.registry
            .resolve(serial)
            .await
            .map_err(|_| TransferError::DeviceNotFound(serial.to_string()))
    }
}
