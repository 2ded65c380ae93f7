//! The service facade.
//!
//! [`BridgeService`] wires the validator, the local adapter, the device
//! registry, the remote lister, the transfer orchestrator and the presence
//! broadcaster together, and is the surface clients call. Every error is
//! reduced to a [`ServiceError`] carrying a wire-level [`ErrorKind`].

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::adb::DeviceBridge;
use crate::config::Config;
use crate::devices::DeviceRegistry;
use crate::files::{FsError, LocalFs, PathValidator};
use crate::presence::{PresenceBroadcaster, PresenceListener, PresenceSubscription};
use crate::remote::{ListError, ShellLister, SyncTransport, TransferError};
use crate::transfer::TransferOrchestrator;
use protocol::{DeviceDescriptor, DirectoryListing, ErrorKind, TransferOutcome, TransferRequest};

/// Errors surfaced by the service facade.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Fs(#[from] FsError),

    #[error(transparent)]
    List(#[from] ListError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("device not found: {0}")]
    DeviceNotFound(String),
}

impl ServiceError {
    /// The wire-level kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Fs(e) => match e {
                FsError::PathNotFound(_) => ErrorKind::PathNotFound,
                FsError::IsADirectory(_) => ErrorKind::IsADirectory,
                FsError::NotADirectory(_) | FsError::InvalidFileName(_) | FsError::Io { .. } => {
                    ErrorKind::Io
                }
            },
            ServiceError::List(e) => match e {
                ListError::DeviceNotFound(_) => ErrorKind::DeviceNotFound,
                ListError::Listing { .. } => ErrorKind::RemoteListing,
            },
            ServiceError::Transfer(e) => match e {
                TransferError::MissingDeviceSerial => ErrorKind::MissingDeviceSerial,
                TransferError::SourceNotFound(_) => ErrorKind::SourceNotFound,
                TransferError::DirectoryNotSupported(_) => ErrorKind::DirectoryNotSupported,
                TransferError::DeviceNotFound(_) => ErrorKind::DeviceNotFound,
                TransferError::LocalIo { .. } => ErrorKind::Io,
                TransferError::Transport { .. } => ErrorKind::Transfer,
            },
            ServiceError::DeviceNotFound(_) => ErrorKind::DeviceNotFound,
        }
    }
}

/// Facade over the whole bridge.
pub struct BridgeService<B: DeviceBridge> {
    config: Config,
    validator: PathValidator,
    local_fs: LocalFs,
    registry: Arc<DeviceRegistry<B>>,
    lister: ShellLister<B>,
    orchestrator: TransferOrchestrator<B>,
    broadcaster: Arc<PresenceBroadcaster<B>>,
}

impl<B: DeviceBridge> BridgeService<B> {
    /// Assemble a service from a configuration and a device bridge.
    pub fn new(config: Config, bridge: Arc<B>) -> Self {
        let registry = Arc::new(DeviceRegistry::new(bridge));
        let sync = Arc::new(SyncTransport::new(Arc::clone(&registry)));
        let broadcaster = Arc::new(PresenceBroadcaster::new(
            Arc::clone(&registry),
            config.presence.poll_interval(),
        ));
        info!(
            local_root = %config.local.root.display(),
            remote_root = %config.remote.default_root,
            "Bridge service initialized"
        );
        Self {
            validator: PathValidator::new(config.local.root.clone()),
            local_fs: LocalFs,
            lister: ShellLister::new(Arc::clone(&registry)),
            orchestrator: TransferOrchestrator::new(sync),
            registry,
            broadcaster,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Browse a local directory.
    ///
    /// `None` or an empty path browses the configured local root. The
    /// listing's parent is the directory's real parent, so navigation can
    /// climb above the configured root.
    pub async fn list_local(&self, path: Option<&str>) -> Result<DirectoryListing, ServiceError> {
        let dir = self.validator.validate(path.unwrap_or(""))?;
        let files = self.local_fs.list(&dir).await?;
        let parent = dir.parent_or_self();
        Ok(DirectoryListing::new(
            dir.to_string(),
            parent.to_string(),
            files,
        ))
    }

    /// Browse a directory on a device.
    ///
    /// `None` or an empty path browses the configured remote root.
    pub async fn list_remote(
        &self,
        serial: &str,
        path: Option<&str>,
    ) -> Result<DirectoryListing, ServiceError> {
        let path = match path {
            Some(p) if !p.is_empty() => p,
            _ => self.config.remote.default_root.as_str(),
        };
        let files = self.lister.list(serial, path).await?;
        Ok(DirectoryListing::new(path, remote_parent(path), files))
    }

    /// Read a local file's bytes.
    pub async fn read_local(&self, path: &str) -> Result<Vec<u8>, ServiceError> {
        let file = self.validator.validate(path)?;
        Ok(self.local_fs.read(&file).await?)
    }

    /// Write bytes to a named file inside a local directory.
    ///
    /// Returns the path written. Intermediate directories are created and
    /// an existing file is overwritten.
    pub async fn write_local(
        &self,
        dir: &str,
        name: &str,
        contents: &[u8],
    ) -> Result<String, ServiceError> {
        let dir = self.validator.validate(dir)?;
        if !dir.as_path().is_dir() {
            return Err(FsError::NotADirectory(dir.as_path().to_path_buf()).into());
        }
        let target = dir.join_name(name)?;
        self.local_fs.write(&target, contents).await?;
        Ok(target.display().to_string())
    }

    /// Run a transfer end to end.
    pub async fn transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferOutcome, ServiceError> {
        Ok(self.orchestrator.transfer(request).await?)
    }

    /// Snapshot of currently reachable devices.
    pub async fn current_devices(&self) -> Vec<DeviceDescriptor> {
        self.registry.enumerate().await
    }

    /// Describe one device by serial.
    pub async fn device_info(&self, serial: &str) -> Result<DeviceDescriptor, ServiceError> {
        self.registry
            .info(serial)
            .await
            .map_err(|_| ServiceError::DeviceNotFound(serial.to_string()))
    }

    /// Attach a presence listener.
    ///
    /// The listener receives a device list immediately, then one per poll
    /// interval until the subscription is dropped.
    pub fn subscribe<L: PresenceListener>(&self, listener: L) -> PresenceSubscription {
        self.broadcaster.attach(listener)
    }
}

/// Parent of a POSIX-style remote path. The root is its own parent.
fn remote_parent(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    match trimmed.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => trimmed[..idx].to_string(),
    }
}
