//! Transfer orchestration: validate a request, then move the bytes.
//!
//! Validation happens entirely before the first transport call, so a bad
//! request never starts a partial transfer. Directories are rejected in
//! both directions; only single files move.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::adb::DeviceBridge;
use crate::remote::{SyncTransport, TransferError};
use protocol::{TransferDirection, TransferOutcome, TransferRequest};

/// Validates and executes transfer requests.
pub struct TransferOrchestrator<B: DeviceBridge> {
    sync: Arc<SyncTransport<B>>,
}

impl<B: DeviceBridge> TransferOrchestrator<B> {
    /// Create an orchestrator executing over the given transport.
    pub fn new(sync: Arc<SyncTransport<B>>) -> Self {
        Self { sync }
    }

    /// Run a transfer end to end.
    ///
    /// The returned outcome carries the destination path verbatim from the
    /// request; no normalization is applied to it.
    pub async fn transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferOutcome, TransferError> {
        debug!(
            source = %request.source_path,
            destination = %request.destination_path,
            direction = ?request.direction,
            "Transfer requested"
        );
        self.validate(request).await?;
        self.execute(request).await?;
        info!(
            serial = %request.device_serial,
            destination = %request.destination_path,
            "Transfer complete"
        );
        Ok(TransferOutcome::completed(&request.destination_path))
    }

    async fn validate(&self, request: &TransferRequest) -> Result<(), TransferError> {
        let serial = request.device_serial.trim();
        if serial.is_empty() {
            return Err(TransferError::MissingDeviceSerial);
        }

        match request.direction {
            TransferDirection::ToRemote => {
                let metadata = tokio::fs::metadata(&request.source_path)
                    .await
                    .map_err(|_| TransferError::SourceNotFound(request.source_path.clone()))?;
                if metadata.is_dir() {
                    return Err(TransferError::DirectoryNotSupported(
                        request.source_path.clone(),
                    ));
                }
            }
            TransferDirection::ToLocal => {
                let present = self.sync.exists(serial, &request.source_path).await?;
                if !present {
                    return Err(TransferError::SourceNotFound(request.source_path.clone()));
                }
            }
        }
        Ok(())
    }

    async fn execute(&self, request: &TransferRequest) -> Result<(), TransferError> {
        let serial = request.device_serial.trim();
        match request.direction {
            TransferDirection::ToRemote => {
                self.sync
                    .push(
                        serial,
                        Path::new(&request.source_path),
                        &request.destination_path,
                    )
                    .await
            }
            TransferDirection::ToLocal => {
                self.sync
                    .pull(
                        serial,
                        &request.source_path,
                        Path::new(&request.destination_path),
                    )
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adb::fake::{FakeBridge, FakeDevice};
    use crate::devices::DeviceRegistry;
    use std::fs;
    use tempfile::TempDir;

    fn orchestrator_for(device: FakeDevice) -> TransferOrchestrator<FakeBridge> {
        let bridge = Arc::new(FakeBridge::new().with_device(device));
        let registry = Arc::new(DeviceRegistry::new(bridge));
        TransferOrchestrator::new(Arc::new(SyncTransport::new(registry)))
    }

    fn request(
        source: &str,
        destination: &str,
        serial: &str,
        direction: TransferDirection,
    ) -> TransferRequest {
        TransferRequest {
            source_path: source.to_string(),
            destination_path: destination.to_string(),
            device_serial: serial.to_string(),
            direction,
        }
    }

    #[tokio::test]
    async fn test_missing_serial_rejected_before_anything_else() {
        let orchestrator = orchestrator_for(FakeDevice::new("abc123"));

        for direction in [TransferDirection::ToRemote, TransferDirection::ToLocal] {
            let result = orchestrator
                .transfer(&request("/tmp/a.txt", "/sdcard/a.txt", "  ", direction))
                .await;
            assert!(matches!(result, Err(TransferError::MissingDeviceSerial)));
        }
    }

    #[tokio::test]
    async fn test_directory_source_rejected_without_touching_device() {
        let temp_dir = TempDir::new().unwrap();
        let source_dir = temp_dir.path().join("album");
        fs::create_dir(&source_dir).unwrap();

        // No device registered: a transport call would surface DeviceNotFound,
        // so DirectoryNotSupported proves validation ran first.
        let orchestrator =
            TransferOrchestrator::new(Arc::new(SyncTransport::new(Arc::new(
                DeviceRegistry::new(Arc::new(FakeBridge::new())),
            ))));

        let result = orchestrator
            .transfer(&request(
                source_dir.to_str().unwrap(),
                "/sdcard/album",
                "abc123",
                TransferDirection::ToRemote,
            ))
            .await;
        assert!(matches!(result, Err(TransferError::DirectoryNotSupported(_))));
    }

    #[tokio::test]
    async fn test_missing_local_source() {
        let orchestrator = orchestrator_for(FakeDevice::new("abc123"));
        let result = orchestrator
            .transfer(&request(
                "/nonexistent/song.mp3",
                "/sdcard/song.mp3",
                "abc123",
                TransferDirection::ToRemote,
            ))
            .await;
        assert!(
            matches!(result, Err(TransferError::SourceNotFound(p)) if p == "/nonexistent/song.mp3")
        );
    }

    #[tokio::test]
    async fn test_missing_remote_source() {
        let temp_dir = TempDir::new().unwrap();
        let orchestrator = orchestrator_for(FakeDevice::new("abc123"));

        let destination = temp_dir.path().join("photo.jpg");
        let result = orchestrator
            .transfer(&request(
                "/sdcard/nope.jpg",
                destination.to_str().unwrap(),
                "abc123",
                TransferDirection::ToLocal,
            ))
            .await;
        assert!(matches!(result, Err(TransferError::SourceNotFound(p)) if p == "/sdcard/nope.jpg"));
    }

    #[tokio::test]
    async fn test_push_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("song.mp3");
        fs::write(&source, b"ID3 data").unwrap();

        let device = FakeDevice::new("abc123");
        let orchestrator = orchestrator_for(device.clone());

        let outcome = orchestrator
            .transfer(&request(
                source.to_str().unwrap(),
                "/sdcard/Music/song.mp3",
                "abc123",
                TransferDirection::ToRemote,
            ))
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.destination_path, "/sdcard/Music/song.mp3");
        assert_eq!(
            device.remote_file("/sdcard/Music/song.mp3").unwrap(),
            b"ID3 data"
        );
    }

    #[tokio::test]
    async fn test_pull_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let device = FakeDevice::new("abc123").with_remote_file("/sdcard/photo.jpg", b"JPEG");
        let orchestrator = orchestrator_for(device);

        let destination = temp_dir.path().join("pulled/photo.jpg");
        let outcome = orchestrator
            .transfer(&request(
                "/sdcard/photo.jpg",
                destination.to_str().unwrap(),
                "abc123",
                TransferDirection::ToLocal,
            ))
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(fs::read(&destination).unwrap(), b"JPEG");
    }

    #[tokio::test]
    async fn test_destination_path_returned_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.txt");
        fs::write(&source, b"x").unwrap();

        let orchestrator = orchestrator_for(FakeDevice::new("abc123"));
        let outcome = orchestrator
            .transfer(&request(
                source.to_str().unwrap(),
                "/sdcard/../sdcard//a.txt",
                "abc123",
                TransferDirection::ToRemote,
            ))
            .await
            .unwrap();
        assert_eq!(outcome.destination_path, "/sdcard/../sdcard//a.txt");
    }
}
