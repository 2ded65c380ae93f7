//! Device enumeration and resolution.
//!
//! The registry is an ephemeral read of the bridge transport: every call
//! re-enumerates, nothing is cached, and degraded data beats missing
//! devices. A device whose properties cannot be read still appears, with
//! `"Unknown"` placeholders; an enumeration failure of the whole set yields
//! an empty list rather than an error.

use std::sync::Arc;

use protocol::{DeviceDescriptor, DeviceState};
use tracing::{debug, warn};

use crate::adb::{BridgeError, DeviceBridge, DeviceHandle};

/// Property key for the marketing model name.
pub const PROP_MODEL: &str = "ro.product.model";
/// Property key for the vendor name.
pub const PROP_MANUFACTURER: &str = "ro.product.manufacturer";
/// Property key for the Android release string.
pub const PROP_ANDROID_VERSION: &str = "ro.build.version.release";

/// Placeholder for properties that could not be read.
pub const UNKNOWN: &str = "Unknown";

/// Enumerates reachable devices and resolves serials to handles.
pub struct DeviceRegistry<B: DeviceBridge> {
    bridge: Arc<B>,
}

impl<B: DeviceBridge> DeviceRegistry<B> {
    /// Create a registry over the given bridge transport.
    pub fn new(bridge: Arc<B>) -> Self {
        Self { bridge }
    }

    /// Snapshot of all currently reachable devices.
    ///
    /// Never fails: a whole-set enumeration failure is logged and yields an
    /// empty snapshot, and per-device property failures degrade to
    /// [`UNKNOWN`] placeholder fields.
    pub async fn enumerate(&self) -> Vec<DeviceDescriptor> {
        let devices = match self.bridge.devices().await {
            Ok(devices) => devices,
            Err(e) => {
                warn!(error = %e, "Device enumeration failed");
                return Vec::new();
            }
        };

        let mut descriptors = Vec::with_capacity(devices.len());
        for device in &devices {
            descriptors.push(self.describe(device).await);
        }
        debug!(count = descriptors.len(), "Enumerated devices");
        descriptors
    }

    /// Describe a single device by serial.
    pub async fn info(&self, serial: &str) -> Result<DeviceDescriptor, BridgeError> {
        let device = self.resolve(serial).await?;
        Ok(self.describe(&device).await)
    }

    /// Resolve a serial to a device handle.
    ///
    /// Any underlying failure is reported as [`BridgeError::DeviceNotFound`]
    /// for the serial; the cause is logged.
    pub async fn resolve(&self, serial: &str) -> Result<B::Device, BridgeError> {
        match self.bridge.device(serial).await {
            Ok(device) => Ok(device),
            Err(e @ BridgeError::DeviceNotFound(_)) => Err(e),
            Err(e) => {
                warn!(serial = %serial, error = %e, "Device resolution failed");
                Err(BridgeError::DeviceNotFound(serial.to_string()))
            }
        }
    }

    async fn describe(&self, device: &B::Device) -> DeviceDescriptor {
        DeviceDescriptor {
            serial: device.serial().to_string(),
            model: prop_or_unknown(device, PROP_MODEL).await,
            manufacturer: prop_or_unknown(device, PROP_MANUFACTURER).await,
            android_version: prop_or_unknown(device, PROP_ANDROID_VERSION).await,
            state: DeviceState::Device,
        }
    }
}

async fn prop_or_unknown<D: DeviceHandle>(device: &D, key: &str) -> String {
    device
        .prop(key)
        .await
        .unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adb::fake::{FakeBridge, FakeDevice};

    fn pixel(serial: &str) -> FakeDevice {
        FakeDevice::new(serial)
            .with_prop(PROP_MODEL, "Pixel 7")
            .with_prop(PROP_MANUFACTURER, "Google")
            .with_prop(PROP_ANDROID_VERSION, "14")
    }

    #[tokio::test]
    async fn test_enumerate_reads_properties() {
        let bridge = Arc::new(FakeBridge::new().with_device(pixel("abc123")));
        let registry = DeviceRegistry::new(bridge);

        let devices = registry.enumerate().await;
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].serial, "abc123");
        assert_eq!(devices[0].model, "Pixel 7");
        assert_eq!(devices[0].manufacturer, "Google");
        assert_eq!(devices[0].android_version, "14");
        assert_eq!(devices[0].state, DeviceState::Device);
    }

    #[tokio::test]
    async fn test_enumerate_degrades_to_unknown() {
        let bridge = Arc::new(
            FakeBridge::new()
                .with_device(pixel("good"))
                .with_device(FakeDevice::new("bad").without_props()),
        );
        let registry = DeviceRegistry::new(bridge);

        let devices = registry.enumerate().await;
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].model, "Pixel 7");
        assert_eq!(devices[1].serial, "bad");
        assert_eq!(devices[1].model, UNKNOWN);
        assert_eq!(devices[1].manufacturer, UNKNOWN);
        assert_eq!(devices[1].android_version, UNKNOWN);
    }

    #[tokio::test]
    async fn test_enumerate_failure_yields_empty() {
        let registry = DeviceRegistry::new(Arc::new(FakeBridge::failing()));
        assert!(registry.enumerate().await.is_empty());
    }

    #[tokio::test]
    async fn test_info_describes_one_device() {
        let bridge = Arc::new(FakeBridge::new().with_device(pixel("abc123")));
        let registry = DeviceRegistry::new(bridge);

        let info = registry.info("abc123").await.unwrap();
        assert_eq!(info.serial, "abc123");
        assert_eq!(info.model, "Pixel 7");
    }

    #[tokio::test]
    async fn test_info_unknown_serial() {
        let registry = DeviceRegistry::new(Arc::new(FakeBridge::new()));
        let result = registry.info("missing").await;
        assert!(matches!(result, Err(BridgeError::DeviceNotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_known_serial() {
        let bridge = Arc::new(FakeBridge::new().with_device(pixel("abc123")));
        let registry = DeviceRegistry::new(bridge);

        let device = registry.resolve("abc123").await.unwrap();
        assert_eq!(device.serial(), "abc123");
    }

    #[tokio::test]
    async fn test_resolve_unknown_serial() {
        let bridge = Arc::new(FakeBridge::new().with_device(pixel("abc123")));
        let registry = DeviceRegistry::new(bridge);

        let result = registry.resolve("missing").await;
        assert!(matches!(result, Err(BridgeError::DeviceNotFound(s)) if s == "missing"));
    }

    #[tokio::test]
    async fn test_resolve_masks_other_failures_as_not_found() {
        let registry = DeviceRegistry::new(Arc::new(FakeBridge::failing()));
        let result = registry.resolve("abc123").await;
        assert!(matches!(result, Err(BridgeError::DeviceNotFound(s)) if s == "abc123"));
    }
}
