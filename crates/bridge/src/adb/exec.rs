//! `adb`-backed device bridge.
//!
//! Talks to devices by spawning the host `adb` binary. Output parsing is
//! limited to the `adb devices` state table; shell stdout passes through
//! untouched for higher layers to interpret.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{BridgeError, DeviceBridge, DeviceHandle};

/// Device state `adb devices` reports for a usable device.
const STATE_READY: &str = "device";

/// Device bridge backed by the `adb` command-line tool.
#[derive(Debug, Clone)]
pub struct ExecBridge {
    adb: PathBuf,
}

impl ExecBridge {
    /// Use the given `adb` binary.
    pub fn new(adb: impl Into<PathBuf>) -> Self {
        Self { adb: adb.into() }
    }

    /// Locate `adb` on the PATH.
    pub fn discover() -> Result<Self, BridgeError> {
        let adb = which::which("adb").map_err(|e| BridgeError::BinaryNotFound(e.to_string()))?;
        Ok(Self::new(adb))
    }

    /// Path of the binary in use.
    pub fn binary(&self) -> &Path {
        &self.adb
    }
}

#[async_trait]
impl DeviceBridge for ExecBridge {
    type Device = ExecDevice;

    async fn devices(&self) -> Result<Vec<ExecDevice>, BridgeError> {
        let output = run_adb(&self.adb, &["devices"]).await?;
        Ok(parse_devices_output(&output)
            .into_iter()
            .map(|serial| ExecDevice {
                adb: self.adb.clone(),
                serial,
            })
            .collect())
    }

    async fn device(&self, serial: &str) -> Result<ExecDevice, BridgeError> {
        let output = run_adb(&self.adb, &["devices"]).await?;
        if parse_devices_output(&output).iter().any(|s| s == serial) {
            Ok(ExecDevice {
                adb: self.adb.clone(),
                serial: serial.to_string(),
            })
        } else {
            Err(BridgeError::DeviceNotFound(serial.to_string()))
        }
    }
}

/// Handle to a single device, addressed through `adb -s <serial>`.
#[derive(Debug, Clone)]
pub struct ExecDevice {
    adb: PathBuf,
    serial: String,
}

#[async_trait]
impl DeviceHandle for ExecDevice {
    fn serial(&self) -> &str {
        &self.serial
    }

    async fn prop(&self, key: &str) -> Option<String> {
        let args = ["-s", self.serial.as_str(), "shell", "getprop", key];
        let output = run_adb(&self.adb, &args).await.ok()?;
        let value = output.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    async fn shell(&self, command: &str) -> Result<String, BridgeError> {
        run_adb(&self.adb, &["-s", self.serial.as_str(), "shell", command]).await
    }

    async fn sync_pull(&self, remote_path: &str, local_path: &Path) -> Result<(), BridgeError> {
        let local = local_path.to_string_lossy();
        let args = ["-s", self.serial.as_str(), "pull", remote_path, local.as_ref()];
        run_adb(&self.adb, &args).await?;
        Ok(())
    }

    async fn sync_push(&self, local_path: &Path, remote_path: &str) -> Result<(), BridgeError> {
        let local = local_path.to_string_lossy();
        let args = ["-s", self.serial.as_str(), "push", local.as_ref(), remote_path];
        run_adb(&self.adb, &args).await?;
        Ok(())
    }
}

/// Run the binary with the given arguments, returning stdout on success.
async fn run_adb(adb: &Path, args: &[&str]) -> Result<String, BridgeError> {
    debug!(binary = %adb.display(), ?args, "Running bridge command");
    let output = Command::new(adb).args(args).output().await?;
    if !output.status.success() {
        return Err(BridgeError::CommandFailed {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Extract serials in ready state from `adb devices` output.
///
/// The table may be preceded by server startup notices (`* daemon ...`)
/// and always carries a header line; each device line is
/// `<serial>\t<state>`. Offline and unauthorized devices are skipped.
fn parse_devices_output(output: &str) -> Vec<String> {
    let mut serials = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('*') || line.starts_with("List of devices") {
            continue;
        }
        let mut fields = line.split_whitespace();
        if let (Some(serial), Some(state)) = (fields.next(), fields.next()) {
            if state == STATE_READY {
                serials.push(serial.to_string());
            }
        }
    }
    serials
}
