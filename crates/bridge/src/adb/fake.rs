//! In-memory device bridge used by unit tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{BridgeError, DeviceBridge, DeviceHandle};

/// Test double for [`DeviceBridge`] holding scripted devices.
#[derive(Default, Clone)]
pub struct FakeBridge {
    devices: Vec<FakeDevice>,
    fail_transport: bool,
}

impl FakeBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, device: FakeDevice) -> Self {
        self.devices.push(device);
        self
    }

    /// A bridge whose enumeration and resolution calls fail outright.
    pub fn failing() -> Self {
        Self {
            devices: Vec::new(),
            fail_transport: true,
        }
    }

    fn transport_error(command: &str) -> BridgeError {
        BridgeError::CommandFailed {
            command: command.to_string(),
            stderr: "cannot connect to daemon".to_string(),
        }
    }
}

#[async_trait]
impl DeviceBridge for FakeBridge {
    type Device = FakeDevice;

    async fn devices(&self) -> Result<Vec<FakeDevice>, BridgeError> {
        if self.fail_transport {
            return Err(Self::transport_error("devices"));
        }
        Ok(self.devices.clone())
    }

    async fn device(&self, serial: &str) -> Result<FakeDevice, BridgeError> {
        if self.fail_transport {
            return Err(Self::transport_error("devices"));
        }
        self.devices
            .iter()
            .find(|d| d.serial == serial)
            .cloned()
            .ok_or_else(|| BridgeError::DeviceNotFound(serial.to_string()))
    }
}

/// Scripted device: fixed properties, canned shell responses and an
/// in-memory remote filesystem backing the sync operations.
///
/// Existence probes (`test -e '<path>' ...`) not covered by a canned
/// response are answered from the fake filesystem, so sync tests do not
/// have to script the probe by hand.
#[derive(Clone)]
pub struct FakeDevice {
    serial: String,
    props: HashMap<String, String>,
    shell_responses: HashMap<String, String>,
    remote_files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_props: bool,
    fail_shell: bool,
    fail_sync: bool,
}

impl FakeDevice {
    pub fn new(serial: &str) -> Self {
        Self {
            serial: serial.to_string(),
            props: HashMap::new(),
            shell_responses: HashMap::new(),
            remote_files: Arc::new(Mutex::new(HashMap::new())),
            fail_props: false,
            fail_shell: false,
            fail_sync: false,
        }
    }

    pub fn with_prop(mut self, key: &str, value: &str) -> Self {
        self.props.insert(key.to_string(), value.to_string());
        self
    }

    /// Script the stdout of one exact shell command.
    pub fn with_shell_response(mut self, command: &str, stdout: &str) -> Self {
        self.shell_responses
            .insert(command.to_string(), stdout.to_string());
        self
    }

    /// Seed a file on the fake remote filesystem.
    pub fn with_remote_file(self, path: &str, contents: &[u8]) -> Self {
        self.remote_files
            .lock()
            .unwrap()
            .insert(path.to_string(), contents.to_vec());
        self
    }

    /// All property reads fail.
    pub fn without_props(mut self) -> Self {
        self.fail_props = true;
        self
    }

    /// All shell commands fail.
    pub fn with_failing_shell(mut self) -> Self {
        self.fail_shell = true;
        self
    }

    /// All sync operations fail.
    pub fn with_failing_sync(mut self) -> Self {
        self.fail_sync = true;
        self
    }

    /// Contents of a file on the fake remote filesystem, if present.
    pub fn remote_file(&self, path: &str) -> Option<Vec<u8>> {
        self.remote_files.lock().unwrap().get(path).cloned()
    }
}

#[async_trait]
impl DeviceHandle for FakeDevice {
    fn serial(&self) -> &str {
        &self.serial
    }

    async fn prop(&self, key: &str) -> Option<String> {
        if self.fail_props {
            return None;
        }
        self.props.get(key).cloned()
    }

    async fn shell(&self, command: &str) -> Result<String, BridgeError> {
        if self.fail_shell {
            return Err(BridgeError::CommandFailed {
                command: command.to_string(),
                stderr: "shell unavailable".to_string(),
            });
        }
        if let Some(stdout) = self.shell_responses.get(command) {
            return Ok(stdout.clone());
        }
        if let Some(path) = command
            .strip_prefix("test -e '")
            .and_then(|rest| rest.split('\'').next())
        {
            let marker = if self.remote_files.lock().unwrap().contains_key(path) {
                "exists"
            } else {
                "not_exists"
            };
            return Ok(format!("{}\n", marker));
        }
        Err(BridgeError::CommandFailed {
            command: command.to_string(),
            stderr: "unscripted command".to_string(),
        })
    }

    async fn sync_pull(&self, remote_path: &str, local_path: &Path) -> Result<(), BridgeError> {
        if self.fail_sync {
            return Err(BridgeError::CommandFailed {
                command: format!("pull {}", remote_path),
                stderr: "sync channel closed".to_string(),
            });
        }
        let contents = self
            .remote_files
            .lock()
            .unwrap()
            .get(remote_path)
            .cloned()
            .ok_or_else(|| BridgeError::CommandFailed {
                command: format!("pull {}", remote_path),
                stderr: format!("remote object '{}' does not exist", remote_path),
            })?;
        std::fs::write(local_path, contents)?;
        Ok(())
    }

    async fn sync_push(&self, local_path: &Path, remote_path: &str) -> Result<(), BridgeError> {
        if self.fail_sync {
            return Err(BridgeError::CommandFailed {
                command: format!("push {}", remote_path),
                stderr: "sync channel closed".to_string(),
            });
        }
        let contents = std::fs::read(local_path)?;
        self.remote_files
            .lock()
            .unwrap()
            .insert(remote_path.to_string(), contents);
        Ok(())
    }
}
