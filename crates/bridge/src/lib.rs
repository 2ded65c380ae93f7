//! # DroidBridge Service Library
//!
//! This crate provides the service functionality for DroidBridge, bridging
//! the local filesystem and Android devices reachable over the adb debug
//! bridge.
//!
//! ## Overview
//!
//! The service is the core behind every DroidBridge client. It provides:
//!
//! - **Device Registry**: Enumerate and describe connected devices
//! - **Local Browsing**: Validate paths and list local directories
//! - **Remote Browsing**: List device directories by parsing `ls -la` output
//! - **Transfers**: Validated single-file push and pull over the sync channel
//! - **Presence**: Periodic device list broadcasts to attached listeners
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      BridgeService                       │
//! ├──────────────────────────────────────────────────────────┤
//! │                                                          │
//! │  ┌────────────┐  ┌──────────────┐  ┌────────────────┐    │
//! │  │    Path    │  │    Local     │  │     Shell      │    │
//! │  │  Validator │  │  Filesystem  │  │     Lister     │    │
//! │  └────────────┘  └──────────────┘  └────────────────┘    │
//! │                                                          │
//! │  ┌────────────┐  ┌──────────────┐  ┌────────────────┐    │
//! │  │  Transfer  │  │   Presence   │  │     Device     │    │
//! │  │Orchestrator│  │ Broadcaster  │  │    Registry    │    │
//! │  └────────────┘  └──────────────┘  └────────────────┘    │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │                DeviceBridge (adb)                  │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use bridge::{BridgeService, Config, ExecBridge};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load or create configuration
//!     let config = Config::load_default()?;
//!
//!     // Talk to devices through the adb binary on PATH
//!     let service = BridgeService::new(config, Arc::new(ExecBridge::discover()?));
//!
//!     let devices = service.current_devices().await;
//!     println!("{} device(s) connected", devices.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and defaults
//! - [`adb`]: Device bridge trait and the adb CLI implementation
//! - [`devices`]: Device enumeration and description
//! - [`files`]: Local path validation and directory browsing
//! - [`remote`]: Remote listing, quoting and sync transfers
//! - [`transfer`]: Transfer request validation and execution
//! - [`presence`]: Periodic device presence broadcasts
//! - [`service`]: The facade wiring everything together

pub mod adb;
pub mod config;
pub mod devices;
pub mod files;
pub mod presence;
pub mod remote;
pub mod service;
pub mod transfer;

// Re-export protocol for convenience
pub use protocol;

// Re-export config types for convenience
pub use config::Config;

// Re-export bridge types for convenience
pub use adb::{BridgeError, DeviceBridge, DeviceHandle, ExecBridge, ExecDevice};

// Re-export device types for convenience
pub use devices::DeviceRegistry;

// Re-export files types for convenience
pub use files::{FsError, LocalFs, PathValidator, ValidatedLocalPath};

// Re-export remote types for convenience
pub use remote::{ListError, ShellLister, SyncTransport, TransferError};

// Re-export transfer types for convenience
pub use transfer::TransferOrchestrator;

// Re-export presence types for convenience
pub use presence::{
    ListenerClosed, PresenceBroadcaster, PresenceListener, PresenceSubscription,
    DEFAULT_POLL_INTERVAL,
};

// Re-export service types for convenience
pub use service::{BridgeService, ServiceError};
