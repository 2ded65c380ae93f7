//! Remote filesystem access over the device bridge.
//!
//! Two channels, matching the transport's split:
//! - [`ShellLister`] runs a listing command and parses its textual output
//!   into structured entries
//! - [`SyncTransport`] moves file bytes and probes for existence
//!
//! Paths are quoted with [`quote_arg`] before interpolation into shell
//! command strings.

pub mod lister;
pub mod sync;

pub use lister::{ListError, ShellLister};
pub use sync::{SyncTransport, TransferError};

/// Single-quote a path for interpolation into a remote shell command.
///
/// Embedded single quotes are closed, escaped and reopened (`'\''`), the
/// standard POSIX idiom.
pub(crate) fn quote_arg(path: &str) -> String {
    format!("'{}'", path.replace('\'', "'\\''"))
}
