//! # DroidBridge Protocol Library
//!
//! This crate provides the wire data model shared between the DroidBridge
//! service core and its clients.
//!
//! ## Overview
//!
//! The protocol crate is deliberately passive: plain serde-serializable
//! types and a closed error-kind taxonomy, no I/O and no behavior beyond
//! shape invariants (listing order, directory sizes). It provides:
//!
//! - **Device snapshots**: descriptors produced by each enumeration poll
//! - **Listings**: the normalized directory-listing envelope shared by the
//!   local and remote filesystems
//! - **Transfers**: the single-file transfer request/outcome pair
//! - **Presence**: the broadcast message pushed to subscribed listeners
//! - **Error kinds**: the stable taxonomy boundary layers translate into
//!   statuses
//!
//! ## Example Usage
//!
//! ```rust
//! use protocol::{FileEntry, DirectoryListing, PresenceUpdate};
//!
//! let listing = DirectoryListing::new(
//!     "/sdcard",
//!     "/",
//!     vec![
//!         FileEntry::new("photo.jpg", "/sdcard/photo.jpg", false, 1234),
//!         FileEntry::new("DCIM", "/sdcard/DCIM", true, 0),
//!     ],
//! );
//! // Directories sort before files.
//! assert_eq!(listing.files[0].name, "DCIM");
//!
//! let update = PresenceUpdate::device_list(Vec::new());
//! assert_eq!(
//!     serde_json::to_string(&update).unwrap(),
//!     r#"{"type":"device_list","devices":[]}"#,
//! );
//! ```
//!
//! ## Modules
//!
//! - [`messages`]: wire message and data-model definitions
//! - [`error`]: the stable error-kind taxonomy

pub mod error;
pub mod messages;

pub use error::ErrorKind;
pub use messages::{
    DeviceDescriptor, DeviceState, DirectoryListing, EntryKind, FileEntry, PresenceUpdate,
    TransferDirection, TransferOutcome, TransferRequest,
};
