//! Local filesystem access.
//!
//! This module owns the local half of the bridge:
//! - Path validation: raw user input becomes a [`ValidatedLocalPath`] or an
//!   error, never a raw path handed to the filesystem
//! - Listing, reading and writing through [`LocalFs`]
//!
//! Validation is existence-only; see [`validate`] for the exact rules and
//! their limits.

pub mod local;
pub mod validate;

pub use local::{LocalFs, HIDDEN_PREFIX};
pub use validate::{FsError, PathValidator, ValidatedLocalPath};
