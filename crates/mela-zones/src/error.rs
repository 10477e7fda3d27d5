//! Error types for the `mela-zones` crate.
//!
//! All fallible operations in this crate return [`ZoneError`] through the
//! standard [`Result`] type alias.

use mela_types::ZoneId;

/// Errors that can occur during zone store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZoneError {
    /// An operation referenced a zone that is not registered.
    #[error("unknown zone: {0}")]
    UnknownZone(ZoneId),

    /// A zone was registered under an identifier that already exists.
    #[error("duplicate zone id: {0}")]
    DuplicateZone(ZoneId),
}
