//! Zone crowd-state management for the Mela platform.
//!
//! This crate owns the live occupancy picture: the [`ZoneStateStore`]
//! holds the zone directory and bounded sample history, derives crowd
//! levels and wait estimates, and classifies occupancy trends. It is
//! synchronous by design; the observer layer wraps it in a lock for
//! concurrent access.
//!
//! # Modules
//!
//! - [`store`] -- The zone directory and sample recording path
//! - [`trend`] -- Trend classification between consecutive samples
//! - [`overview`] -- Site-wide aggregate status
//! - [`error`] -- Crate error type

pub mod error;
pub mod overview;
pub mod store;
pub mod trend;

pub use error::ZoneError;
pub use overview::{CrowdOverview, crowd_overview};
pub use store::{DEFAULT_SAMPLE_RETENTION, RecordedSample, ZoneStateStore};
