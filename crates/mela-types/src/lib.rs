//! Shared type definitions for the Mela crowd management platform.
//!
//! This crate is the single source of truth for types used across the
//! workspace: zone directory entries, crowd samples, severity and trend
//! enums, and the validated geographic primitives.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifier wrappers
//! - [`enums`] -- Zone categories, crowd severity, trend direction
//! - [`geo`] -- Validated WGS-84 coordinates
//! - [`structs`] -- Zone, sample, status, and update records

pub mod enums;
pub mod geo;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{CrowdLevel, Trend, ZoneType};
pub use geo::{Coordinate, CoordinateError};
pub use ids::{ObserverId, RouteId, ZoneId};
pub use structs::{CrowdSample, CrowdUpdate, Zone, ZoneStatus};
