//! Core entity structs shared across the workspace.
//!
//! These are the records that cross crate boundaries: the zone directory
//! entry, the append-only crowd sample, the pull-style zone status
//! projection, and the push-style crowd update delta.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{CrowdLevel, Trend, ZoneType};
use crate::geo::Coordinate;
use crate::ids::ZoneId;

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

/// A bounded geographic area with a capacity and live occupancy.
///
/// Capacity is immutable after registration. Occupancy is mutated only
/// through the zone store's `record_sample` path, which clamps it into
/// `[0, capacity]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    /// Unique zone identifier.
    pub id: ZoneId,
    /// Human-readable zone name.
    pub name: String,
    /// Functional category of the zone.
    pub zone_type: ZoneType,
    /// Geographic center of the zone.
    pub center: Coordinate,
    /// Maximum safe occupancy. Immutable after creation.
    pub capacity: u32,
    /// Live occupancy, always in `[0, capacity]`.
    pub current_occupancy: u32,
    /// Optional free-form description for dashboards.
    pub description: Option<String>,
    /// When the zone was registered.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Crowd sample
// ---------------------------------------------------------------------------

/// An immutable occupancy measurement for one zone at one instant.
///
/// `crowd_level` and `density_per_sqm` are derived from this sample's own
/// occupancy/capacity pair when the sample is created, never copied from
/// an earlier sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrowdSample {
    /// The zone this sample belongs to.
    pub zone_id: ZoneId,
    /// Clamped occupancy at sampling time.
    pub occupancy: u32,
    /// Estimated persons per square metre.
    pub density_per_sqm: f64,
    /// Severity classification derived from this sample's occupancy.
    pub crowd_level: CrowdLevel,
    /// When the sample was recorded.
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Zone status projection
// ---------------------------------------------------------------------------

/// Pull-style status projection for one zone.
///
/// Computed on demand from the store; calling twice with no intervening
/// sample yields identical results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatus {
    /// The zone identifier.
    pub zone_id: ZoneId,
    /// The zone name.
    pub zone_name: String,
    /// Current occupancy.
    pub occupancy: u32,
    /// Zone capacity.
    pub capacity: u32,
    /// Occupancy as a percentage of capacity, rounded to one decimal.
    pub occupancy_percentage: f64,
    /// Current severity classification.
    pub crowd_level: CrowdLevel,
    /// Direction of change against the previous sample.
    pub trend: Trend,
    /// Estimated queue wait in minutes; `None` below 40% occupancy.
    pub estimated_wait_minutes: Option<u32>,
    /// Timestamp of the most recent sample (registration time if none).
    pub last_updated: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Crowd update delta
// ---------------------------------------------------------------------------

/// Push-style delta broadcast to observers after a sample is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrowdUpdate {
    /// The zone that changed.
    pub zone_id: ZoneId,
    /// The zone name, denormalized for display.
    pub zone_name: String,
    /// New occupancy.
    pub occupancy: u32,
    /// Zone capacity.
    pub capacity: u32,
    /// Severity derived from the new occupancy.
    pub crowd_level: CrowdLevel,
    /// When the underlying sample was recorded.
    pub timestamp: DateTime<Utc>,
    /// Signed occupancy change against the previous sample.
    pub change_from_previous: i64,
}
