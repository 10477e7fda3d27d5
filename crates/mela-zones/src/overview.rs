//! Site-wide crowd overview aggregation.
//!
//! Collapses every zone's current state into one [`CrowdOverview`] for the
//! dashboard summary endpoint: total headcount, an overall severity level
//! derived from the summed occupancy ratio, and operational guidance when
//! zones run hot.

use chrono::{DateTime, Utc};
use mela_types::CrowdLevel;
use serde::Serialize;

use crate::store::ZoneStateStore;

/// Advisory windows when the site historically runs busiest.
///
/// Morning aarti and evening aarti hours dominate temple and ghat load.
pub const PEAK_HOURS: [&str; 2] = ["05:00-09:00", "17:00-20:00"];

/// Aggregated crowd picture across every registered zone.
#[derive(Debug, Clone, Serialize)]
pub struct CrowdOverview {
    /// Sum of current occupancy across all zones.
    pub total_occupancy: u64,
    /// Sum of capacity across all zones.
    pub total_capacity: u64,
    /// Severity derived from the summed occupancy ratio.
    pub overall_level: CrowdLevel,
    /// Number of zones currently at [`CrowdLevel::Critical`].
    pub critical_zones: usize,
    /// Number of zones currently at [`CrowdLevel::High`].
    pub high_zones: usize,
    /// Operational guidance for the current picture.
    pub recommendations: Vec<String>,
    /// Advisory peak-hour windows.
    pub peak_hours: Vec<String>,
    /// When this overview was computed.
    pub generated_at: DateTime<Utc>,
}

/// Build a site-wide overview from the store's current state.
pub fn crowd_overview(store: &ZoneStateStore) -> CrowdOverview {
    let mut total_occupancy: u64 = 0;
    let mut total_capacity: u64 = 0;
    let mut critical_zones = 0_usize;
    let mut high_zones = 0_usize;

    for status in store.all_zone_statuses() {
        total_occupancy = total_occupancy.saturating_add(u64::from(status.occupancy));
        total_capacity = total_capacity.saturating_add(u64::from(status.capacity));
        match status.crowd_level {
            CrowdLevel::Critical => critical_zones = critical_zones.saturating_add(1),
            CrowdLevel::High => high_zones = high_zones.saturating_add(1),
            CrowdLevel::Low | CrowdLevel::Medium => {}
        }
    }

    let overall_level = overall_level(total_occupancy, total_capacity);

    CrowdOverview {
        total_occupancy,
        total_capacity,
        overall_level,
        critical_zones,
        high_zones,
        recommendations: recommendations(overall_level, critical_zones, high_zones),
        peak_hours: PEAK_HOURS.iter().map(ToString::to_string).collect(),
        generated_at: Utc::now(),
    }
}

/// Severity for the summed occupancy ratio, using the same widened
/// integer thresholds as the per-zone classifier.
fn overall_level(occupancy: u64, capacity: u64) -> CrowdLevel {
    if capacity == 0 {
        return CrowdLevel::Low;
    }
    let occ = u128::from(occupancy).saturating_mul(10);
    let cap = u128::from(capacity);
    if occ >= cap.saturating_mul(9) {
        CrowdLevel::Critical
    } else if occ >= cap.saturating_mul(7) {
        CrowdLevel::High
    } else if occ >= cap.saturating_mul(4) {
        CrowdLevel::Medium
    } else {
        CrowdLevel::Low
    }
}

fn recommendations(
    overall: CrowdLevel,
    critical_zones: usize,
    high_zones: usize,
) -> Vec<String> {
    let mut out = Vec::new();
    if critical_zones > 0 {
        out.push(format!(
            "{critical_zones} zone(s) at critical capacity. Divert visitors to alternative areas."
        ));
    }
    if high_zones > 0 {
        out.push(format!(
            "{high_zones} zone(s) experiencing high crowds. Expect longer wait times."
        ));
    }
    if overall >= CrowdLevel::High {
        out.push(String::from(
            "Overall site occupancy is high. Consider visiting during off-peak hours.",
        ));
    }
    if out.is_empty() {
        out.push(String::from(
            "Crowd levels are manageable across all zones.",
        ));
    }
    out
}
