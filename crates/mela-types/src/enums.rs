//! Enumeration types for the Mela crowd management platform.
//!
//! All wire-facing enums serialize as lowercase strings to match the
//! observer protocol (`"low"`, `"increasing"`, `"temple"`, ...).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Zone types
// ---------------------------------------------------------------------------

/// The functional category of a zone within the gathering grounds.
///
/// The category drives the simulation's time-of-day crowd patterns and the
/// base wait-time table (a temple queue moves differently from a parking
/// lot gate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    /// Temple premises and darshan queues.
    Temple,
    /// Bathing ghats along the river.
    Ghat,
    /// Vehicle parking areas.
    Parking,
    /// Medical posts and hospitals.
    Medical,
    /// Security and police control posts.
    Security,
    /// Community kitchens and food courts.
    Food,
    /// Tent cities and camp accommodation.
    Accommodation,
}

// ---------------------------------------------------------------------------
// Crowd severity
// ---------------------------------------------------------------------------

/// Crowd severity classification, totally ordered from calm to dangerous.
///
/// Always derived from an occupancy/capacity ratio at the moment a sample
/// is recorded -- never stored independently, so the classification can
/// never drift from the occupancy that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrowdLevel {
    /// Ratio below 0.40.
    Low,
    /// Ratio in [0.40, 0.70).
    Medium,
    /// Ratio in [0.70, 0.90).
    High,
    /// Ratio at or above 0.90.
    Critical,
}

impl CrowdLevel {
    /// Classify an occupancy/capacity pair.
    ///
    /// Thresholds are boundary-exact: ratio >= 0.90 is [`Self::Critical`],
    /// >= 0.70 is [`Self::High`], >= 0.40 is [`Self::Medium`], anything
    /// below is [`Self::Low`]. A zero capacity has an undefined ratio and
    /// is defined as [`Self::Low`].
    ///
    /// Comparisons are done in widened integer arithmetic so the
    /// boundaries hold exactly for every occupancy value.
    pub fn from_occupancy(occupancy: u32, capacity: u32) -> Self {
        if capacity == 0 {
            return Self::Low;
        }
        let occ = u64::from(occupancy).saturating_mul(10);
        let cap = u64::from(capacity);
        if occ >= cap.saturating_mul(9) {
            Self::Critical
        } else if occ >= cap.saturating_mul(7) {
            Self::High
        } else if occ >= cap.saturating_mul(4) {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

// ---------------------------------------------------------------------------
// Trend direction
// ---------------------------------------------------------------------------

/// Direction of occupancy change between two consecutive samples.
///
/// Never persisted; always recomputed from the two occupancy values at
/// the read boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Current occupancy exceeds the previous by more than 10%.
    Increasing,
    /// Current occupancy is below the previous by more than 10%.
    Decreasing,
    /// Within the +/-10% band, or no previous sample exists.
    Stable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crowd_level_is_totally_ordered() {
        assert!(CrowdLevel::Low < CrowdLevel::Medium);
        assert!(CrowdLevel::Medium < CrowdLevel::High);
        assert!(CrowdLevel::High < CrowdLevel::Critical);
    }

    #[test]
    fn thresholds_are_boundary_exact() {
        // Ratio 0.39 -> Low, 0.40 -> Medium, 0.69 -> Medium,
        // 0.70 -> High, 0.89 -> High, 0.90 -> Critical.
        assert_eq!(CrowdLevel::from_occupancy(39, 100), CrowdLevel::Low);
        assert_eq!(CrowdLevel::from_occupancy(40, 100), CrowdLevel::Medium);
        assert_eq!(CrowdLevel::from_occupancy(69, 100), CrowdLevel::Medium);
        assert_eq!(CrowdLevel::from_occupancy(70, 100), CrowdLevel::High);
        assert_eq!(CrowdLevel::from_occupancy(89, 100), CrowdLevel::High);
        assert_eq!(CrowdLevel::from_occupancy(90, 100), CrowdLevel::Critical);
    }

    #[test]
    fn zero_capacity_is_low() {
        assert_eq!(CrowdLevel::from_occupancy(0, 0), CrowdLevel::Low);
        assert_eq!(CrowdLevel::from_occupancy(500, 0), CrowdLevel::Low);
    }

    #[test]
    fn wire_format_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&CrowdLevel::Critical).ok(),
            Some(String::from("\"critical\""))
        );
        assert_eq!(
            serde_json::to_string(&Trend::Increasing).ok(),
            Some(String::from("\"increasing\""))
        );
        assert_eq!(
            serde_json::to_string(&ZoneType::Ghat).ok(),
            Some(String::from("\"ghat\""))
        );
    }
}
