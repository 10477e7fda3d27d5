//! Time-of-day crowd drift patterns per zone category.
//!
//! Each tick, every zone's occupancy drifts by a fraction drawn from a
//! range that depends on its category and the hour of day. Temples and
//! ghats fill around the morning and evening aarti, parking tracks
//! arrival and departure waves, kitchens follow meal times. Categories
//! without a daily rhythm just wander.

use mela_types::ZoneType;
use rand::Rng;

/// Fractional drift range for a zone category at a given hour.
///
/// Returned as `(low, high)` bounds for a uniform draw; positive values
/// fill the zone, negative values drain it.
pub fn drift_range(zone_type: ZoneType, hour: u32) -> (f64, f64) {
    match zone_type {
        ZoneType::Temple => {
            if matches!(hour, 5..=9 | 17..=20) {
                (0.02, 0.08)
            } else if matches!(hour, 21..=23 | 0..=4) {
                (-0.08, -0.02)
            } else {
                (-0.03, 0.03)
            }
        }
        ZoneType::Ghat => {
            if matches!(hour, 5..=8 | 18..=20) {
                (0.03, 0.10)
            } else if matches!(hour, 21..=23 | 0..=4) {
                (-0.08, -0.02)
            } else {
                (-0.03, 0.03)
            }
        }
        ZoneType::Parking => {
            if matches!(hour, 6..=10 | 16..=21) {
                (0.02, 0.06)
            } else {
                (-0.03, 0.03)
            }
        }
        ZoneType::Food => {
            if matches!(hour, 7..=9 | 12..=14 | 19..=21) {
                (0.03, 0.08)
            } else {
                (-0.03, 0.03)
            }
        }
        ZoneType::Medical | ZoneType::Security | ZoneType::Accommodation => (-0.03, 0.03),
    }
}

/// Draw a drift factor for a zone category at a given hour.
pub fn drift_factor(zone_type: ZoneType, hour: u32, rng: &mut impl Rng) -> f64 {
    let (low, high) = drift_range(zone_type, hour);
    rng.random_range(low..=high)
}
