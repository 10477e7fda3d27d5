//! Trend classification over consecutive occupancy samples.
//!
//! A zone's trend is the direction of change between its two most recent
//! occupancy values. The +/-10% dead band keeps ordinary churn from
//! flapping between labels.

use mela_types::Trend;

/// Classify the direction of change between two consecutive occupancies.
///
/// Returns [`Trend::Increasing`] if `current > previous * 1.1`,
/// [`Trend::Decreasing`] if `current < previous * 0.9`, and
/// [`Trend::Stable`] otherwise. A missing previous sample is defined as
/// [`Trend::Stable`] -- a single data point has no direction.
///
/// The comparisons are done in widened integer arithmetic
/// (`current * 10` vs `previous * 11` and `previous * 9`), which is exact
/// for every pair of integer occupancies.
pub fn classify(current: u32, previous: Option<u32>) -> Trend {
    let Some(previous) = previous else {
        return Trend::Stable;
    };

    let cur = u64::from(current).saturating_mul(10);
    if cur > u64::from(previous).saturating_mul(11) {
        Trend::Increasing
    } else if cur < u64::from(previous).saturating_mul(9) {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}
