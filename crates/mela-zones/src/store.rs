//! The zone crowd-state store.
//!
//! [`ZoneStateStore`] owns the zone directory and the append-only sample
//! history for every zone. [`ZoneStateStore::record_sample`] is the single
//! mutation path for occupancy: it clamps the raw value into
//! `[0, capacity]`, derives the crowd level from the clamped value, and
//! appends an immutable [`CrowdSample`]. Nothing else in the workspace
//! writes occupancy.
//!
//! The store itself is synchronous and does no broadcasting; callers
//! (the simulation loop or an external ingestion producer) hand the
//! returned delta to the broadcast hub. Concurrent access is arranged by
//! the observer layer, which wraps the store in an `Arc<RwLock<_>>` so a
//! snapshot read never observes a zone mid-update.

use std::collections::BTreeMap;
use std::collections::VecDeque;

use chrono::Utc;
use mela_types::{CrowdLevel, CrowdSample, Zone, ZoneId, ZoneStatus, ZoneType};
use tracing::debug;

use crate::error::ZoneError;
use crate::trend;

/// Default number of samples retained per zone.
///
/// At the default 30-second tick interval this is 24 hours of history,
/// enough for trend computation and the analytics window collaborators
/// query.
pub const DEFAULT_SAMPLE_RETENTION: usize = 2880;

/// Outcome of recording one occupancy sample.
#[derive(Debug, Clone)]
pub struct RecordedSample {
    /// The sample that was appended.
    pub sample: CrowdSample,
    /// Signed change against the previous occupancy (new - previous).
    pub change_from_previous: i64,
}

/// In-memory store of zones and their crowd sample history.
#[derive(Debug)]
pub struct ZoneStateStore {
    /// Zone directory keyed by zone ID.
    zones: BTreeMap<ZoneId, Zone>,
    /// Bounded append-only sample history per zone, oldest first.
    history: BTreeMap<ZoneId, VecDeque<CrowdSample>>,
    /// Maximum samples retained per zone.
    retention: usize,
}

impl ZoneStateStore {
    /// Create an empty store with the default sample retention.
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_SAMPLE_RETENTION)
    }

    /// Create an empty store retaining at most `retention` samples per zone.
    ///
    /// A retention below 2 is raised to 2: the trend classifier needs the
    /// previous sample.
    pub fn with_retention(retention: usize) -> Self {
        Self {
            zones: BTreeMap::new(),
            history: BTreeMap::new(),
            retention: retention.max(2),
        }
    }

    // -----------------------------------------------------------------------
    // Zone directory
    // -----------------------------------------------------------------------

    /// Register a new zone.
    ///
    /// The zone's `current_occupancy` is clamped into `[0, capacity]` on
    /// entry so the occupancy invariant holds from registration onward.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::DuplicateZone`] if the ID is already registered.
    pub fn register_zone(&mut self, mut zone: Zone) -> Result<(), ZoneError> {
        if self.zones.contains_key(&zone.id) {
            return Err(ZoneError::DuplicateZone(zone.id));
        }
        zone.current_occupancy = zone.current_occupancy.min(zone.capacity);
        debug!(zone_id = %zone.id, name = zone.name, capacity = zone.capacity, "Zone registered");
        self.history.insert(zone.id, VecDeque::new());
        self.zones.insert(zone.id, zone);
        Ok(())
    }

    /// Look up a zone by ID.
    pub fn zone(&self, zone_id: ZoneId) -> Option<&Zone> {
        self.zones.get(&zone_id)
    }

    /// Iterate over all registered zones in ID order.
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    /// Number of registered zones.
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    // -----------------------------------------------------------------------
    // Sample recording -- the single occupancy mutation path
    // -----------------------------------------------------------------------

    /// Record a raw occupancy reading for a zone.
    ///
    /// The raw value is clamped into `[0, capacity]`; the crowd level and
    /// density are derived from the clamped value, never copied from a
    /// prior sample. The sample is appended to the zone's history and the
    /// zone's live occupancy is updated atomically with it (both sit
    /// behind the same `&mut self`).
    ///
    /// Returns the appended sample together with the signed change
    /// against the previous occupancy, for the caller to hand to the
    /// broadcast hub.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::UnknownZone`] if the zone is not registered.
    pub fn record_sample(
        &mut self,
        zone_id: ZoneId,
        raw_occupancy: i64,
    ) -> Result<RecordedSample, ZoneError> {
        let zone = self
            .zones
            .get_mut(&zone_id)
            .ok_or(ZoneError::UnknownZone(zone_id))?;

        let clamped = clamp_occupancy(raw_occupancy, zone.capacity);
        let crowd_level = CrowdLevel::from_occupancy(clamped, zone.capacity);
        let density_per_sqm = density(clamped, zone.capacity);

        let samples = self.history.entry(zone_id).or_default();
        let previous_occupancy = samples
            .back()
            .map_or(zone.current_occupancy, |s| s.occupancy);
        let change_from_previous = i64::from(clamped).saturating_sub(i64::from(previous_occupancy));

        let sample = CrowdSample {
            zone_id,
            occupancy: clamped,
            density_per_sqm,
            crowd_level,
            timestamp: Utc::now(),
        };

        samples.push_back(sample.clone());
        while samples.len() > self.retention {
            samples.pop_front();
        }

        zone.current_occupancy = clamped;

        Ok(RecordedSample {
            sample,
            change_from_previous,
        })
    }

    /// The most recent sample for a zone, if any.
    pub fn latest(&self, zone_id: ZoneId) -> Option<&CrowdSample> {
        self.history.get(&zone_id).and_then(VecDeque::back)
    }

    /// The second-most-recent sample for a zone, if any.
    pub fn previous(&self, zone_id: ZoneId) -> Option<&CrowdSample> {
        self.history
            .get(&zone_id)
            .and_then(|samples| samples.iter().rev().nth(1))
    }

    /// Recent samples for a zone, most recent first, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::UnknownZone`] if the zone is not registered.
    pub fn history(&self, zone_id: ZoneId, limit: usize) -> Result<Vec<CrowdSample>, ZoneError> {
        let samples = self
            .history
            .get(&zone_id)
            .ok_or(ZoneError::UnknownZone(zone_id))?;
        Ok(samples.iter().rev().take(limit).cloned().collect())
    }

    // -----------------------------------------------------------------------
    // Derived metrics
    // -----------------------------------------------------------------------

    /// Estimate the queue wait for a zone in minutes.
    ///
    /// Below 40% occupancy there is no significant wait (`None`). From
    /// there, the base wait for the zone type is scaled by occupancy:
    /// x3 at >= 90%, x2 at >= 70%, x1.5 at >= 50%, x1 otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::UnknownZone`] if the zone is not registered.
    pub fn estimate_wait_minutes(&self, zone_id: ZoneId) -> Result<Option<u32>, ZoneError> {
        let zone = self
            .zones
            .get(&zone_id)
            .ok_or(ZoneError::UnknownZone(zone_id))?;
        let occupancy = self
            .latest(zone_id)
            .map_or(zone.current_occupancy, |s| s.occupancy);
        Ok(estimate_wait(occupancy, zone.capacity, zone.zone_type))
    }

    /// Current trend for a zone against its previous sample.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::UnknownZone`] if the zone is not registered.
    pub fn trend(&self, zone_id: ZoneId) -> Result<mela_types::Trend, ZoneError> {
        let zone = self
            .zones
            .get(&zone_id)
            .ok_or(ZoneError::UnknownZone(zone_id))?;
        let current = self
            .latest(zone_id)
            .map_or(zone.current_occupancy, |s| s.occupancy);
        let previous = self.previous(zone_id).map(|s| s.occupancy);
        Ok(trend::classify(current, previous))
    }

    /// Pull-style status projection for a single zone.
    ///
    /// All derived fields (percentage, level, trend, wait) are computed
    /// from the same consistent read, so repeated calls with no
    /// intervening sample yield identical results.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::UnknownZone`] if the zone is not registered.
    pub fn zone_status(&self, zone_id: ZoneId) -> Result<ZoneStatus, ZoneError> {
        let zone = self
            .zones
            .get(&zone_id)
            .ok_or(ZoneError::UnknownZone(zone_id))?;

        let latest = self.latest(zone_id);
        let occupancy = latest.map_or(zone.current_occupancy, |s| s.occupancy);
        let last_updated = latest.map_or(zone.created_at, |s| s.timestamp);
        let previous = self.previous(zone_id).map(|s| s.occupancy);

        Ok(ZoneStatus {
            zone_id: zone.id,
            zone_name: zone.name.clone(),
            occupancy,
            capacity: zone.capacity,
            occupancy_percentage: occupancy_percentage(occupancy, zone.capacity),
            crowd_level: CrowdLevel::from_occupancy(occupancy, zone.capacity),
            trend: trend::classify(occupancy, previous),
            estimated_wait_minutes: estimate_wait(occupancy, zone.capacity, zone.zone_type),
            last_updated,
        })
    }

    /// Status projections for every registered zone, in ID order.
    pub fn all_zone_statuses(&self) -> Vec<ZoneStatus> {
        self.zones
            .keys()
            .filter_map(|id| self.zone_status(*id).ok())
            .collect()
    }
}

impl Default for ZoneStateStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Derivation helpers
// ---------------------------------------------------------------------------

/// Clamp a raw occupancy reading into `[0, capacity]`.
fn clamp_occupancy(raw: i64, capacity: u32) -> u32 {
    u32::try_from(raw.clamp(0, i64::from(capacity))).unwrap_or(0)
}

/// Estimated persons per square metre.
///
/// The usable area is approximated as one tenth of capacity, floored at
/// one square metre so empty or tiny zones do not divide by zero.
fn density(occupancy: u32, capacity: u32) -> f64 {
    f64::from(occupancy) / (f64::from(capacity) * 0.1).max(1.0)
}

/// Occupancy as a percentage of capacity, rounded to one decimal place.
fn occupancy_percentage(occupancy: u32, capacity: u32) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    let pct = f64::from(occupancy) / f64::from(capacity) * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Base wait in minutes for a zone type before occupancy scaling.
const fn base_wait_minutes(zone_type: ZoneType) -> u32 {
    match zone_type {
        ZoneType::Temple => 15,
        ZoneType::Ghat => 10,
        ZoneType::Parking | ZoneType::Security => 5,
        ZoneType::Medical => 20,
        ZoneType::Food => 12,
        ZoneType::Accommodation => 30,
    }
}

/// Wait estimate from an occupancy/capacity pair and zone type.
///
/// Occupancy bands use the same widened integer comparisons as the crowd
/// level thresholds so the boundaries are exact.
fn estimate_wait(occupancy: u32, capacity: u32, zone_type: ZoneType) -> Option<u32> {
    if capacity == 0 {
        return None;
    }
    let occ = u64::from(occupancy).saturating_mul(10);
    let cap = u64::from(capacity);
    if occ < cap.saturating_mul(4) {
        return None;
    }

    let base = base_wait_minutes(zone_type);
    let minutes = if occ >= cap.saturating_mul(9) {
        base.saturating_mul(3)
    } else if occ >= cap.saturating_mul(7) {
        base.saturating_mul(2)
    } else if occ >= cap.saturating_mul(5) {
        // x1.5, truncated like the upstream integer math.
        base.saturating_mul(3) / 2
    } else {
        base
    };
    Some(minutes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mela_types::{Coordinate, Trend};

    use super::*;

    fn make_zone(zone_type: ZoneType, capacity: u32, occupancy: u32) -> Zone {
        Zone {
            id: ZoneId::new(),
            name: String::from("Test Zone"),
            zone_type,
            center: Coordinate::new(23.18, 75.77).unwrap(),
            capacity,
            current_occupancy: occupancy,
            description: None,
            created_at: Utc::now(),
        }
    }

    fn store_with(zone: &Zone) -> ZoneStateStore {
        let mut store = ZoneStateStore::new();
        store.register_zone(zone.clone()).unwrap();
        store
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let zone = make_zone(ZoneType::Temple, 1000, 0);
        let mut store = store_with(&zone);
        assert_eq!(
            store.register_zone(zone.clone()),
            Err(ZoneError::DuplicateZone(zone.id))
        );
    }

    #[test]
    fn registration_clamps_initial_occupancy() {
        let zone = make_zone(ZoneType::Ghat, 100, 5000);
        let store = store_with(&zone);
        assert_eq!(store.zone(zone.id).unwrap().current_occupancy, 100);
    }

    #[test]
    fn unknown_zone_is_surfaced() {
        let mut store = ZoneStateStore::new();
        let missing = ZoneId::new();
        assert_eq!(
            store.record_sample(missing, 10).unwrap_err(),
            ZoneError::UnknownZone(missing)
        );
        assert_eq!(
            store.zone_status(missing).unwrap_err(),
            ZoneError::UnknownZone(missing)
        );
    }

    #[test]
    fn occupancy_is_clamped_for_any_raw_input() {
        let zone = make_zone(ZoneType::Temple, 1000, 500);
        let mut store = store_with(&zone);

        for raw in [-50_i64, 0, 999, 1000, 1001, i64::MAX, i64::MIN] {
            let recorded = store.record_sample(zone.id, raw).unwrap();
            let occupancy = recorded.sample.occupancy;
            assert!(occupancy <= 1000, "raw {raw} stored {occupancy}");
            assert_eq!(store.zone(zone.id).unwrap().current_occupancy, occupancy);
        }
    }

    #[test]
    fn crowd_level_derives_from_own_sample() {
        let zone = make_zone(ZoneType::Temple, 100, 0);
        let mut store = store_with(&zone);

        let first = store.record_sample(zone.id, 95).unwrap();
        assert_eq!(first.sample.crowd_level, CrowdLevel::Critical);

        // The next sample must be reclassified from its own occupancy,
        // not copied from the critical sample before it.
        let second = store.record_sample(zone.id, 10).unwrap();
        assert_eq!(second.sample.crowd_level, CrowdLevel::Low);
    }

    #[test]
    fn change_from_previous_is_signed() {
        let zone = make_zone(ZoneType::Ghat, 1000, 400);
        let mut store = store_with(&zone);

        // First sample compares against the registered live occupancy.
        let first = store.record_sample(zone.id, 500).unwrap();
        assert_eq!(first.change_from_previous, 100);

        let second = store.record_sample(zone.id, 350).unwrap();
        assert_eq!(second.change_from_previous, -150);
    }

    #[test]
    fn latest_and_previous_track_history() {
        let zone = make_zone(ZoneType::Parking, 2000, 0);
        let mut store = store_with(&zone);

        assert!(store.latest(zone.id).is_none());
        assert!(store.previous(zone.id).is_none());

        store.record_sample(zone.id, 100).unwrap();
        store.record_sample(zone.id, 200).unwrap();
        store.record_sample(zone.id, 300).unwrap();

        assert_eq!(store.latest(zone.id).unwrap().occupancy, 300);
        assert_eq!(store.previous(zone.id).unwrap().occupancy, 200);
    }

    #[test]
    fn history_is_bounded_by_retention() {
        let zone = make_zone(ZoneType::Food, 3000, 0);
        let mut store = ZoneStateStore::with_retention(3);
        store.register_zone(zone.clone()).unwrap();

        for occ in 1..=10_i64 {
            store.record_sample(zone.id, occ).unwrap();
        }

        let window = store.history(zone.id, 100).unwrap();
        assert_eq!(window.len(), 3);
        // Most recent first.
        assert_eq!(window.first().unwrap().occupancy, 10);
    }

    #[test]
    fn wait_time_bands() {
        let zone = make_zone(ZoneType::Temple, 100, 0);
        let mut store = store_with(&zone);

        // Below 40%: no significant wait.
        store.record_sample(zone.id, 39).unwrap();
        assert_eq!(store.estimate_wait_minutes(zone.id).unwrap(), None);

        // [40%, 50%): base wait.
        store.record_sample(zone.id, 45).unwrap();
        assert_eq!(store.estimate_wait_minutes(zone.id).unwrap(), Some(15));

        // [50%, 70%): x1.5, truncated.
        store.record_sample(zone.id, 50).unwrap();
        assert_eq!(store.estimate_wait_minutes(zone.id).unwrap(), Some(22));

        // [70%, 90%): x2.
        store.record_sample(zone.id, 70).unwrap();
        assert_eq!(store.estimate_wait_minutes(zone.id).unwrap(), Some(30));

        // >= 90%: x3.
        store.record_sample(zone.id, 90).unwrap();
        assert_eq!(store.estimate_wait_minutes(zone.id).unwrap(), Some(45));
    }

    #[test]
    fn wait_time_uses_zone_type_base() {
        let zone = make_zone(ZoneType::Accommodation, 100, 0);
        let mut store = store_with(&zone);
        store.record_sample(zone.id, 95).unwrap();
        assert_eq!(store.estimate_wait_minutes(zone.id).unwrap(), Some(90));
    }

    #[test]
    fn zone_status_is_idempotent() {
        let zone = make_zone(ZoneType::Ghat, 15_000, 0);
        let mut store = store_with(&zone);
        store.record_sample(zone.id, 12_000).unwrap();

        let first = store.zone_status(zone.id).unwrap();
        let second = store.zone_status(zone.id).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.crowd_level, CrowdLevel::High);
        assert!((first.occupancy_percentage - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zone_status_reports_trend() {
        let zone = make_zone(ZoneType::Temple, 10_000, 0);
        let mut store = store_with(&zone);

        store.record_sample(zone.id, 1000).unwrap();
        store.record_sample(zone.id, 2000).unwrap();
        assert_eq!(store.zone_status(zone.id).unwrap().trend, Trend::Increasing);

        store.record_sample(zone.id, 500).unwrap();
        assert_eq!(store.zone_status(zone.id).unwrap().trend, Trend::Decreasing);
    }

    #[test]
    fn status_before_any_sample_uses_live_occupancy() {
        let zone = make_zone(ZoneType::Medical, 300, 85);
        let store = store_with(&zone);
        let status = store.zone_status(zone.id).unwrap();
        assert_eq!(status.occupancy, 85);
        assert_eq!(status.trend, Trend::Stable);
        assert_eq!(status.crowd_level, CrowdLevel::Low);
    }

    #[test]
    fn all_statuses_cover_every_zone() {
        let mut store = ZoneStateStore::new();
        store
            .register_zone(make_zone(ZoneType::Temple, 100, 10))
            .unwrap();
        store
            .register_zone(make_zone(ZoneType::Ghat, 200, 20))
            .unwrap();
        assert_eq!(store.all_zone_statuses().len(), 2);
    }
}
