//! Initial zone directory for the Ujjain gathering grounds.
//!
//! Eleven zones covering the major temples, bathing ghats, and support
//! infrastructure, with realistic capacities and starting occupancies.
//! Occupancy drifts from these values once the simulation starts.

use chrono::Utc;
use mela_types::{Coordinate, CoordinateError, Zone, ZoneId, ZoneType};
use mela_zones::{ZoneError, ZoneStateStore};

/// One row of the seed table.
struct SeedZone {
    name: &'static str,
    zone_type: ZoneType,
    lat: f64,
    lon: f64,
    capacity: u32,
    occupancy: u32,
    description: &'static str,
}

const SEED_ZONES: [SeedZone; 11] = [
    SeedZone {
        name: "Mahakaleshwar Temple",
        zone_type: ZoneType::Temple,
        lat: 23.1827,
        lon: 75.7687,
        capacity: 10_000,
        occupancy: 7_500,
        description: "Jyotirlinga temple and main darshan queue",
    },
    SeedZone {
        name: "Harsiddhi Temple",
        zone_type: ZoneType::Temple,
        lat: 23.1822,
        lon: 75.7652,
        capacity: 3_000,
        occupancy: 1_800,
        description: "Shakti Peetha temple near the old town",
    },
    SeedZone {
        name: "Chintaman Ganesh Temple",
        zone_type: ZoneType::Temple,
        lat: 23.1817,
        lon: 75.7702,
        capacity: 2_000,
        occupancy: 1_200,
        description: "Ganesh temple across the Shipra",
    },
    SeedZone {
        name: "Ram Ghat",
        zone_type: ZoneType::Ghat,
        lat: 23.1790,
        lon: 75.7650,
        capacity: 15_000,
        occupancy: 12_000,
        description: "Primary bathing ghat for the royal bath",
    },
    SeedZone {
        name: "Triveni Ghat",
        zone_type: ZoneType::Ghat,
        lat: 23.1760,
        lon: 75.7640,
        capacity: 8_000,
        occupancy: 4_500,
        description: "Confluence bathing ghat south of Ram Ghat",
    },
    SeedZone {
        name: "Mangalnath Ghat",
        zone_type: ZoneType::Ghat,
        lat: 23.1730,
        lon: 75.7630,
        capacity: 6_000,
        occupancy: 3_200,
        description: "Quieter ghat near Mangalnath temple",
    },
    SeedZone {
        name: "Main Parking",
        zone_type: ZoneType::Parking,
        lat: 23.1875,
        lon: 75.7600,
        capacity: 2_000,
        occupancy: 1_650,
        description: "Central vehicle parking and shuttle stand",
    },
    SeedZone {
        name: "District Hospital",
        zone_type: ZoneType::Medical,
        lat: 23.1935,
        lon: 75.7765,
        capacity: 300,
        occupancy: 85,
        description: "Emergency and general care facility",
    },
    SeedZone {
        name: "Police Control Center",
        zone_type: ZoneType::Security,
        lat: 23.1840,
        lon: 75.7715,
        capacity: 100,
        occupancy: 75,
        description: "Command post for crowd control operations",
    },
    SeedZone {
        name: "Community Kitchen",
        zone_type: ZoneType::Food,
        lat: 23.1810,
        lon: 75.7565,
        capacity: 3_000,
        occupancy: 1_800,
        description: "Free meal service for pilgrims",
    },
    SeedZone {
        name: "Sadhu Camp",
        zone_type: ZoneType::Accommodation,
        lat: 23.1725,
        lon: 75.7525,
        capacity: 5_000,
        occupancy: 3_500,
        description: "Tent city for visiting akharas",
    },
];

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// A seed row carried an out-of-range coordinate.
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
    /// Registration with the store failed.
    #[error(transparent)]
    Zone(#[from] ZoneError),
}

/// Build a store populated with the Ujjain seed zones.
///
/// # Errors
///
/// Returns an error if a seed row is invalid; with the compiled-in table
/// this cannot happen, but the store's validation still runs.
pub fn seeded_store() -> Result<ZoneStateStore, SeedError> {
    let mut store = ZoneStateStore::new();
    for seed in &SEED_ZONES {
        store.register_zone(Zone {
            id: ZoneId::new(),
            name: String::from(seed.name),
            zone_type: seed.zone_type,
            center: Coordinate::new(seed.lat, seed.lon)?,
            capacity: seed.capacity,
            current_occupancy: seed.occupancy,
            description: Some(String::from(seed.description)),
            created_at: Utc::now(),
        })?;
    }
    Ok(store)
}
