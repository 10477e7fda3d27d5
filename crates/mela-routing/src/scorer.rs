//! Crowd-aware route scoring.
//!
//! Given a start and end point, the scorer produces a primary walking
//! route and, when the caller wants to avoid crowds and the direct path
//! runs hot, a longer detour candidate. Each candidate carries a travel
//! estimate scaled by the crowd level along the path and a safety score
//! that weighs crowding against path geometry. The recommendation always
//! goes to the safer candidate, with ties resolved in favour of the
//! direct route.

use mela_types::{Coordinate, CrowdLevel, RouteId};
use mela_zones::ZoneStateStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RoutingError;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Walking speed assumed for travel estimates, km/h.
const WALKING_SPEED_KMH: f64 = 5.0;

/// A zone influences a route only if its centre lies within this many
/// kilometres of the route midpoint.
const ZONE_INFLUENCE_KM: f64 = 0.5;

/// Assumed path width of the direct route, metres. Main pedestrian
/// corridors on the grounds are laid out at this width.
const PRIMARY_PATH_WIDTH_M: f64 = 8.0;

/// Assumed path width of the detour route, metres.
const ALTERNATIVE_PATH_WIDTH_M: f64 = 6.0;

/// A route request from an observer or the mobile client.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteRequest {
    /// Where the visitor currently is.
    pub source: Coordinate,
    /// Where the visitor wants to go.
    pub destination: Coordinate,
    /// Prefer a longer but calmer path when the direct one runs hot.
    #[serde(default)]
    pub avoid_crowds: bool,
    /// The visitor needs step-free, wide paths.
    #[serde(default)]
    pub accessibility_required: bool,
}

/// One scored route candidate.
#[derive(Debug, Clone, Serialize)]
pub struct RouteCandidate {
    /// Identifier for this candidate, unique per response.
    pub route_id: RouteId,
    /// Total walking distance in kilometres, rounded to two decimals.
    pub distance_km: f64,
    /// Estimated travel time in whole minutes.
    pub estimated_time_minutes: u32,
    /// Crowd level along the path.
    pub crowd_level: CrowdLevel,
    /// Safety score in `[0, 10]`, higher is safer.
    pub safety_score: f64,
    /// Assumed path width in metres.
    pub path_width_m: f64,
    /// Human-readable label for the candidate.
    pub description: String,
}

/// The full scoring result for one request.
#[derive(Debug, Clone, Serialize)]
pub struct RouteResult {
    /// All scored candidates, primary first.
    pub routes: Vec<RouteCandidate>,
    /// The candidate the scorer recommends.
    pub recommended_route_id: RouteId,
    /// Number of candidates beyond the primary.
    pub alternative_count: usize,
}

/// Great-circle distance between two coordinates in kilometres.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.lat().to_radians();
    let lat_b = b.lat().to_radians();
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lon = (b.lon() - a.lon()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Score routes for a request against the current crowd state.
///
/// Always yields a primary candidate. A detour candidate is added only
/// when `avoid_crowds` is set and the direct path's crowd level is high
/// or critical; the detour trades 20% more distance and 30% more time
/// for a calmer path.
///
/// # Errors
///
/// Returns [`RoutingError::DegenerateRoute`] if start and end are the
/// same point.
pub fn score_routes(
    store: &ZoneStateStore,
    request: &RouteRequest,
) -> Result<RouteResult, RoutingError> {
    let distance_km = haversine_km(request.source, request.destination);
    if distance_km == 0.0 {
        return Err(RoutingError::DegenerateRoute);
    }

    let midpoint = request.source.midpoint(&request.destination);
    let crowd_level = crowd_level_near(store, midpoint);
    debug!(
        distance_km,
        ?crowd_level,
        avoid_crowds = request.avoid_crowds,
        "Scoring route"
    );

    let base_time_minutes = distance_km / WALKING_SPEED_KMH * 60.0;

    let primary = RouteCandidate {
        route_id: RouteId::new(),
        distance_km: round2(distance_km),
        estimated_time_minutes: whole_minutes(base_time_minutes * time_multiplier(crowd_level)),
        crowd_level,
        safety_score: safety_score(
            crowd_level,
            PRIMARY_PATH_WIDTH_M,
            request.accessibility_required,
        ),
        path_width_m: PRIMARY_PATH_WIDTH_M,
        description: String::from("Direct route via main pathway"),
    };

    let mut routes = vec![primary];

    if request.avoid_crowds && crowd_level >= CrowdLevel::High {
        let detour = RouteCandidate {
            route_id: RouteId::new(),
            distance_km: round2(distance_km * 1.2),
            estimated_time_minutes: whole_minutes(base_time_minutes * 1.3),
            crowd_level: CrowdLevel::Medium,
            safety_score: safety_score(
                CrowdLevel::Medium,
                ALTERNATIVE_PATH_WIDTH_M,
                request.accessibility_required,
            ),
            path_width_m: ALTERNATIVE_PATH_WIDTH_M,
            description: String::from("Alternative route avoiding crowded areas"),
        };
        routes.push(detour);
    }

    // The safer candidate wins; an exact tie keeps the direct route.
    let recommended_route_id = routes
        .iter()
        .max_by(|a, b| a.safety_score.total_cmp(&b.safety_score))
        .map_or_else(RouteId::new, |c| c.route_id);

    let alternative_count = routes.len().saturating_sub(1);
    Ok(RouteResult {
        routes,
        recommended_route_id,
        alternative_count,
    })
}

/// Crowd level near a point: the level of the nearest zone whose centre
/// lies within [`ZONE_INFLUENCE_KM`], or [`CrowdLevel::Low`] if no zone
/// is that close.
fn crowd_level_near(store: &ZoneStateStore, point: Coordinate) -> CrowdLevel {
    let mut nearest: Option<(f64, CrowdLevel)> = None;
    for zone in store.zones() {
        let d = haversine_km(point, zone.center);
        if d <= ZONE_INFLUENCE_KM
            && nearest.is_none_or(|(best, _)| d < best)
        {
            nearest = Some((
                d,
                CrowdLevel::from_occupancy(zone.current_occupancy, zone.capacity),
            ));
        }
    }
    nearest.map_or(CrowdLevel::Low, |(_, level)| level)
}

/// Travel-time multiplier for a crowd level.
const fn time_multiplier(level: CrowdLevel) -> f64 {
    match level {
        CrowdLevel::Low => 1.0,
        CrowdLevel::Medium => 1.2,
        CrowdLevel::High => 1.5,
        CrowdLevel::Critical => 2.0,
    }
}

/// Safety score in `[0, 10]` for a candidate.
///
/// Starts at 10, loses points for crowding and narrow paths, gains a
/// point for generously wide paths and half a point when the path meets
/// accessibility needs.
fn safety_score(level: CrowdLevel, path_width_m: f64, accessibility: bool) -> f64 {
    let mut score = 10.0_f64;
    score -= match level {
        CrowdLevel::Low => 0.0,
        CrowdLevel::Medium => 1.0,
        CrowdLevel::High => 3.0,
        CrowdLevel::Critical => 5.0,
    };
    if path_width_m < 4.0 {
        score -= 2.0;
    } else if path_width_m > 8.0 {
        score += 1.0;
    }
    if accessibility {
        score += 0.5;
    }
    score.clamp(0.0, 10.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round a positive float duration to whole minutes.
fn whole_minutes(minutes: f64) -> u32 {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is clamped non-negative and rounded before truncation"
    )]
    let whole = minutes.max(0.0).round() as u32;
    whole
}
