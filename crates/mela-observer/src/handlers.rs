//! REST API endpoint handlers for the Observer server.
//!
//! All handlers read the shared [`ZoneStateStore`](mela_zones::ZoneStateStore)
//! under a read lock via [`AppState`]; none of them mutate zone state.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/zones` | List zones, optionally by category |
//! | `GET` | `/api/zones/:id` | Single zone directory entry |
//! | `GET` | `/api/zones/:id/status` | Derived status for one zone |
//! | `GET` | `/api/zones/status/all` | Derived status for every zone |
//! | `GET` | `/api/zones/:id/history` | Recent samples for one zone |
//! | `GET` | `/api/crowd-status` | Site-wide overview |
//! | `POST` | `/api/routes` | Score routes between two points |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse};
use mela_routing::{RouteRequest, RouteResult, score_routes};
use mela_types::{CrowdSample, Zone, ZoneId, ZoneStatus, ZoneType};
use mela_zones::CrowdOverview;
use uuid::Uuid;

use crate::error::ObserverError;
use crate::state::AppState;

/// Default number of history samples returned when no limit is given.
const DEFAULT_HISTORY_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the `GET /api/zones` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct ZonesQuery {
    /// Filter zones by category (`temple`, `ghat`, ...).
    pub zone_type: Option<ZoneType>,
}

/// Query parameters for the `GET /api/zones/:id/history` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of samples to return (default 100).
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing server status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let zone_count = state.store.read().await.zone_count();
    let observers = state.hub.observer_count();
    let simulation = if state.hub.is_simulation_running() {
        "RUNNING"
    } else {
        "IDLE"
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Mela Crowd Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Mela Crowd Observer</h1>
    <p class="subtitle">Live crowd monitoring for the gathering grounds</p>

    <p>Simulation: <span class="status">{simulation}</span></p>

    <div>
        <div class="metric">
            <div class="label">Zones</div>
            <div class="value">{zone_count}</div>
        </div>
        <div class="metric">
            <div class="label">Observers</div>
            <div class="value">{observers}</div>
        </div>
    </div>

    <hr>
    <h2>API</h2>
    <ul>
        <li>GET <a href="/api/zones">/api/zones</a></li>
        <li>GET /api/zones/:id</li>
        <li>GET /api/zones/:id/status</li>
        <li>GET <a href="/api/zones/status/all">/api/zones/status/all</a></li>
        <li>GET /api/zones/:id/history</li>
        <li>GET <a href="/api/crowd-status">/api/crowd-status</a></li>
        <li>POST /api/routes</li>
        <li>WS /ws/crowd-updates</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// Zone directory
// ---------------------------------------------------------------------------

/// List all zones, optionally filtered by category.
///
/// # Route
///
/// `GET /api/zones?zone_type=temple`
pub async fn list_zones(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ZonesQuery>,
) -> Json<Vec<Zone>> {
    let store = state.store.read().await;
    let zones = store
        .zones()
        .filter(|z| query.zone_type.is_none_or(|t| z.zone_type == t))
        .cloned()
        .collect();
    Json(zones)
}

/// Get a single zone directory entry.
///
/// # Route
///
/// `GET /api/zones/:id`
pub async fn get_zone(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Zone>, ObserverError> {
    let zone_id = ZoneId::from(id);
    let store = state.store.read().await;
    store
        .zone(zone_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ObserverError::NotFound(format!("zone {zone_id} not found")))
}

// ---------------------------------------------------------------------------
// Derived status
// ---------------------------------------------------------------------------

/// Get the derived status for one zone.
///
/// # Route
///
/// `GET /api/zones/:id/status`
pub async fn get_zone_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ZoneStatus>, ObserverError> {
    let store = state.store.read().await;
    let status = store.zone_status(ZoneId::from(id))?;
    Ok(Json(status))
}

/// Get the derived status for every zone.
///
/// # Route
///
/// `GET /api/zones/status/all`
pub async fn all_zone_statuses(State(state): State<Arc<AppState>>) -> Json<Vec<ZoneStatus>> {
    let store = state.store.read().await;
    Json(store.all_zone_statuses())
}

/// Get recent crowd samples for one zone, most recent first.
///
/// # Route
///
/// `GET /api/zones/:id/history?limit=50`
pub async fn get_zone_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<CrowdSample>>, ObserverError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let store = state.store.read().await;
    let samples = store.history(ZoneId::from(id), limit)?;
    Ok(Json(samples))
}

/// Get the site-wide crowd overview.
///
/// # Route
///
/// `GET /api/crowd-status`
pub async fn crowd_status(State(state): State<Arc<AppState>>) -> Json<CrowdOverview> {
    let store = state.store.read().await;
    Json(mela_zones::crowd_overview(&store))
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Score walking routes between two points against the live crowd state.
///
/// # Route
///
/// `POST /api/routes`
pub async fn post_routes(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResult>, ObserverError> {
    let store = state.store.read().await;
    let result = score_routes(&store, &request)?;
    Ok(Json(result))
}
