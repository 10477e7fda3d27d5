//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/crowd-updates` -- `WebSocket` crowd update stream
/// - `GET /api/zones` -- list zones
/// - `GET /api/zones/:id` -- single zone
/// - `GET /api/zones/:id/status` -- derived status for one zone
/// - `GET /api/zones/status/all` -- derived status for every zone
/// - `GET /api/zones/:id/history` -- recent samples
/// - `GET /api/crowd-status` -- site-wide overview
/// - `POST /api/routes` -- score routes
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/crowd-updates", get(ws::ws_crowd_updates))
        // REST API
        .route("/api/zones", get(handlers::list_zones))
        .route("/api/zones/status/all", get(handlers::all_zone_statuses))
        .route("/api/zones/{id}", get(handlers::get_zone))
        .route("/api/zones/{id}/status", get(handlers::get_zone_status))
        .route("/api/zones/{id}/history", get(handlers::get_zone_history))
        .route("/api/crowd-status", get(handlers::crowd_status))
        .route("/api/routes", post(handlers::post_routes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
