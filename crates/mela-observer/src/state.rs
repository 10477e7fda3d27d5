//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the shared zone store and the broadcast hub. REST
//! handlers read the store under a read lock; the `WebSocket` handler
//! registers with the hub, which owns the simulation lifecycle.

use std::sync::Arc;

use mela_sim::SimConfig;
use mela_zones::ZoneStateStore;
use tokio::sync::RwLock;

use crate::hub::BroadcastHub;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The live zone crowd state, shared with the simulation loop.
    pub store: Arc<RwLock<ZoneStateStore>>,
    /// Observer registry and simulation lifecycle owner.
    pub hub: Arc<BroadcastHub>,
}

impl AppState {
    /// Build application state around an already-seeded store.
    pub fn new(store: ZoneStateStore, config: SimConfig) -> Self {
        let store = Arc::new(RwLock::new(store));
        let hub = Arc::new(BroadcastHub::new(Arc::clone(&store), config));
        Self { store, hub }
    }
}
