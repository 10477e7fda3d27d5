//! Entry point for the Mela crowd management platform.
//!
//! Seeds the zone directory for the Ujjain gathering grounds, wires the
//! shared store and broadcast hub, and serves the observer API. The
//! simulation loop itself is owned by the hub and only runs while at
//! least one `WebSocket` observer is connected.

mod config;
mod error;
mod seed;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use mela_observer::{AppState, start_server};

use crate::config::EngineConfig;
use crate::error::EngineError;

/// Application entry point.
///
/// Initializes logging, loads configuration, seeds the zone directory,
/// then serves the observer API until the process is terminated.
///
/// # Errors
///
/// Returns an error if configuration, seeding, or serving fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("mela-engine starting");

    let config = EngineConfig::load()?;
    info!(
        host = config.server.host,
        port = config.server.port,
        seed = config.simulation.seed,
        tick_interval_ms = config.simulation.tick_interval_ms,
        "configuration loaded"
    );

    let store = seed::seeded_store()?;
    info!(zones = store.zone_count(), "zone directory seeded");

    let state = Arc::new(AppState::new(store, config.simulation));

    start_server(&config.server, state).await?;

    Ok(())
}
