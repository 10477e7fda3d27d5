//! The simulation loop task.
//!
//! [`spawn_simulation`] runs ticks on a fixed interval until its shutdown
//! signal fires, publishing each tick's deltas through an [`UpdateSink`].
//! The loop owns nothing but a handle to the shared store and its RNG;
//! who starts and stops it (the broadcast hub, on first connect and last
//! disconnect) is none of its business.

use std::sync::Arc;

use chrono::Timelike;
use mela_types::CrowdUpdate;
use mela_zones::ZoneStateStore;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::tick;

/// Where the simulation loop publishes each tick's deltas.
pub trait UpdateSink: Send + Sync + 'static {
    /// Deliver one tick's worth of zone deltas.
    fn publish(&self, updates: Vec<CrowdUpdate>) -> impl Future<Output = ()> + Send;
}

/// Spawn the simulation loop on the current runtime.
///
/// The first tick fires immediately, so an observer who triggered the
/// start sees data within one interval of connecting. The loop exits
/// when `shutdown` flips to `true` or its sender is dropped.
pub fn spawn_simulation<S: UpdateSink>(
    store: Arc<RwLock<ZoneStateStore>>,
    config: SimConfig,
    sink: S,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut interval = tokio::time::interval(config.tick_interval());
        info!(
            seed = config.seed,
            tick_interval_ms = config.tick_interval_ms,
            "Simulation loop started"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let hour = chrono::Local::now().hour();
                    let mut report = {
                        let mut store = store.write().await;
                        tick::run_tick(&mut store, hour, &mut rng)
                    };
                    debug!(
                        zones = report.updates.len(),
                        failed = report.failed_zones,
                        "Simulation tick complete"
                    );
                    // Zones that did not move are not worth a frame.
                    report.updates.retain(|u| u.change_from_previous != 0);
                    if !report.updates.is_empty() {
                        sink.publish(report.updates).await;
                    }
                }
                changed = shutdown.changed() => {
                    let stop = changed.is_err() || *shutdown.borrow();
                    if stop {
                        info!("Simulation loop stopped");
                        return;
                    }
                }
            }
        }
    })
}
