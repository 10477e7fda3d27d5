//! The broadcast hub: observer registry and simulation lifecycle.
//!
//! The hub owns the set of connected `WebSocket` observers and fans each
//! tick's deltas out to all of them. It also owns the simulation loop's
//! lifecycle: the loop starts when the first observer connects and stops
//! when the last one disconnects, so no observers means no tick work.
//!
//! Delivery is per-observer over a bounded channel and never waits: an
//! observer whose channel is full is dropped from the registry rather
//! than allowed to stall the tick that produced the delta. All registry
//! mutation happens under one mutex, so two near-simultaneous connects
//! can never race the loop into starting twice.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Weak};

use chrono::{DateTime, Utc};
use mela_sim::{SimConfig, UpdateSink, spawn_simulation};
use mela_types::{CrowdUpdate, ObserverId};
use mela_zones::ZoneStateStore;
use serde::Serialize;
use tokio::sync::{RwLock, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Per-observer outbound queue depth. An observer this far behind the
/// tick stream is considered dead and is disconnected.
const OBSERVER_CHANNEL_CAPACITY: usize = 64;

/// The envelope wrapping each batch of deltas on the wire.
#[derive(Debug, Serialize)]
pub struct UpdateEnvelope<'a> {
    /// Message discriminator, always `"crowd_update"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// The batch payload.
    pub data: UpdateBatch<'a>,
    /// When the envelope was built.
    pub timestamp: DateTime<Utc>,
}

/// The payload of an [`UpdateEnvelope`].
#[derive(Debug, Serialize)]
pub struct UpdateBatch<'a> {
    /// One delta per zone that changed this tick.
    pub updates: &'a [CrowdUpdate],
}

/// Simulation loop state, owned by the hub.
enum LoopState {
    /// No loop task exists.
    Stopped,
    /// A loop task is running and can be told to stop.
    Running {
        shutdown: watch::Sender<bool>,
        handle: JoinHandle<()>,
    },
}

struct HubInner {
    observers: BTreeMap<ObserverId, mpsc::Sender<String>>,
    next_observer: u64,
    loop_state: LoopState,
}

/// Observer registry plus simulation lifecycle owner.
pub struct BroadcastHub {
    inner: Mutex<HubInner>,
    store: Arc<RwLock<ZoneStateStore>>,
    config: SimConfig,
}

/// Sink handed to the simulation loop. Holds the hub weakly so the task
/// never keeps the hub alive on its own.
struct HubSink(Weak<BroadcastHub>);

impl UpdateSink for HubSink {
    async fn publish(&self, updates: Vec<CrowdUpdate>) {
        if let Some(hub) = self.0.upgrade() {
            hub.broadcast(&updates);
        }
    }
}

impl BroadcastHub {
    /// Create a hub over the shared store with the given loop tuning.
    pub fn new(store: Arc<RwLock<ZoneStateStore>>, config: SimConfig) -> Self {
        Self {
            inner: Mutex::new(HubInner {
                observers: BTreeMap::new(),
                next_observer: 0,
                loop_state: LoopState::Stopped,
            }),
            store,
            config,
        }
    }

    /// Register a new observer.
    ///
    /// Returns the observer's ID and the receiving end of its outbound
    /// queue. If this is the first observer, the simulation loop is
    /// started before the registry lock is released, so a second
    /// concurrent connect cannot start it again.
    pub fn connect(self: &Arc<Self>) -> (ObserverId, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(OBSERVER_CHANNEL_CAPACITY);

        let mut inner = self.lock_inner();
        let id = ObserverId::from(inner.next_observer);
        inner.next_observer = inner.next_observer.saturating_add(1);
        inner.observers.insert(id, tx);

        if inner.observers.len() == 1 {
            self.start_loop(&mut inner);
        }
        info!(observer = %id, observers = inner.observers.len(), "Observer connected");

        (id, rx)
    }

    /// Remove an observer.
    ///
    /// If it was the last one, the simulation loop is signalled to stop.
    /// Disconnecting an already-removed observer is a no-op.
    pub fn disconnect(&self, id: ObserverId) {
        let mut inner = self.lock_inner();
        if inner.observers.remove(&id).is_none() {
            return;
        }
        info!(observer = %id, observers = inner.observers.len(), "Observer disconnected");
        if inner.observers.is_empty() {
            Self::stop_loop(&mut inner);
        }
    }

    /// Fan a batch of deltas out to every connected observer.
    ///
    /// Serialization happens once; delivery uses `try_send`, so a full
    /// queue never blocks the caller. Observers whose queue is full or
    /// closed are disconnected, and if that empties the registry the
    /// simulation loop is stopped.
    pub fn broadcast(&self, updates: &[CrowdUpdate]) {
        let envelope = UpdateEnvelope {
            kind: "crowd_update",
            data: UpdateBatch { updates },
            timestamp: Utc::now(),
        };
        let message = match serde_json::to_string(&envelope) {
            Ok(json) => json,
            Err(error) => {
                warn!(%error, "Failed to serialize update envelope");
                return;
            }
        };

        let mut inner = self.lock_inner();
        let mut dead = Vec::new();
        for (id, tx) in &inner.observers {
            if let Err(error) = tx.try_send(message.clone()) {
                debug!(observer = %id, %error, "Dropping unresponsive observer");
                dead.push(*id);
            }
        }
        for id in dead {
            inner.observers.remove(&id);
        }
        if inner.observers.is_empty() {
            Self::stop_loop(&mut inner);
        }
    }

    /// Unicast a message to one observer, used for keep-alive replies.
    ///
    /// Goes through the same queue as broadcasts, so per-observer
    /// ordering between broadcast and direct sends is preserved. A full
    /// or closed queue disconnects the observer, same as on fan-out.
    pub fn send_direct(&self, id: ObserverId, message: String) {
        let mut inner = self.lock_inner();
        let Some(tx) = inner.observers.get(&id) else {
            return;
        };
        if let Err(error) = tx.try_send(message) {
            debug!(observer = %id, %error, "Dropping unresponsive observer");
            inner.observers.remove(&id);
            if inner.observers.is_empty() {
                Self::stop_loop(&mut inner);
            }
        }
    }

    /// Number of currently connected observers.
    pub fn observer_count(&self) -> usize {
        self.lock_inner().observers.len()
    }

    /// Whether the simulation loop task is currently running.
    pub fn is_simulation_running(&self) -> bool {
        matches!(self.lock_inner().loop_state, LoopState::Running { .. })
    }

    fn start_loop(self: &Arc<Self>, inner: &mut HubInner) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = spawn_simulation(
            Arc::clone(&self.store),
            self.config.clone(),
            HubSink(Arc::downgrade(self)),
            shutdown_rx,
        );
        inner.loop_state = LoopState::Running {
            shutdown: shutdown_tx,
            handle,
        };
    }

    fn stop_loop(inner: &mut HubInner) {
        if let LoopState::Running { shutdown, handle } =
            std::mem::replace(&mut inner.loop_state, LoopState::Stopped)
        {
            // The loop exits on the signal; the handle detaches.
            if shutdown.send(true).is_err() {
                handle.abort();
            }
        }
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, HubInner> {
        // Registry mutation never panics, so poisoning cannot occur in
        // practice; recover the guard rather than propagate.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use mela_types::{Coordinate, CrowdLevel, Zone, ZoneId, ZoneType};

    use super::*;

    fn seeded_store() -> Arc<RwLock<ZoneStateStore>> {
        let mut store = ZoneStateStore::new();
        store
            .register_zone(Zone {
                id: ZoneId::new(),
                name: String::from("Ram Ghat"),
                zone_type: ZoneType::Ghat,
                center: Coordinate::new(23.1790, 75.7650).unwrap(),
                capacity: 15_000,
                current_occupancy: 12_000,
                description: None,
                created_at: Utc::now(),
            })
            .unwrap();
        Arc::new(RwLock::new(store))
    }

    fn hub_with_interval(tick_interval_ms: u64) -> Arc<BroadcastHub> {
        Arc::new(BroadcastHub::new(
            seeded_store(),
            SimConfig {
                seed: 42,
                tick_interval_ms,
            },
        ))
    }

    fn sample_update() -> CrowdUpdate {
        CrowdUpdate {
            zone_id: ZoneId::new(),
            zone_name: String::from("Ram Ghat"),
            occupancy: 12_000,
            capacity: 15_000,
            crowd_level: CrowdLevel::High,
            timestamp: Utc::now(),
            change_from_previous: 150,
        }
    }

    #[tokio::test]
    async fn loop_runs_iff_observers_exist() {
        let hub = hub_with_interval(10);
        assert!(!hub.is_simulation_running());

        let (first, _rx1) = hub.connect();
        assert!(hub.is_simulation_running());

        let (second, _rx2) = hub.connect();
        assert!(hub.is_simulation_running());

        hub.disconnect(first);
        assert!(hub.is_simulation_running());

        hub.disconnect(second);
        assert!(!hub.is_simulation_running());
    }

    #[tokio::test]
    async fn reconnect_restarts_the_loop() {
        let hub = hub_with_interval(10);

        let (id, _rx) = hub.connect();
        hub.disconnect(id);
        assert!(!hub.is_simulation_running());

        let (_id2, _rx2) = hub.connect();
        assert!(hub.is_simulation_running());
    }

    #[tokio::test]
    async fn duplicate_disconnect_is_a_noop() {
        let hub = hub_with_interval(10);
        let (first, _rx1) = hub.connect();
        let (_second, _rx2) = hub.connect();

        hub.disconnect(first);
        hub.disconnect(first);
        // The second observer must still hold the loop open.
        assert!(hub.is_simulation_running());
        assert_eq!(hub.observer_count(), 1);
    }

    #[tokio::test]
    async fn connected_observer_receives_ticks() {
        let hub = hub_with_interval(10);
        let (_id, mut rx) = hub.connect();

        let message = tokio::time::timeout(std::time::Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&message).unwrap();
        assert_eq!(value.get("type").unwrap(), "crowd_update");
        let updates = value
            .get("data")
            .unwrap()
            .get("updates")
            .unwrap()
            .as_array()
            .unwrap();
        assert_eq!(updates.len(), 1);
        assert!(value.get("timestamp").is_some());
    }

    #[tokio::test]
    async fn broadcast_reaches_every_observer() {
        // Long interval: only the explicit broadcast arrives promptly.
        let hub = hub_with_interval(60_000);
        let (_a, mut rx_a) = hub.connect();
        let (_b, mut rx_b) = hub.connect();

        // The loop's immediate first tick may already be queued; drain
        // anything present, then broadcast and check both receivers.
        hub.broadcast(&[sample_update()]);

        for rx in [&mut rx_a, &mut rx_b] {
            let message = tokio::time::timeout(std::time::Duration::from_secs(2), rx.recv())
                .await
                .unwrap()
                .unwrap();
            assert!(message.contains("crowd_update"));
        }
    }

    #[tokio::test]
    async fn slow_observer_is_dropped_without_blocking() {
        let hub = hub_with_interval(60_000);
        let (slow, _rx_kept_but_never_read) = hub.connect();
        let (_live, mut rx_live) = hub.connect();

        // Overflow the slow observer's queue while the live one drains.
        let updates = [sample_update()];
        for _ in 0..=OBSERVER_CHANNEL_CAPACITY {
            hub.broadcast(&updates);
            while rx_live.try_recv().is_ok() {}
        }

        assert_eq!(hub.observer_count(), 1);
        assert!(hub.is_simulation_running());

        // The live observer still gets messages.
        hub.broadcast(&updates);
        assert!(rx_live.recv().await.is_some());
        // And the dropped one no longer counts for lifecycle purposes.
        hub.disconnect(slow);
        assert_eq!(hub.observer_count(), 1);
    }

    #[tokio::test]
    async fn dropping_every_observer_via_broadcast_stops_the_loop() {
        let hub = hub_with_interval(60_000);
        let (_only, rx) = hub.connect();
        drop(rx);

        // The closed channel is detected on the next fan-out.
        hub.broadcast(&[sample_update()]);
        assert_eq!(hub.observer_count(), 0);
        assert!(!hub.is_simulation_running());
    }

    #[tokio::test]
    async fn direct_sends_preserve_order_with_broadcasts() {
        let hub = hub_with_interval(60_000);
        let (id, mut rx) = hub.connect();

        hub.broadcast(&[sample_update()]);
        hub.send_direct(id, String::from(r#"{"type":"pong"}"#));

        // The loop's immediate first tick may precede the explicit
        // broadcast; everything before the pong must be a crowd update.
        let mut seen_updates = 0_u32;
        loop {
            let message = rx.recv().await.unwrap();
            if message.contains("pong") {
                break;
            }
            assert!(message.contains("crowd_update"));
            seen_updates += 1;
        }
        assert!(seen_updates >= 1);
    }

    #[tokio::test]
    async fn direct_send_to_unknown_observer_is_a_noop() {
        let hub = hub_with_interval(60_000);
        let (_id, _rx) = hub.connect();
        hub.send_direct(ObserverId::from(999), String::from("x"));
        assert_eq!(hub.observer_count(), 1);
    }

    #[tokio::test]
    async fn observer_ids_are_never_reused() {
        let hub = hub_with_interval(60_000);
        let (first, _rx1) = hub.connect();
        hub.disconnect(first);
        let (second, _rx2) = hub.connect();
        assert!(second > first);
    }
}
