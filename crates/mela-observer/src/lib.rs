//! Observer API server for the Mela crowd management platform.
//!
//! Serves the live crowd picture over REST and streams per-tick deltas
//! over `WebSocket`. The broadcast hub ties the simulation loop's
//! lifetime to the observer count: the loop runs exactly while someone
//! is watching.
//!
//! # Modules
//!
//! - [`hub`] -- Observer registry, fan-out, simulation lifecycle
//! - [`state`] -- Shared Axum application state
//! - [`ws`] -- `WebSocket` streaming handler
//! - [`handlers`] -- REST endpoint handlers
//! - [`router`] -- Route table and middleware
//! - [`server`] -- TCP bind and serve
//! - [`error`] -- API error responses

pub mod error;
pub mod handlers;
pub mod hub;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

pub use error::ObserverError;
pub use hub::BroadcastHub;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
