//! Crowd movement simulation for the Mela platform.
//!
//! Generates realistic occupancy drift for every zone on a fixed tick:
//! time-of-day patterns per zone category, plus per-tick jitter, all
//! recorded through the zone store's single mutation path.
//!
//! # Modules
//!
//! - [`config`] -- Loop tuning (seed, tick interval)
//! - [`patterns`] -- Time-of-day drift ranges per zone category
//! - [`tick`] -- One tick over the whole store
//! - [`runner`] -- The spawned loop task and its publish sink

pub mod config;
pub mod patterns;
pub mod runner;
pub mod tick;

pub use config::SimConfig;
pub use runner::{UpdateSink, spawn_simulation};
pub use tick::{TickReport, run_tick};
