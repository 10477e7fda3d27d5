//! Crowd-aware route scoring for the Mela platform.
//!
//! Scores walking routes between points on the grounds against the live
//! crowd picture held by `mela-zones`. Purely synchronous; the observer
//! layer calls it under a read lock.
//!
//! # Modules
//!
//! - [`scorer`] -- Haversine distance and candidate scoring
//! - [`error`] -- Crate error type

pub mod error;
pub mod scorer;

pub use error::RoutingError;
pub use scorer::{RouteCandidate, RouteRequest, RouteResult, haversine_km, score_routes};
