//! Error types for the `mela-routing` crate.

use mela_types::CoordinateError;

/// Errors that can occur while scoring routes.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// A request carried a latitude or longitude outside the WGS-84 range.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordinateError),

    /// Start and end resolve to the same point; there is nothing to route.
    #[error("start and end coordinates are identical")]
    DegenerateRoute,
}
