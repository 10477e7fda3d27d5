//! Geographic primitives.
//!
//! A [`Coordinate`] is a validated WGS-84 latitude/longitude pair. The
//! constructor is the only way to build one from untrusted input, so any
//! `Coordinate` held elsewhere in the workspace is known to be in range.

use serde::{Deserialize, Serialize};

/// A raw coordinate could not be validated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    /// Latitude outside [-90, 90] degrees.
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude outside [-180, 180] degrees.
    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A validated WGS-84 coordinate.
///
/// Serializes as `{"lat": .., "lon": ..}`. Deserialization goes through
/// the same range checks as [`Coordinate::new`], so malformed wire input
/// is rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    /// Latitude in degrees, always in [-90, 90].
    lat: f64,
    /// Longitude in degrees, always in [-180, 180].
    lon: f64,
}

/// Unvalidated mirror of [`Coordinate`] used during deserialization.
#[derive(Debug, Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lon)
    }
}

impl Coordinate {
    /// Validate and construct a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] if either component is out of range
    /// (NaN fails both comparisons and is rejected).
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Latitude in degrees.
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub const fn lon(&self) -> f64 {
        self.lon
    }

    /// The arithmetic midpoint of two coordinates.
    ///
    /// A planar average, which is accurate enough at the few-kilometre
    /// scale of a gathering site. Both inputs are validated, so the
    /// average is too.
    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            lat: (self.lat + other.lat) / 2.0,
            lon: (self.lon + other.lon) / 2.0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_in_range_values() {
        assert!(Coordinate::new(23.1827, 75.7687).is_ok());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert_eq!(
            Coordinate::new(91.0, 0.0),
            Err(CoordinateError::LatitudeOutOfRange(91.0))
        );
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert_eq!(
            Coordinate::new(0.0, -181.0),
            Err(CoordinateError::LongitudeOutOfRange(-181.0))
        );
    }

    #[test]
    fn rejects_nan() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<Coordinate, _> = serde_json::from_str(r#"{"lat": 23.18, "lon": 75.77}"#);
        assert!(ok.is_ok());

        let bad: Result<Coordinate, _> = serde_json::from_str(r#"{"lat": 123.0, "lon": 75.77}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn midpoint_is_componentwise_average() {
        let a = Coordinate::new(10.0, 20.0).unwrap();
        let b = Coordinate::new(20.0, 40.0).unwrap();
        let mid = a.midpoint(&b);
        assert!((mid.lat() - 15.0).abs() < f64::EPSILON);
        assert!((mid.lon() - 30.0).abs() < f64::EPSILON);
    }
}
