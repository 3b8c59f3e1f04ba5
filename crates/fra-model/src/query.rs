//! Analysis queries and deduplication keys
//!
//! A query is a centre coordinate plus a search radius in kilometres.
//! Its [`QueryKey`] is a pure function of those three numbers, so two
//! requests for the same place share a key no matter when they were issued.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Radius applied when a caller does not supply one (km)
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// WGS84 coordinate pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude, -90..=90
    pub lat: f64,
    /// Longitude, -180..=180
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinate pair
    #[inline]
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Check both components are finite and inside WGS84 bounds
    pub fn validate(&self) -> Result<(), QueryError> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(QueryError::NonFiniteCoordinate);
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(QueryError::LatitudeOutOfRange(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(QueryError::LongitudeOutOfRange(self.lng));
        }
        Ok(())
    }

    /// Great-circle distance to `other` in kilometres (haversine)
    #[must_use]
    pub fn haversine_km(&self, other: &Coordinates) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Request for a land-asset analysis around a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisQuery {
    /// Centre of the search area
    pub coordinates: Coordinates,
    /// Search radius in kilometres
    #[serde(default = "default_radius")]
    pub radius_km: f64,
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS_KM
}

impl AnalysisQuery {
    /// Create query with the default radius
    #[inline]
    #[must_use]
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            radius_km: DEFAULT_RADIUS_KM,
        }
    }

    /// With explicit search radius
    #[inline]
    #[must_use]
    pub fn with_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    /// Reject malformed coordinates and non-positive radii
    pub fn validate(&self) -> Result<(), QueryError> {
        self.coordinates.validate()?;
        if !self.radius_km.is_finite() {
            return Err(QueryError::NonPositiveRadius(self.radius_km));
        }
        if self.radius_km <= 0.0 {
            return Err(QueryError::NonPositiveRadius(self.radius_km));
        }
        Ok(())
    }

    /// Deduplication key for this query
    #[inline]
    #[must_use]
    pub fn key(&self) -> QueryKey {
        QueryKey::from_query(self)
    }
}

/// Stable identity of a query, derived from `(lat, lng, radius_km)` only
///
/// Components are stored as IEEE-754 bit patterns so the key is `Eq + Hash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    lat_bits: u64,
    lng_bits: u64,
    radius_bits: u64,
}

impl QueryKey {
    /// Derive key from query fields
    #[must_use]
    pub fn from_query(query: &AnalysisQuery) -> Self {
        Self {
            lat_bits: canonical_bits(query.coordinates.lat),
            lng_bits: canonical_bits(query.coordinates.lng),
            radius_bits: canonical_bits(query.radius_km),
        }
    }

    /// Latitude component
    #[inline]
    #[must_use]
    pub fn lat(&self) -> f64 {
        f64::from_bits(self.lat_bits)
    }

    /// Longitude component
    #[inline]
    #[must_use]
    pub fn lng(&self) -> f64 {
        f64::from_bits(self.lng_bits)
    }

    /// Radius component
    #[inline]
    #[must_use]
    pub fn radius_km(&self) -> f64 {
        f64::from_bits(self.radius_bits)
    }
}

// -0.0 and 0.0 compare equal, so they must hash equal too
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.lat(), self.lng(), self.radius_km())
    }
}

/// Query validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// Latitude outside -90..=90
    #[error("latitude out of range: {0}")]
    LatitudeOutOfRange(f64),

    /// Longitude outside -180..=180
    #[error("longitude out of range: {0}")]
    LongitudeOutOfRange(f64),

    /// NaN or infinite coordinate component
    #[error("coordinate is not a finite number")]
    NonFiniteCoordinate,

    /// Radius is zero, negative or not finite
    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f64),
}
