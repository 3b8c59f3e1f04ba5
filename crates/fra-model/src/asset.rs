//! Detected land assets
//!
//! Each asset carries a closed square boundary ring centred on its
//! coordinate, sized by the square root of its area.

use crate::query::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Degrees of boundary side per square-root hectare
const BOUNDARY_DEGREES_PER_SQRT_HA: f64 = 0.01;

/// Unique asset identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(pub Ulid);

impl AssetId {
    /// Generate new asset ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "asset_{}", self.0)
    }
}

/// Land-cover classification of a detected asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandAssetType {
    /// Cultivated fields
    Agricultural,
    /// Tree-covered land
    Forest,
    /// Pond, lake, stream
    WaterBody,
    /// Dwelling and its immediate surroundings
    Homestead,
    /// Unvegetated land
    Barren,
    /// Pasture and open grass
    Grassland,
}

impl LandAssetType {
    /// Every category, in detector draw order
    pub const ALL: [LandAssetType; 6] = [
        LandAssetType::Agricultural,
        LandAssetType::Forest,
        LandAssetType::WaterBody,
        LandAssetType::Homestead,
        LandAssetType::Barren,
        LandAssetType::Grassland,
    ];

    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LandAssetType::Agricultural => "agricultural",
            LandAssetType::Forest => "forest",
            LandAssetType::WaterBody => "water_body",
            LandAssetType::Homestead => "homestead",
            LandAssetType::Barren => "barren",
            LandAssetType::Grassland => "grassland",
        }
    }
}

impl fmt::Display for LandAssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detection provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    /// When the asset was detected
    pub detected_at: DateTime<Utc>,
    /// Classifier version
    pub model_version: String,
    /// Imagery source
    pub source: String,
    /// Ground resolution of the imagery
    pub resolution: String,
}

/// A classified patch of land near the query centre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandAsset {
    /// Asset identifier
    pub id: AssetId,
    /// Land-cover class
    #[serde(rename = "type")]
    pub asset_type: LandAssetType,
    /// Centre of the asset
    pub coordinates: Coordinates,
    /// Area in hectares, always > 0
    #[serde(rename = "area")]
    pub area_ha: f64,
    /// Classifier confidence, 0.0 - 1.0
    pub confidence: f64,
    /// Closed ring, first point == last point
    pub boundary: Vec<Coordinates>,
    /// Provenance
    pub metadata: AssetMetadata,
}

impl LandAsset {
    /// Axis-aligned square ring centred on `center`, side proportional to `sqrt(area_ha)`
    #[must_use]
    pub fn square_boundary(center: Coordinates, area_ha: f64) -> Vec<Coordinates> {
        let half = area_ha.max(0.0).sqrt() * BOUNDARY_DEGREES_PER_SQRT_HA / 2.0;

        vec![
            Coordinates::new(center.lat - half, center.lng - half),
            Coordinates::new(center.lat + half, center.lng - half),
            Coordinates::new(center.lat + half, center.lng + half),
            Coordinates::new(center.lat - half, center.lng + half),
            Coordinates::new(center.lat - half, center.lng - half),
        ]
    }

    /// Boundary has at least four points and closes on itself
    #[must_use]
    pub fn has_closed_boundary(&self) -> bool {
        self.boundary.len() >= 4 && self.boundary.first() == self.boundary.last()
    }

    /// Check this asset is of the given class
    #[inline]
    #[must_use]
    pub fn is(&self, asset_type: LandAssetType) -> bool {
        self.asset_type == asset_type
    }
}
