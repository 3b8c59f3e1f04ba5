//! Land-asset detection
//!
//! Places 3-8 assets around the query centre using polar placement: asset
//! `i` of `n` sits at angle `2πi/n + jitter` and a distance drawn from
//! `[0, 0.8·radius)`. Kilometre offsets become degrees with the small-angle
//! conversion (111 km per degree, longitude scaled by `cos(lat)`).

use crate::error::{Stage, StageError};
use crate::random::{pick, RandomSource};
use chrono::Utc;
use fra_model::{AssetId, AssetMetadata, Coordinates, LandAsset, LandAssetType, KM_PER_DEGREE};
use std::f64::consts::TAU;
use std::sync::Arc;

/// Fewest assets per detection
pub const MIN_ASSETS: usize = 3;
/// Most assets per detection
pub const MAX_ASSETS: usize = 8;
/// Assets are placed within this fraction of the radius
pub const PLACEMENT_FRACTION: f64 = 0.8;
/// Upper bound of the angular jitter, radians
const ANGLE_JITTER: f64 = 0.5;
/// Keeps the longitude scale finite at the poles
const MIN_LAT_COS: f64 = 1e-6;

/// Default classifier version
pub const DEFAULT_MODEL_VERSION: &str = "v2.1.0";

/// Produces land-asset records around a centre coordinate
#[derive(Clone)]
pub struct AssetDetector {
    random: Arc<dyn RandomSource>,
    model_version: String,
    source: String,
    resolution: String,
}

impl AssetDetector {
    /// Create detector drawing from `random`
    #[must_use]
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self {
            random,
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            source: "Sentinel-2 MSI".to_string(),
            resolution: "10m".to_string(),
        }
    }

    /// With classifier version stamped into asset metadata
    #[must_use]
    pub fn with_model_version(mut self, version: impl Into<String>) -> Self {
        self.model_version = version.into();
        self
    }

    /// Classifier version
    #[inline]
    #[must_use]
    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Detect assets within `radius_km` of `center`
    ///
    /// # Errors
    /// - `StageError` for a non-positive or non-finite radius
    pub fn detect(&self, center: Coordinates, radius_km: f64) -> Result<Vec<LandAsset>, StageError> {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(StageError::new(
                Stage::Detection,
                format!("radius must be positive, got {radius_km}"),
            ));
        }

        let rng = self.random.as_ref();
        let count = rng.index(MIN_ASSETS, MAX_ASSETS - MIN_ASSETS + 1);
        let lat_cos = center.lat.to_radians().cos().max(MIN_LAT_COS);
        let detected_at = Utc::now();

        let mut assets = Vec::with_capacity(count);
        for i in 0..count {
            let angle = TAU * i as f64 / count as f64 + rng.uniform(0.0, ANGLE_JITTER);
            let distance = rng.uniform(0.0, PLACEMENT_FRACTION * radius_km);

            let coordinates = Coordinates::new(
                (center.lat + (distance / KM_PER_DEGREE) * angle.cos()).clamp(-90.0, 90.0),
                wrap_longitude(center.lng + (distance / (KM_PER_DEGREE * lat_cos)) * angle.sin()),
            );

            let asset_type = *pick(rng, &LandAssetType::ALL);
            let area_ha = rng.uniform(0.5, 10.0);
            let confidence = rng.uniform(0.75, 0.2);

            assets.push(LandAsset {
                id: AssetId::new(),
                asset_type,
                coordinates,
                area_ha,
                confidence,
                boundary: LandAsset::square_boundary(coordinates, area_ha),
                metadata: AssetMetadata {
                    detected_at,
                    model_version: self.model_version.clone(),
                    source: self.source.clone(),
                    resolution: self.resolution.clone(),
                },
            });
        }

        tracing::debug!(count, %center, radius_km, "Detected land assets");
        Ok(assets)
    }
}

/// Fold a longitude into `[-180, 180)`
fn wrap_longitude(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

impl std::fmt::Debug for AssetDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetDetector")
            .field("model_version", &self.model_version)
            .field("source", &self.source)
            .field("resolution", &self.resolution)
            .finish_non_exhaustive()
    }
}
