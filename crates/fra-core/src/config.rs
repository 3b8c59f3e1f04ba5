//! Coordinator configuration
//!
//! Defaults reproduce the dashboard service: 5 km radius, 2-5 s simulated
//! latency, entropy-seeded randomness.

use crate::error::ConfigError;
use fra_engine::detector::DEFAULT_MODEL_VERSION;
use fra_engine::LatencyProfile;
use fra_model::DEFAULT_RADIUS_KM;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Coordinator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Radius applied when a request omits it (km)
    pub default_radius_km: f64,
    /// Simulated processing latency of the default pipeline
    pub latency: LatencyProfile,
    /// Seed for a deterministic default pipeline
    pub seed: Option<u64>,
    /// Classifier version stamped into detected assets
    pub model_version: String,
    /// How long settled statuses are remembered (seconds)
    pub status_ttl_secs: u64,
    /// Maximum remembered settled statuses
    pub status_capacity: u64,
}

impl CoordinatorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With default radius
    #[inline]
    #[must_use]
    pub fn with_default_radius(mut self, radius_km: f64) -> Self {
        self.default_radius_km = radius_km;
        self
    }

    /// With simulated latency
    #[inline]
    #[must_use]
    pub fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    /// With deterministic seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// With status retention
    #[inline]
    #[must_use]
    pub fn with_status_ttl(mut self, ttl: Duration) -> Self {
        self.status_ttl_secs = ttl.as_secs();
        self
    }

    /// Status retention as a duration
    #[inline]
    #[must_use]
    pub fn status_ttl(&self) -> Duration {
        Duration::from_secs(self.status_ttl_secs)
    }

    /// Parse from TOML text and validate
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read TOML file and validate
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_radius_km.is_finite() || self.default_radius_km <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_radius_km must be positive, got {}",
                self.default_radius_km
            )));
        }
        if self.model_version.trim().is_empty() {
            return Err(ConfigError::Invalid("model_version must not be empty".to_string()));
        }
        if self.status_capacity == 0 {
            return Err(ConfigError::Invalid("status_capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            default_radius_km: DEFAULT_RADIUS_KM,
            latency: LatencyProfile::default(),
            seed: None,
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            status_ttl_secs: 300,
            status_capacity: 10_000,
        }
    }
}
