//! Rule-based risk assessment
//!
//! Current rules never rate the legal or social axis `High`; that is the
//! rule set as defined, not an omission.

use fra_model::{ForestData, GroundwaterData, LandAsset, LandAssetType, RiskAssessment, RiskLevel};

/// Canopy cover below which environmental risk is high (%)
pub const HIGH_RISK_CANOPY: f64 = 40.0;
/// Canopy cover below which environmental risk is medium (%)
pub const MEDIUM_RISK_CANOPY: f64 = 60.0;
/// Forest asset count above which legal risk is medium
pub const FOREST_ASSET_LEGAL_THRESHOLD: usize = 3;

/// Scores domain data into a three-axis risk rating
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAssessmentEngine;

impl RiskAssessmentEngine {
    /// Create engine
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Assess all axes; overall is their maximum
    #[must_use]
    pub fn assess(
        &self,
        assets: &[LandAsset],
        forest: &ForestData,
        _groundwater: &GroundwaterData,
    ) -> RiskAssessment {
        RiskAssessment::new(
            Self::environmental(forest),
            Self::legal(assets),
            Self::social(assets),
        )
    }

    /// Environmental axis from canopy cover
    #[must_use]
    pub fn environmental(forest: &ForestData) -> RiskLevel {
        if forest.canopy_cover < HIGH_RISK_CANOPY {
            RiskLevel::High
        } else if forest.canopy_cover < MEDIUM_RISK_CANOPY {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Legal axis from the number of forest assets
    #[must_use]
    pub fn legal(assets: &[LandAsset]) -> RiskLevel {
        let forests = assets.iter().filter(|a| a.is(LandAssetType::Forest)).count();
        if forests > FOREST_ASSET_LEGAL_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Social axis from homestead presence
    #[must_use]
    pub fn social(assets: &[LandAsset]) -> RiskLevel {
        if assets.iter().any(|a| a.is(LandAssetType::Homestead)) {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}
