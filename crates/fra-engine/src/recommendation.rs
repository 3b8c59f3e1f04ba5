//! Rule-based recommendations
//!
//! Rules fire in a fixed order and each appends at most one line; the two
//! closing notes are always present. Output order is part of the contract.

use fra_model::{ForestData, GroundwaterData, LandAsset, LandAssetType};

/// Emitted when any forest asset is present
pub const FOREST_CLAIMS: &str = "Forest areas detected - verify traditional forest use claims";
/// Emitted after [`FOREST_CLAIMS`] when canopy cover exceeds 70%
pub const COMMUNITY_FOREST_RESOURCE: &str =
    "High canopy cover detected - consider community forest resource rights";
/// Emitted when any agricultural asset is present
pub const INDIVIDUAL_CLAIMS: &str =
    "Agricultural land detected - verify individual forest rights claims";
/// Emitted when the water table is shallower than 10 m
pub const WATER_MANAGEMENT: &str =
    "Shallow water table - consider water resource management in forest rights";
/// Always emitted, second to last
pub const CROSS_REFERENCE: &str = "Cross-reference with traditional knowledge and community records";
/// Always emitted, last
pub const VERIFY_OWNERSHIP: &str = "Verify land ownership and historical usage patterns";

/// Canopy cover above which community forest resource rights are suggested
pub const DENSE_CANOPY_PERCENT: f64 = 70.0;
/// Water table depth below which water management is suggested (m)
pub const SHALLOW_WATER_TABLE_M: f64 = 10.0;

/// Derives recommendation lines from assets and domain data
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    /// Create engine
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Ordered recommendation lines
    #[must_use]
    pub fn recommend(
        &self,
        assets: &[LandAsset],
        forest: &ForestData,
        groundwater: &GroundwaterData,
    ) -> Vec<String> {
        let mut lines = Vec::new();

        if assets.iter().any(|a| a.is(LandAssetType::Forest)) {
            lines.push(FOREST_CLAIMS.to_string());
            if forest.canopy_cover > DENSE_CANOPY_PERCENT {
                lines.push(COMMUNITY_FOREST_RESOURCE.to_string());
            }
        }

        if assets.iter().any(|a| a.is(LandAssetType::Agricultural)) {
            lines.push(INDIVIDUAL_CLAIMS.to_string());
        }

        if groundwater.water_table_depth < SHALLOW_WATER_TABLE_M {
            lines.push(WATER_MANAGEMENT.to_string());
        }

        lines.push(CROSS_REFERENCE.to_string());
        lines.push(VERIFY_OWNERSHIP.to_string());
        lines
    }
}
