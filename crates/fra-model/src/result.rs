//! Aggregated analysis result

use crate::asset::{LandAsset, LandAssetType};
use crate::domain::{ForestData, GroundwaterData, InfrastructureData};
use crate::risk::RiskAssessment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing provenance attached to every result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    /// When aggregation happened
    pub processed_at: DateTime<Utc>,
    /// Reported processing time in seconds
    pub processing_time: f64,
    /// Reported model accuracy, 0.0 - 1.0
    pub model_accuracy: f64,
    /// Named upstream data sources
    pub data_sources: Vec<String>,
}

/// Everything known about the area around one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Detected assets
    pub land_assets: Vec<LandAsset>,
    /// Forest attributes
    pub forest_data: ForestData,
    /// Groundwater attributes
    pub groundwater_data: GroundwaterData,
    /// Infrastructure records
    pub infrastructure_data: InfrastructureData,
    /// Provenance
    pub analysis_metadata: AnalysisMetadata,
    /// Ordered recommendation lines
    pub recommendations: Vec<String>,
    /// Risk rating
    pub risk_assessment: RiskAssessment,
}

impl AnalysisResult {
    /// Assets of the given class
    pub fn assets_of(&self, asset_type: LandAssetType) -> impl Iterator<Item = &LandAsset> {
        self.land_assets.iter().filter(move |a| a.is(asset_type))
    }

    /// Sum of all detected asset areas, hectares
    #[must_use]
    pub fn total_area_ha(&self) -> f64 {
        self.land_assets.iter().map(|a| a.area_ha).sum()
    }
}

/// Best-effort state of an analysis key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// A computation for the key is in flight
    Pending,
    /// Last computation succeeded, or nothing is known about the key
    Completed,
    /// Last computation failed or was cancelled
    Failed,
}
