//! Claim validation against coordinated analyses

use fra_core::{ClaimApplication, ClaimType, ClaimValidator, LandType};
use fra_core::prelude::*;
use fra_model::{AnalysisMetadata, LandAssetType, RiskAssessment, RiskLevel};
use fra_test_utils::{
    forest_data, groundwater_data, infrastructure_data, land_asset, CountingPipeline, FailingPipeline,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn application(land_type: LandType, claim_type: ClaimType, land_area: &str) -> ClaimApplication {
    ClaimApplication {
        id: "FRA-2024-017".to_string(),
        applicant_name: "Gond Gram Sabha".to_string(),
        village: "Mendha".to_string(),
        district: "Gadchiroli".to_string(),
        state: "Maharashtra".to_string(),
        land_area: land_area.to_string(),
        land_type,
        claim_type,
        description: "Bamboo and minor forest produce collected by the village over many years"
            .to_string(),
        supporting_documents: vec!["resolution.pdf".to_string(), "map.pdf".to_string()],
        coordinates: Some(Coordinates::new(20.1, 80.0)),
    }
}

fn analysis(assets: &[(LandAssetType, f64)], canopy_cover: f64, biomass: f64) -> Arc<AnalysisResult> {
    let forest = forest_data(canopy_cover, biomass);
    let land_assets = assets
        .iter()
        .map(|(asset_type, area)| land_asset(*asset_type, *area))
        .collect();
    Arc::new(AnalysisResult {
        land_assets,
        forest_data: forest,
        groundwater_data: groundwater_data(12.0),
        infrastructure_data: infrastructure_data(),
        analysis_metadata: AnalysisMetadata {
            processed_at: chrono::Utc::now(),
            processing_time: 3.0,
            model_accuracy: 0.9,
            data_sources: vec!["fixture".to_string()],
        },
        recommendations: Vec::new(),
        risk_assessment: RiskAssessment::new(RiskLevel::Low, RiskLevel::Low, RiskLevel::Low),
    })
}

#[test]
fn community_claim_needs_five_hectares_of_forest() {
    let claim = application(LandType::Community, ClaimType::CommunityForestRights, "7 ha");
    let validator = ClaimValidator::new();

    let small = validator.validate(&claim, Some(analysis(&[(LandAssetType::Forest, 4.0), (LandAssetType::Grassland, 3.0)], 60.0, 150.0)));
    assert!(!small.details.forest_rights_eligible);
    assert!(small.details.land_area_match);
    assert_eq!(small.score(), 75);
    assert!(small.is_valid);

    let large = validator.validate(&claim, Some(analysis(&[(LandAssetType::Forest, 6.0)], 60.0, 150.0)));
    assert!(large.details.forest_rights_eligible);
    assert_eq!(large.score(), 100);
}

#[test]
fn resource_claim_needs_ten_hectares_of_forest() {
    let claim = application(LandType::Habitation, ClaimType::CommunityForestResourceRights, "12 ha");
    let validation = ClaimValidator::new().validate(
        &claim,
        Some(analysis(&[(LandAssetType::Forest, 9.0), (LandAssetType::Forest, 3.0)], 60.0, 150.0)),
    );
    assert!(!validation.details.forest_rights_eligible);
    assert!(validation.details.land_area_match);
}

#[test]
fn no_forest_assets_means_ineligible() {
    let claim = application(LandType::Individual, ClaimType::IndividualForestRights, "2 ha");
    let validation = ClaimValidator::new()
        .validate(&claim, Some(analysis(&[(LandAssetType::Agricultural, 2.0)], 60.0, 150.0)));
    assert!(!validation.details.forest_rights_eligible);
    assert_eq!(
        validation.issues,
        vec!["Land may not be eligible for forest rights".to_string()]
    );
}

#[test]
fn area_outside_tolerance_is_flagged() {
    let claim = application(LandType::Individual, ClaimType::IndividualForestRights, "10 ha");
    let validation = ClaimValidator::new()
        .validate(&claim, Some(analysis(&[(LandAssetType::Forest, 6.0)], 60.0, 150.0)));
    assert!(!validation.details.land_area_match);

    let unparsable = application(LandType::Individual, ClaimType::IndividualForestRights, "unknown");
    let validation = ClaimValidator::new()
        .validate(&unparsable, Some(analysis(&[(LandAssetType::Forest, 6.0)], 60.0, 150.0)));
    assert!(!validation.details.land_area_match);
}

#[test]
fn historical_evidence_from_keywords_or_forest_cover() {
    let mut claim = application(LandType::Individual, ClaimType::IndividualForestRights, "5 ha");
    let sparse = analysis(&[(LandAssetType::Forest, 5.0)], 30.0, 80.0);

    let validation = ClaimValidator::new().validate(&claim, Some(Arc::clone(&sparse)));
    assert!(!validation.details.historical_evidence);

    claim.description = "Land held by our Tribal family and used for grazing and collection".to_string();
    let validation = ClaimValidator::new().validate(&claim, Some(Arc::clone(&sparse)));
    assert!(validation.details.historical_evidence);

    claim.description = "Plain description of the plot without any supporting narrative".to_string();
    let dense = analysis(&[(LandAssetType::Forest, 5.0)], 30.0, 120.0);
    assert!(ClaimValidator::new().validate(&claim, Some(dense)).details.historical_evidence);
}

#[tokio::test]
async fn coordinator_validates_with_shared_analysis() {
    let pipeline = Arc::new(CountingPipeline::new());
    let coordinator = AnalysisCoordinator::with_pipeline(CoordinatorConfig::new(), pipeline.clone());
    let claim = application(LandType::Individual, ClaimType::IndividualForestRights, "4 ha");

    let validation = coordinator.validate_claim(&claim).await;
    assert!(validation.analysis.is_some());
    assert_eq!(pipeline.runs(), 1);
}

#[tokio::test]
async fn claim_without_coordinates_skips_analysis() {
    let pipeline = Arc::new(CountingPipeline::new());
    let coordinator = AnalysisCoordinator::with_pipeline(CoordinatorConfig::new(), pipeline.clone());
    let mut claim = application(LandType::Individual, ClaimType::IndividualForestRights, "4 ha");
    claim.coordinates = None;

    let validation = coordinator.validate_claim(&claim).await;
    assert!(validation.analysis.is_none());
    assert!(!validation.details.coordinates_valid);
    assert_eq!(pipeline.runs(), 0);
}

#[tokio::test]
async fn analysis_failure_does_not_fail_validation() {
    let pipeline = Arc::new(FailingPipeline::new());
    let coordinator = AnalysisCoordinator::with_pipeline(CoordinatorConfig::new(), pipeline.clone());
    let claim = application(LandType::Individual, ClaimType::IndividualForestRights, "4 ha");

    let validation = coordinator.validate_claim(&claim).await;
    assert!(validation.analysis.is_none());
    assert_eq!(validation.score(), 100);
    assert_eq!(pipeline.runs(), 1);
}
