//! FRA claim validation
//!
//! Scores a claim application against the evidence an analysis produced.
//! Five weighted checks add up to 100 points; a claim is valid at 70 points
//! with no more than two issues.

use fra_model::{AnalysisResult, Coordinates, LandAssetType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Weight of the land area check
pub const LAND_AREA_WEIGHT: u32 = 20;
/// Weight of the coordinate check
pub const COORDINATES_WEIGHT: u32 = 15;
/// Weight of the forest rights eligibility check
pub const ELIGIBILITY_WEIGHT: u32 = 25;
/// Weight of the documentation check
pub const DOCUMENTATION_WEIGHT: u32 = 20;
/// Weight of the historical evidence check
pub const HISTORY_WEIGHT: u32 = 20;

/// Relative area mismatch still accepted
pub const AREA_TOLERANCE: f64 = 0.3;
/// Minimum confidence of a valid claim
pub const VALID_CONFIDENCE: f64 = 0.7;
/// Maximum issues of a valid claim
pub const MAX_ISSUES: usize = 2;

const HISTORY_KEYWORDS: [&str; 6] = [
    "traditional",
    "ancestral",
    "generations",
    "community",
    "tribal",
    "indigenous",
];

/// Land tenure the claim concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandType {
    /// Individual cultivation or dwelling
    Individual,
    /// Land held in common
    Community,
    /// Habitation of a primitive tribal group
    Habitation,
}

/// Right being claimed under the Act
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    /// IFR
    IndividualForestRights,
    /// CFR
    CommunityForestRights,
    /// CFRR
    CommunityForestResourceRights,
}

/// Claim application as filed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimApplication {
    /// Application reference
    pub id: String,
    pub applicant_name: String,
    pub village: String,
    pub district: String,
    pub state: String,
    /// Free text, e.g. "4.5 ha"
    pub land_area: String,
    pub land_type: LandType,
    pub claim_type: ClaimType,
    pub description: String,
    #[serde(default)]
    pub supporting_documents: Vec<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

/// Outcome of each check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationDetails {
    pub land_area_match: bool,
    pub coordinates_valid: bool,
    pub forest_rights_eligible: bool,
    pub documentation_complete: bool,
    pub historical_evidence: bool,
}

/// Scored validation of a claim
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimValidation {
    pub is_valid: bool,
    /// Score / 100
    pub confidence: f64,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub details: ValidationDetails,
    /// Analysis the claim was scored against, if any
    pub analysis: Option<Arc<AnalysisResult>>,
}

impl ClaimValidation {
    /// Points scored, 0..=100
    #[must_use]
    pub fn score(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// Applies the claim checks
#[derive(Debug, Clone, Default)]
pub struct ClaimValidator;

impl ClaimValidator {
    /// Create validator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Score an application
    #[must_use]
    pub fn validate(
        &self,
        application: &ClaimApplication,
        analysis: Option<Arc<AnalysisResult>>,
    ) -> ClaimValidation {
        let evidence = analysis.as_deref();
        let details = ValidationDetails {
            land_area_match: land_area_matches(application, evidence),
            coordinates_valid: coordinates_valid(application),
            forest_rights_eligible: forest_rights_eligible(application, evidence),
            documentation_complete: documentation_complete(application),
            historical_evidence: historical_evidence(application, evidence),
        };

        let checks = [
            (
                details.land_area_match,
                LAND_AREA_WEIGHT,
                "Land area does not match AI-detected boundaries",
                "Verify land area measurements with field survey",
            ),
            (
                details.coordinates_valid,
                COORDINATES_WEIGHT,
                "Invalid or missing coordinates",
                "Provide accurate GPS coordinates for the claimed land",
            ),
            (
                details.forest_rights_eligible,
                ELIGIBILITY_WEIGHT,
                "Land may not be eligible for forest rights",
                "Verify traditional forest use and community rights",
            ),
            (
                details.documentation_complete,
                DOCUMENTATION_WEIGHT,
                "Incomplete supporting documentation",
                "Upload all required documents and evidence",
            ),
            (
                details.historical_evidence,
                HISTORY_WEIGHT,
                "Insufficient historical evidence of forest use",
                "Provide additional evidence of traditional forest use",
            ),
        ];

        let mut score = 0;
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();
        for (passed, weight, issue, recommendation) in checks {
            if passed {
                score += weight;
            } else {
                issues.push(issue.to_string());
                recommendations.push(recommendation.to_string());
            }
        }

        let confidence = f64::from(score) / 100.0;
        let is_valid = confidence >= VALID_CONFIDENCE && issues.len() <= MAX_ISSUES;
        tracing::debug!(claim = %application.id, score, is_valid, "Claim scored");

        ClaimValidation {
            is_valid,
            confidence,
            issues,
            recommendations,
            details,
            analysis,
        }
    }
}

/// Parse the numeric part of a free-text area ("4.5 ha" -> 4.5)
///
/// Digits and dots are kept, then the longest leading `digits[.digits]`
/// prefix is read, so a trailing period does not spoil the number.
fn parse_area(text: &str) -> Option<f64> {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let number = match kept.match_indices('.').nth(1) {
        Some((second_dot, _)) => &kept[..second_dot],
        None => kept.as_str(),
    };
    if !number.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

fn land_area_matches(application: &ClaimApplication, analysis: Option<&AnalysisResult>) -> bool {
    let Some(analysis) = analysis else {
        return true;
    };
    let Some(claimed) = parse_area(&application.land_area) else {
        return false;
    };
    if claimed <= 0.0 {
        return false;
    }
    (claimed - analysis.total_area_ha()).abs() / claimed <= AREA_TOLERANCE
}

fn coordinates_valid(application: &ClaimApplication) -> bool {
    application
        .coordinates
        .is_some_and(|c| (-90.0..=90.0).contains(&c.lat) && (-180.0..=180.0).contains(&c.lng))
}

fn forest_rights_eligible(application: &ClaimApplication, analysis: Option<&AnalysisResult>) -> bool {
    let Some(analysis) = analysis else {
        return true;
    };
    let min_area = match (application.claim_type, application.land_type) {
        (ClaimType::CommunityForestRights, LandType::Community) => 5.0,
        (ClaimType::CommunityForestResourceRights, LandType::Habitation) => 10.0,
        _ => 0.0,
    };
    analysis
        .assets_of(LandAssetType::Forest)
        .any(|asset| asset.area_ha >= min_area)
}

/// Description length is counted in UTF-16 code units and identity fields
/// only need to be non-empty, as the claim form measures them.
fn documentation_complete(application: &ClaimApplication) -> bool {
    !application.supporting_documents.is_empty()
        && application.description.encode_utf16().count() > 50
        && [
            &application.applicant_name,
            &application.village,
            &application.district,
            &application.state,
        ]
        .iter()
        .all(|field| !field.is_empty())
}

fn historical_evidence(application: &ClaimApplication, analysis: Option<&AnalysisResult>) -> bool {
    let Some(analysis) = analysis else {
        return true;
    };
    let description = application.description.to_lowercase();
    HISTORY_KEYWORDS.iter().any(|word| description.contains(word))
        || analysis.forest_data.canopy_cover > 40.0
        || analysis.forest_data.biomass > 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use fra_model::{AnalysisMetadata, RiskAssessment, RiskLevel};
    use fra_test_utils::{forest_data, groundwater_data, infrastructure_data, land_asset};

    fn fixture_result() -> AnalysisResult {
        AnalysisResult {
            land_assets: Vec::new(),
            forest_data: forest_data(60.0, 150.0),
            groundwater_data: groundwater_data(12.0),
            infrastructure_data: infrastructure_data(),
            analysis_metadata: AnalysisMetadata {
                processed_at: chrono::Utc::now(),
                processing_time: 3.0,
                model_accuracy: 0.9,
                data_sources: Vec::new(),
            },
            recommendations: Vec::new(),
            risk_assessment: RiskAssessment::new(RiskLevel::Low, RiskLevel::Low, RiskLevel::Low),
        }
    }

    fn application() -> ClaimApplication {
        ClaimApplication {
            id: "FRA-2024-001".to_string(),
            applicant_name: "Ramesh Kumar".to_string(),
            village: "Khandwa".to_string(),
            district: "East Nimar".to_string(),
            state: "Madhya Pradesh".to_string(),
            land_area: "4.5 ha".to_string(),
            land_type: LandType::Individual,
            claim_type: ClaimType::IndividualForestRights,
            description: "Cultivated by my family for generations on the forest fringe near the village"
                .to_string(),
            supporting_documents: vec!["gram_sabha_resolution.pdf".to_string()],
            coordinates: Some(Coordinates::new(21.8, 76.3)),
        }
    }

    #[test]
    fn parse_area_keeps_digits_and_dots() {
        assert_eq!(parse_area("4.5 ha"), Some(4.5));
        assert_eq!(parse_area("12 hectares"), Some(12.0));
        assert_eq!(parse_area("about two"), None);
    }

    #[test]
    fn parse_area_reads_leading_number_only() {
        assert_eq!(parse_area("4.5 ha."), Some(4.5));
        assert_eq!(parse_area("about 3.2 ha. approx."), Some(3.2));
        assert_eq!(parse_area("Khasra 12/3, 4.5 ha"), Some(1234.5));
        assert_eq!(parse_area(".5 ha"), Some(0.5));
        assert_eq!(parse_area("n.a."), None);
    }

    #[test]
    fn trailing_period_in_area_still_matches_analysis() {
        let mut claim = application();
        claim.land_area = "4.5 ha.".to_string();
        let analysis = AnalysisResult {
            land_assets: vec![land_asset(LandAssetType::Forest, 4.5)],
            ..fixture_result()
        };

        let validation = ClaimValidator::new().validate(&claim, Some(Arc::new(analysis)));
        assert!(validation.details.land_area_match);
        assert!(validation.is_valid);
    }

    #[test]
    fn identity_fields_need_only_be_non_empty() {
        let mut claim = application();
        claim.village = " ".to_string();
        assert!(ClaimValidator::new().validate(&claim, None).details.documentation_complete);

        claim.village = String::new();
        assert!(!ClaimValidator::new().validate(&claim, None).details.documentation_complete);
    }

    #[test]
    fn description_length_counts_utf16_units() {
        let mut claim = application();
        // 26 astral characters are 52 UTF-16 units but only 26 chars
        claim.description = "\u{1F333}".repeat(26);
        assert!(ClaimValidator::new().validate(&claim, None).details.documentation_complete);

        claim.description = "\u{1F333}".repeat(25);
        assert!(!ClaimValidator::new().validate(&claim, None).details.documentation_complete);
    }

    #[test]
    fn complete_claim_without_analysis_is_valid() {
        let validation = ClaimValidator::new().validate(&application(), None);
        assert!(validation.is_valid);
        assert_eq!(validation.score(), 100);
        assert!(validation.issues.is_empty());
        assert!(validation.analysis.is_none());
    }

    #[test]
    fn missing_coordinates_and_documents_are_reported() {
        let mut claim = application();
        claim.coordinates = None;
        claim.supporting_documents.clear();

        let validation = ClaimValidator::new().validate(&claim, None);
        assert_eq!(validation.score(), 65);
        assert!(!validation.is_valid);
        assert_eq!(
            validation.issues,
            vec![
                "Invalid or missing coordinates".to_string(),
                "Incomplete supporting documentation".to_string(),
            ]
        );
        assert_eq!(validation.recommendations.len(), 2);
    }

    #[test]
    fn out_of_range_coordinates_fail() {
        let mut claim = application();
        claim.coordinates = Some(Coordinates::new(91.0, 76.3));
        assert!(!ClaimValidator::new().validate(&claim, None).details.coordinates_valid);
    }

    #[test]
    fn short_description_fails_documentation() {
        let mut claim = application();
        claim.description = "Family land".to_string();
        let validation = ClaimValidator::new().validate(&claim, None);
        assert!(!validation.details.documentation_complete);
        assert_eq!(validation.score(), 80);
        assert!(validation.is_valid);
    }

    #[test]
    fn claim_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&ClaimType::CommunityForestResourceRights).unwrap(),
            "\"community_forest_resource_rights\""
        );
        assert_eq!(serde_json::to_string(&LandType::Habitation).unwrap(), "\"habitation\"");
    }
}
