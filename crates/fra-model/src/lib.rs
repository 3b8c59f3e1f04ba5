//! FRA Model - land-asset analysis data types
//!
//! Shared vocabulary for the analysis pipeline and its coordinator:
//! - Queries (coordinate + search radius) and their deduplication keys
//! - Detected land assets with square boundary approximations
//! - Forest, groundwater and infrastructure attribute sets
//! - Risk ratings and the aggregated analysis result
//!
//! # Example
//!
//! ```rust
//! use fra_model::{AnalysisQuery, Coordinates};
//!
//! let query = AnalysisQuery::new(Coordinates::new(20.0, 83.0)).with_radius(5.0);
//! assert!(query.validate().is_ok());
//! assert_eq!(query.key(), AnalysisQuery::new(Coordinates::new(20.0, 83.0)).key());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod asset;
pub mod domain;
pub mod query;
pub mod result;
pub mod risk;

pub use asset::{AssetId, AssetMetadata, LandAsset, LandAssetType};
pub use domain::{
    Connectivity, ForestData, ForestType, GroundwaterData, InfrastructureData, RoadAccess,
    RoadCondition, RoadType, UtilityAccess, UtilityType, WaterQuality,
};
pub use query::{AnalysisQuery, Coordinates, QueryError, QueryKey, DEFAULT_RADIUS_KM};
pub use result::{AnalysisMetadata, AnalysisResult, AnalysisStatus};
pub use risk::{RiskAssessment, RiskLevel};

/// Mean length of one degree of latitude, in kilometres
pub const KM_PER_DEGREE: f64 = 111.0;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
