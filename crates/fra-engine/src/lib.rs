//! FRA Engine - analysis pipeline stages
//!
//! Stages run leaf-first for every computation:
//!
//! ```text
//! AssetDetector ─┐
//! DomainDataSynthesizer ─┼─> RecommendationEngine / RiskAssessmentEngine ─> ResultAggregator
//! ```
//!
//! Every randomized stage draws from an injected [`RandomSource`], so a
//! [`SequenceSource`] or [`SeededSource`] makes the whole pipeline
//! reproducible.
//!
//! # Example
//!
//! ```rust,ignore
//! use fra_engine::{AnalysisPipeline, LatencyProfile, SeededSource, SimulatedPipeline};
//! use fra_model::{AnalysisQuery, Coordinates};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = SimulatedPipeline::new(Arc::new(SeededSource::new(7)))
//!     .with_latency(LatencyProfile::none());
//! let result = pipeline.run(&AnalysisQuery::new(Coordinates::new(20.0, 83.0))).await?;
//! println!("{} assets", result.land_assets.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod aggregator;
pub mod detector;
pub mod error;
pub mod pipeline;
pub mod random;
pub mod recommendation;
pub mod risk;
pub mod synthesizer;

pub use aggregator::{ResultAggregator, DATA_SOURCES};
pub use detector::AssetDetector;
pub use error::{Stage, StageError};
pub use pipeline::{AnalysisPipeline, LatencyProfile, SimulatedPipeline};
pub use random::{EntropySource, RandomSource, SeededSource, SequenceSource};
pub use recommendation::RecommendationEngine;
pub use risk::RiskAssessmentEngine;
pub use synthesizer::DomainDataSynthesizer;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with FRA Engine
    pub use crate::{
        AnalysisPipeline, AssetDetector, DomainDataSynthesizer, RandomSource,
        RecommendationEngine, ResultAggregator, RiskAssessmentEngine, SimulatedPipeline,
        StageError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
