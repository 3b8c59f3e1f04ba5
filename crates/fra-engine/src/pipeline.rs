//! Analysis pipeline
//!
//! [`AnalysisPipeline`] is the seam between the coordinator and the work it
//! deduplicates. [`SimulatedPipeline`] runs the stages leaf-first after a
//! simulated processing delay.

use crate::aggregator::ResultAggregator;
use crate::detector::AssetDetector;
use crate::error::StageError;
use crate::random::{EntropySource, RandomSource};
use crate::recommendation::RecommendationEngine;
use crate::risk::RiskAssessmentEngine;
use crate::synthesizer::DomainDataSynthesizer;
use async_trait::async_trait;
use fra_model::{AnalysisQuery, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One full analysis computation for a query
#[async_trait]
pub trait AnalysisPipeline: Send + Sync {
    /// Run every stage and produce the aggregated result
    async fn run(&self, query: &AnalysisQuery) -> Result<AnalysisResult, StageError>;
}

/// Simulated processing delay: `base_ms + U(0, jitter_ms)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyProfile {
    /// Minimum delay in milliseconds
    pub base_ms: u64,
    /// Additional uniform jitter in milliseconds
    pub jitter_ms: u64,
}

impl LatencyProfile {
    /// No delay at all
    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        Self {
            base_ms: 0,
            jitter_ms: 0,
        }
    }

    /// Fixed delay without jitter
    #[inline]
    #[must_use]
    pub const fn fixed(ms: u64) -> Self {
        Self {
            base_ms: ms,
            jitter_ms: 0,
        }
    }

    /// Draw one delay
    #[must_use]
    pub fn sample(&self, random: &dyn RandomSource) -> Duration {
        if self.jitter_ms == 0 {
            return Duration::from_millis(self.base_ms);
        }
        let jitter = random.uniform(0.0, self.jitter_ms as f64) as u64;
        Duration::from_millis(self.base_ms.saturating_add(jitter))
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            base_ms: 2000,
            jitter_ms: 3000,
        }
    }
}

/// Detector, synthesizer, rule engines and aggregator behind one call
#[derive(Clone)]
pub struct SimulatedPipeline {
    random: Arc<dyn RandomSource>,
    latency: LatencyProfile,
    detector: AssetDetector,
    synthesizer: DomainDataSynthesizer,
    recommender: RecommendationEngine,
    risk: RiskAssessmentEngine,
    aggregator: ResultAggregator,
}

impl SimulatedPipeline {
    /// Create pipeline whose stages share `random`
    #[must_use]
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self {
            latency: LatencyProfile::default(),
            detector: AssetDetector::new(random.clone()),
            synthesizer: DomainDataSynthesizer::new(random.clone()),
            recommender: RecommendationEngine::new(),
            risk: RiskAssessmentEngine::new(),
            aggregator: ResultAggregator::new(random.clone()),
            random,
        }
    }

    /// With simulated latency
    #[must_use]
    pub fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    /// With classifier version stamped into detected assets
    #[must_use]
    pub fn with_model_version(mut self, version: impl Into<String>) -> Self {
        self.detector = self.detector.with_model_version(version);
        self
    }

    /// Simulated latency
    #[inline]
    #[must_use]
    pub fn latency(&self) -> LatencyProfile {
        self.latency
    }
}

impl Default for SimulatedPipeline {
    fn default() -> Self {
        Self::new(Arc::new(EntropySource))
    }
}

impl std::fmt::Debug for SimulatedPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedPipeline")
            .field("latency", &self.latency)
            .field("detector", &self.detector)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AnalysisPipeline for SimulatedPipeline {
    async fn run(&self, query: &AnalysisQuery) -> Result<AnalysisResult, StageError> {
        let started = Instant::now();

        let delay = self.latency.sample(self.random.as_ref());
        if !delay.is_zero() {
            tracing::debug!(delay_ms = delay.as_millis() as u64, "Simulating processing latency");
            tokio::time::sleep(delay).await;
        }

        let assets = self.detector.detect(query.coordinates, query.radius_km)?;
        let forest = self.synthesizer.synthesize_forest();
        let groundwater = self.synthesizer.synthesize_groundwater();
        let infrastructure = self.synthesizer.synthesize_infrastructure();

        let recommendations = self.recommender.recommend(&assets, &forest, &groundwater);
        let risk = self.risk.assess(&assets, &forest, &groundwater);

        let result = self.aggregator.aggregate(
            assets,
            forest,
            groundwater,
            infrastructure,
            recommendations,
            risk,
        );

        tracing::debug!(
            assets = result.land_assets.len(),
            overall_risk = %result.risk_assessment.overall(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pipeline completed"
        );
        Ok(result)
    }
}
