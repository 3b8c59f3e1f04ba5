//! Testing utilities for FRA workspace
//!
//! Shared fixtures and instrumented pipelines.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::Utc;
use fra_engine::{
    AnalysisPipeline, DomainDataSynthesizer, LatencyProfile, SequenceSource, SimulatedPipeline,
    Stage, StageError,
};
use fra_model::{
    AnalysisQuery, AnalysisResult, AssetId, AssetMetadata, Coordinates, ForestData, ForestType,
    GroundwaterData, InfrastructureData, LandAsset, LandAssetType, WaterQuality,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

pub fn sample_query() -> AnalysisQuery {
    AnalysisQuery::new(Coordinates::new(21.8, 76.3))
}

pub fn land_asset(asset_type: LandAssetType, area_ha: f64) -> LandAsset {
    let center = Coordinates::new(21.8, 76.3);
    LandAsset {
        id: AssetId::new(),
        asset_type,
        coordinates: center,
        area_ha,
        confidence: 0.9,
        boundary: LandAsset::square_boundary(center, area_ha),
        metadata: AssetMetadata {
            detected_at: Utc::now(),
            model_version: "test".to_string(),
            source: "fixture".to_string(),
            resolution: "10m".to_string(),
        },
    }
}

pub fn forest_data(canopy_cover: f64, biomass: f64) -> ForestData {
    ForestData {
        forest_type: ForestType::Open,
        tree_species: vec!["Teak".to_string(), "Sal".to_string()],
        canopy_cover,
        biomass,
        carbon_stock: biomass * 0.47,
        biodiversity_index: 0.6,
    }
}

pub fn groundwater_data(water_table_depth: f64) -> GroundwaterData {
    GroundwaterData {
        water_table_depth,
        water_quality: WaterQuality::Good,
        recharge_rate: 250.0,
        aquifer_type: "Unconfined".to_string(),
        seasonal_variation: 2.0,
    }
}

pub fn infrastructure_data() -> InfrastructureData {
    DomainDataSynthesizer::new(Arc::new(SequenceSource::constant(0.5))).synthesize_infrastructure()
}

/// Deterministic pipeline with no latency
pub fn instant_pipeline() -> SimulatedPipeline {
    SimulatedPipeline::new(Arc::new(SequenceSource::constant(0.5))).with_latency(LatencyProfile::none())
}

/// Counts runs of an instant simulated pipeline
#[derive(Debug)]
pub struct CountingPipeline {
    inner: SimulatedPipeline,
    runs: AtomicUsize,
}

impl CountingPipeline {
    pub fn new() -> Self {
        Self {
            inner: instant_pipeline(),
            runs: AtomicUsize::new(0),
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl Default for CountingPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisPipeline for CountingPipeline {
    async fn run(&self, query: &AnalysisQuery) -> Result<AnalysisResult, StageError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.inner.run(query).await
    }
}

/// Blocks each run until a permit is released
///
/// Lets a test pile waiters onto one key before the computation settles.
#[derive(Debug)]
pub struct GatedPipeline {
    inner: SimulatedPipeline,
    gate: Semaphore,
    runs: AtomicUsize,
    fail: bool,
}

impl GatedPipeline {
    pub fn new() -> Self {
        Self {
            inner: instant_pipeline(),
            gate: Semaphore::new(0),
            runs: AtomicUsize::new(0),
            fail: false,
        }
    }

    /// Gated pipeline whose runs fail at the detection stage once released
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Let `n` blocked runs proceed
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl Default for GatedPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisPipeline for GatedPipeline {
    async fn run(&self, query: &AnalysisQuery) -> Result<AnalysisResult, StageError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| StageError::new(Stage::Detection, "gate closed"))?;
        permit.forget();

        if self.fail {
            return Err(StageError::new(Stage::Detection, "imagery unavailable"));
        }
        self.inner.run(query).await
    }
}

/// Fails every run, by error or by panic
#[derive(Debug)]
pub struct FailingPipeline {
    panic: bool,
    runs: AtomicUsize,
}

impl FailingPipeline {
    pub fn new() -> Self {
        Self {
            panic: false,
            runs: AtomicUsize::new(0),
        }
    }

    pub fn panicking() -> Self {
        Self {
            panic: true,
            ..Self::new()
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl Default for FailingPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisPipeline for FailingPipeline {
    async fn run(&self, _query: &AnalysisQuery) -> Result<AnalysisResult, StageError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if self.panic {
            panic!("detector crashed");
        }
        Err(StageError::new(Stage::Detection, "simulated failure"))
    }
}
