//! Analysis Coordinator
//!
//! The entry point for land analyses. It:
//! - Rejects invalid queries before any work starts
//! - Runs at most one pipeline per outstanding identical key
//! - Fans the single outcome out to every caller that joined before settle
//! - Retires the key on settle so the next identical call recomputes
//!
//! # Cancellation
//!
//! [`AnalysisCoordinator::cancel`] works per key: every waiter registered at
//! that moment receives `CancelledByCaller` and the key is free again. The
//! running computation is not preempted; its outcome is discarded when it
//! arrives. Dropping an `analyze` future cancels only that caller.

use crate::claims::{ClaimApplication, ClaimValidation, ClaimValidator};
use crate::config::CoordinatorConfig;
use crate::error::AnalysisError;
use crate::in_flight::{InFlightTable, Outcome, Registration};
use fra_engine::{AnalysisPipeline, EntropySource, RandomSource, SeededSource, SimulatedPipeline};
use fra_model::{AnalysisQuery, AnalysisResult, AnalysisStatus, Coordinates, QueryKey};
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Deduplicating front door to the analysis pipeline
///
/// Construct once per process and share by reference or `Arc`.
pub struct AnalysisCoordinator {
    /// Configuration
    config: CoordinatorConfig,
    /// Work being deduplicated
    pipeline: Arc<dyn AnalysisPipeline>,
    /// Outstanding computations
    in_flight: Arc<InFlightTable>,
    /// Recently settled statuses (never results)
    statuses: Cache<QueryKey, AnalysisStatus>,
    /// Pipeline starts
    executions: Arc<AtomicU64>,
    /// Claim scoring rules
    validator: ClaimValidator,
}

impl AnalysisCoordinator {
    /// Create coordinator over the simulated pipeline described by `config`
    #[must_use]
    pub fn new(config: CoordinatorConfig) -> Self {
        let random: Arc<dyn RandomSource> = match config.seed {
            Some(seed) => Arc::new(SeededSource::new(seed)),
            None => Arc::new(EntropySource),
        };
        let pipeline = SimulatedPipeline::new(random)
            .with_latency(config.latency)
            .with_model_version(config.model_version.clone());

        Self::with_pipeline(config, Arc::new(pipeline))
    }

    /// Create coordinator over a custom pipeline
    #[must_use]
    pub fn with_pipeline(config: CoordinatorConfig, pipeline: Arc<dyn AnalysisPipeline>) -> Self {
        let statuses = Cache::builder()
            .max_capacity(config.status_capacity)
            .time_to_live(config.status_ttl())
            .build();

        Self {
            config,
            pipeline,
            in_flight: Arc::new(InFlightTable::new()),
            statuses,
            executions: Arc::new(AtomicU64::new(0)),
            validator: ClaimValidator::new(),
        }
    }

    /// Analyze the area around a query
    ///
    /// Concurrent calls with an identical key share one computation and
    /// receive the same `Arc` (or the same error).
    ///
    /// # Errors
    /// - `AnalysisError::InvalidQuery` for malformed input, without starting work
    /// - `AnalysisError::PipelineFailure` when the shared computation fails
    /// - `AnalysisError::CancelledByCaller` when the key is cancelled while waiting
    pub async fn analyze(&self, query: AnalysisQuery) -> Result<Arc<AnalysisResult>, AnalysisError> {
        if let Err(e) = query.validate() {
            tracing::warn!(error = %e, "Rejected analysis query");
            return Err(e.into());
        }

        let key = query.key();
        let registration = self.in_flight.register(key);
        if registration.is_leader() {
            let ticket = registration.into_ticket();
            self.launch(query, key, ticket.generation());
            ticket.wait().await
        } else {
            registration.into_ticket().wait().await
        }
    }

    /// Analyze around `coordinates`, applying the configured default radius
    /// when `radius_km` is omitted
    pub async fn analyze_at(
        &self,
        coordinates: Coordinates,
        radius_km: Option<f64>,
    ) -> Result<Arc<AnalysisResult>, AnalysisError> {
        let radius = radius_km.unwrap_or(self.config.default_radius_km);
        self.analyze(AnalysisQuery::new(coordinates).with_radius(radius))
            .await
    }

    /// Best-effort status of a query's key
    ///
    /// `Pending` while in flight; otherwise the last remembered outcome, or
    /// `Completed` when nothing is remembered.
    pub async fn status(&self, query: &AnalysisQuery) -> AnalysisStatus {
        let key = query.key();
        if self.in_flight.contains(&key) {
            return AnalysisStatus::Pending;
        }
        self.statuses
            .get(&key)
            .await
            .unwrap_or(AnalysisStatus::Completed)
    }

    /// Cancel the outstanding computation for a query's key
    ///
    /// Returns `false` when nothing was in flight.
    pub async fn cancel(&self, query: &AnalysisQuery) -> bool {
        let key = query.key();
        match self.in_flight.retire_any(key) {
            Some(settlement) => {
                // Delivered before any await
                let retired = settlement.deliver(Err(AnalysisError::CancelledByCaller));
                self.statuses.insert(key, AnalysisStatus::Failed).await;
                tracing::info!(%key, waiters = retired.waiters, age_ms = retired.age_ms, "Analysis cancelled");
                true
            }
            None => false,
        }
    }

    /// Validate an FRA claim against an analysis of its coordinates
    ///
    /// Analysis failure does not fail validation; the claim is scored
    /// without satellite evidence instead.
    pub async fn validate_claim(&self, application: &ClaimApplication) -> ClaimValidation {
        let analysis = match application.coordinates {
            Some(coordinates) => match self.analyze_at(coordinates, None).await {
                Ok(result) => Some(result),
                Err(e) => {
                    tracing::warn!(claim = %application.id, error = %e, "Analysis failed, validating without it");
                    None
                }
            },
            None => None,
        };

        self.validator.validate(application, analysis)
    }

    /// Pipeline executions started so far
    #[inline]
    #[must_use]
    pub fn executions(&self) -> u64 {
        self.executions.load(Ordering::SeqCst)
    }

    /// Keys currently in flight
    #[inline]
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Waiters attached to a query's key
    #[inline]
    #[must_use]
    pub fn waiters(&self, query: &AnalysisQuery) -> usize {
        self.in_flight.waiters(&query.key())
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Start the pipeline for a freshly created entry
    ///
    /// The computation runs in its own task so it survives the leader
    /// dropping its future, and a panic still settles the entry.
    fn launch(&self, query: AnalysisQuery, key: QueryKey, generation: u64) {
        let run = self.executions.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(%key, generation, run, "Starting analysis");

        let pipeline = Arc::clone(&self.pipeline);
        let table = Arc::clone(&self.in_flight);
        let statuses = self.statuses.clone();

        tokio::spawn(async move {
            let started = Instant::now();
            let joined = tokio::spawn(async move { pipeline.run(&query).await }).await;

            let outcome: Outcome = match joined {
                Ok(Ok(result)) => Ok(Arc::new(result)),
                Ok(Err(stage_error)) => Err(stage_error.into()),
                Err(join_error) if join_error.is_panic() => {
                    Err(AnalysisError::pipeline("task", "pipeline task panicked"))
                }
                Err(_) => Err(AnalysisError::pipeline("task", "pipeline task was aborted")),
            };
            let status = match &outcome {
                Ok(_) => AnalysisStatus::Completed,
                Err(_) => AnalysisStatus::Failed,
            };
            let failure = outcome.as_ref().err().map(ToString::to_string);

            match table.retire(key, generation) {
                Some(settlement) => {
                    statuses.insert(key, status).await;
                    let retired = settlement.deliver(outcome);
                    match failure {
                        None => tracing::info!(
                            %key,
                            generation,
                            waiters = retired.waiters,
                            duration_ms = started.elapsed().as_millis() as u64,
                            "Analysis completed"
                        ),
                        Some(error) => tracing::warn!(
                            %key,
                            generation,
                            waiters = retired.waiters,
                            %error,
                            "Analysis failed"
                        ),
                    }
                }
                None => {
                    tracing::debug!(%key, generation, "Discarding outcome of cancelled analysis");
                }
            }
        });
    }
}

impl Default for AnalysisCoordinator {
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}

impl std::fmt::Debug for AnalysisCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisCoordinator")
            .field("config", &self.config)
            .field("in_flight", &self.in_flight.len())
            .field("executions", &self.executions())
            .finish_non_exhaustive()
    }
}
