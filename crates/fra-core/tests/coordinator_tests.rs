//! Coordinator behaviour under concurrent callers
//!
//! Run with: cargo test --package fra-core --test coordinator_tests

use fra_core::prelude::*;
use fra_engine::{AnalysisPipeline, LatencyProfile};
use fra_test_utils::{sample_query, CountingPipeline, FailingPipeline, GatedPipeline};
use futures::FutureExt;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

fn config() -> CoordinatorConfig {
    CoordinatorConfig::new().with_latency(LatencyProfile::none())
}

fn coordinator_over(pipeline: Arc<dyn AnalysisPipeline>) -> Arc<AnalysisCoordinator> {
    Arc::new(AnalysisCoordinator::with_pipeline(config(), pipeline))
}

fn spawn_analyze(
    coordinator: &Arc<AnalysisCoordinator>,
    query: AnalysisQuery,
) -> JoinHandle<Result<Arc<AnalysisResult>, AnalysisError>> {
    let coordinator = Arc::clone(coordinator);
    tokio::spawn(async move { coordinator.analyze(query).await })
}

async fn wait_for_waiters(coordinator: &AnalysisCoordinator, query: &AnalysisQuery, n: usize) {
    while coordinator.waiters(query) != n {
        tokio::task::yield_now().await;
    }
}

async fn wait_for_runs(pipeline: &GatedPipeline, n: usize) {
    while pipeline.runs() != n {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn concurrent_identical_queries_share_one_execution() {
    let pipeline = Arc::new(GatedPipeline::new());
    let coordinator = coordinator_over(pipeline.clone());
    let query = sample_query();

    let handles: Vec<_> = (0..10).map(|_| spawn_analyze(&coordinator, query)).collect();
    wait_for_waiters(&coordinator, &query, 10).await;
    wait_for_runs(&pipeline, 1).await;

    assert_eq!(coordinator.executions(), 1);
    assert_eq!(coordinator.in_flight(), 1);
    assert_eq!(coordinator.status(&query).await, AnalysisStatus::Pending);

    pipeline.release(1);
    let results: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(results.len(), 10);
    for result in &results {
        assert!(Arc::ptr_eq(result, &results[0]));
    }
    assert_eq!(pipeline.runs(), 1);
    assert_eq!(coordinator.in_flight(), 0);
    assert_eq!(coordinator.status(&query).await, AnalysisStatus::Completed);
}

#[tokio::test]
async fn distinct_queries_run_independently() {
    let pipeline = Arc::new(CountingPipeline::new());
    let coordinator = coordinator_over(pipeline.clone());

    let queries = [
        AnalysisQuery::new(Coordinates::new(21.8, 76.3)),
        AnalysisQuery::new(Coordinates::new(21.8, 76.4)),
        AnalysisQuery::new(Coordinates::new(21.8, 76.3)).with_radius(2.0),
    ];
    let results = futures::future::join_all(queries.into_iter().map(|q| coordinator.analyze(q))).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(pipeline.runs(), 3);
    assert_eq!(coordinator.executions(), 3);
}

#[tokio::test]
async fn settled_key_recomputes_on_next_call() {
    let pipeline = Arc::new(CountingPipeline::new());
    let coordinator = coordinator_over(pipeline.clone());

    let first = coordinator.analyze(sample_query()).await.unwrap();
    let second = coordinator.analyze(sample_query()).await.unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(pipeline.runs(), 2);
    assert_eq!(coordinator.executions(), 2);
}

#[tokio::test]
async fn failure_reaches_every_waiter_and_next_call_retries() {
    let pipeline = Arc::new(GatedPipeline::failing());
    let coordinator = coordinator_over(pipeline.clone());
    let query = sample_query();

    let handles: Vec<_> = (0..5).map(|_| spawn_analyze(&coordinator, query)).collect();
    wait_for_waiters(&coordinator, &query, 5).await;
    pipeline.release(1);

    let expected = AnalysisError::pipeline("detection", "imagery unavailable");
    for joined in futures::future::join_all(handles).await {
        let err = joined.unwrap().unwrap_err();
        assert_eq!(err, expected);
        assert!(err.is_retryable());
    }
    assert_eq!(coordinator.status(&query).await, AnalysisStatus::Failed);
    assert_eq!(coordinator.in_flight(), 0);

    let retry = spawn_analyze(&coordinator, query);
    wait_for_waiters(&coordinator, &query, 1).await;
    pipeline.release(1);
    assert_eq!(retry.await.unwrap().unwrap_err(), expected);
    assert_eq!(coordinator.executions(), 2);
}

#[tokio::test]
async fn stage_error_names_failing_stage() {
    let pipeline = Arc::new(FailingPipeline::new());
    let coordinator = coordinator_over(pipeline.clone());

    let err = coordinator.analyze(sample_query()).await.unwrap_err();
    assert_eq!(err, AnalysisError::pipeline("detection", "simulated failure"));
    assert_eq!(pipeline.runs(), 1);
}

#[tokio::test]
async fn panicking_pipeline_settles_as_failure() {
    let pipeline = Arc::new(FailingPipeline::panicking());
    let coordinator = coordinator_over(pipeline.clone());
    let query = sample_query();

    let err = coordinator.analyze(query).await.unwrap_err();
    assert_eq!(err, AnalysisError::pipeline("task", "pipeline task panicked"));
    assert_eq!(coordinator.in_flight(), 0);
    assert_eq!(coordinator.status(&query).await, AnalysisStatus::Failed);
}

#[tokio::test]
async fn cancel_fails_all_current_waiters() {
    let pipeline = Arc::new(GatedPipeline::new());
    let coordinator = coordinator_over(pipeline.clone());
    let query = sample_query();

    let handles: Vec<_> = (0..3).map(|_| spawn_analyze(&coordinator, query)).collect();
    wait_for_waiters(&coordinator, &query, 3).await;

    assert!(coordinator.cancel(&query).await);
    for joined in futures::future::join_all(handles).await {
        let err = joined.unwrap().unwrap_err();
        assert!(err.is_cancelled());
        assert!(!err.is_retryable());
    }
    assert_eq!(coordinator.in_flight(), 0);
    assert_eq!(coordinator.status(&query).await, AnalysisStatus::Failed);
    assert!(!coordinator.cancel(&query).await);
}

#[tokio::test]
async fn cancel_reaches_waiters_even_if_canceller_is_dropped() {
    let pipeline = Arc::new(GatedPipeline::new());
    let coordinator = coordinator_over(pipeline.clone());
    let query = sample_query();

    let waiter = spawn_analyze(&coordinator, query);
    wait_for_waiters(&coordinator, &query, 1).await;

    // Poll once and drop, whether or not the status write finished
    let _ = coordinator.cancel(&query).now_or_never();

    assert!(waiter.await.unwrap().unwrap_err().is_cancelled());
    assert_eq!(coordinator.in_flight(), 0);
}

#[tokio::test]
async fn settled_status_expires_after_ttl() {
    let pipeline = Arc::new(FailingPipeline::new());
    let config = config().with_status_ttl(Duration::from_secs(1));
    let coordinator = AnalysisCoordinator::with_pipeline(config, pipeline);
    let query = sample_query();

    assert!(coordinator.analyze(query).await.is_err());
    assert_eq!(coordinator.status(&query).await, AnalysisStatus::Failed);

    // Clock is not paused here; the status cache reads wall time
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(coordinator.status(&query).await, AnalysisStatus::Completed);
}

#[tokio::test]
async fn cancelled_computation_does_not_leak_into_next_generation() {
    let pipeline = Arc::new(GatedPipeline::new());
    let coordinator = coordinator_over(pipeline.clone());
    let query = sample_query();

    let cancelled = spawn_analyze(&coordinator, query);
    wait_for_waiters(&coordinator, &query, 1).await;
    wait_for_runs(&pipeline, 1).await;
    assert!(coordinator.cancel(&query).await);
    assert!(cancelled.await.unwrap().unwrap_err().is_cancelled());

    let fresh = spawn_analyze(&coordinator, query);
    wait_for_waiters(&coordinator, &query, 1).await;
    wait_for_runs(&pipeline, 2).await;
    assert_eq!(coordinator.executions(), 2);

    pipeline.release(2);
    assert!(fresh.await.unwrap().is_ok());
    assert_eq!(coordinator.status(&query).await, AnalysisStatus::Completed);
}

#[tokio::test]
async fn dropped_waiter_detaches_without_cancelling_others() {
    let pipeline = Arc::new(GatedPipeline::new());
    let coordinator = coordinator_over(pipeline.clone());
    let query = sample_query();

    let leader = spawn_analyze(&coordinator, query);
    wait_for_waiters(&coordinator, &query, 1).await;
    let follower = spawn_analyze(&coordinator, query);
    wait_for_waiters(&coordinator, &query, 2).await;

    leader.abort();
    assert!(leader.await.unwrap_err().is_cancelled());
    assert_eq!(coordinator.waiters(&query), 1);
    assert_eq!(coordinator.in_flight(), 1);

    pipeline.release(1);
    assert!(follower.await.unwrap().is_ok());
    assert_eq!(coordinator.executions(), 1);
}

#[tokio::test]
async fn invalid_queries_never_reach_the_pipeline() {
    let pipeline = Arc::new(CountingPipeline::new());
    let coordinator = coordinator_over(pipeline.clone());

    let bad = [
        AnalysisQuery::new(Coordinates::new(-91.0, 76.3)),
        AnalysisQuery::new(Coordinates::new(21.8, 181.0)),
        AnalysisQuery::new(Coordinates::new(f64::NAN, 76.3)),
        sample_query().with_radius(-1.0),
    ];
    for query in bad {
        let err = coordinator.analyze(query).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidQuery(_)));
        assert!(!err.is_retryable());
    }

    assert_eq!(pipeline.runs(), 0);
    assert_eq!(coordinator.executions(), 0);
    assert_eq!(coordinator.in_flight(), 0);
}

#[tokio::test]
async fn requests_at_different_instants_share_a_key() {
    let pipeline = Arc::new(GatedPipeline::new());
    let coordinator = coordinator_over(pipeline.clone());
    let query = sample_query();

    let early = spawn_analyze(&coordinator, query);
    wait_for_waiters(&coordinator, &query, 1).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let late = spawn_analyze(&coordinator, query);
    wait_for_waiters(&coordinator, &query, 2).await;

    pipeline.release(1);
    let early = early.await.unwrap().unwrap();
    let late = late.await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&early, &late));
    assert_eq!(coordinator.executions(), 1);
}

#[tokio::test]
async fn negative_zero_shares_key_with_zero() {
    let pipeline = Arc::new(GatedPipeline::new());
    let coordinator = coordinator_over(pipeline.clone());
    let positive = AnalysisQuery::new(Coordinates::new(0.0, 0.0));
    let negative = AnalysisQuery::new(Coordinates::new(-0.0, -0.0));

    let first = spawn_analyze(&coordinator, positive);
    wait_for_waiters(&coordinator, &positive, 1).await;
    let second = spawn_analyze(&coordinator, negative);
    wait_for_waiters(&coordinator, &positive, 2).await;

    pipeline.release(1);
    assert!(first.await.unwrap().is_ok());
    assert!(second.await.unwrap().is_ok());
    assert_eq!(coordinator.executions(), 1);
}

#[tokio::test(start_paused = true)]
async fn default_pipeline_honours_configured_latency() {
    let config = CoordinatorConfig::new()
        .with_latency(LatencyProfile::fixed(2_000))
        .with_seed(3);
    let coordinator = AnalysisCoordinator::new(config);

    let started = tokio::time::Instant::now();
    let result = coordinator.analyze(sample_query()).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(2_000));
    assert!(!result.recommendations.is_empty());
}
