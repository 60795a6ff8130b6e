//! Integration tests for the Worker module

use super::*;
use crate::mocks::{MockDriver, MockSampler};
use crate::shutdown;
use crate::stats::StatsAggregator;
use crate::traits::{RequestDriver, Sampler, StopCondition};

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

// ============================================================================
// Helper functions
// ============================================================================

fn build_worker(
    id: usize,
    driver: Arc<dyn RequestDriver>,
    sampler: Arc<dyn Sampler>,
    stats: Arc<StatsAggregator>,
) -> WorkerBuilder {
    WorkerBuilder::new(id)
        .driver(driver)
        .sampler(sampler)
        .stats(stats)
        .backoff(Duration::from_millis(10))
}

fn request_count(total: usize) -> (Arc<AtomicUsize>, usize) {
    (Arc::new(AtomicUsize::new(0)), total)
}

// ============================================================================
// Integration Tests
// ============================================================================

#[tokio::test]
async fn test_worker_records_exact_successes() {
    let driver = Arc::new(MockDriver::new(Duration::from_millis(100), 50));
    let stats = Arc::new(StatsAggregator::new());
    let (counter, total) = request_count(5);

    let worker = build_worker(0, driver.clone(), Arc::new(MockSampler::new(3)), stats.clone())
        .stop_condition(StopCondition::RequestCount(total))
        .request_counter(counter, total)
        .build()
        .expect("Failed to build worker");

    let (shutdown_tx, shutdown_rx) = shutdown::channel();
    let worker_stats = worker.run(shutdown_rx).await.expect("Worker failed");
    drop(shutdown_tx);

    assert_eq!(worker_stats.completed, 5);
    assert_eq!(worker_stats.errors, 0);
    assert_eq!(worker_stats.tokens, 250);

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.completed, 5);
    assert_eq!(snapshot.total_tokens, 250);
    assert_eq!(snapshot.total_time, Duration::from_millis(500));
    assert_eq!(driver.calls(), 5);
}

#[tokio::test]
async fn test_worker_survives_consecutive_failures() {
    // First 4 attempts fail, then everything succeeds.
    let driver = Arc::new(MockDriver::new(Duration::from_millis(20), 7).with_fail_first(4));
    let stats = Arc::new(StatsAggregator::new());
    let (counter, total) = request_count(3);

    let worker = build_worker(1, driver.clone(), Arc::new(MockSampler::new(2)), stats.clone())
        .stop_condition(StopCondition::RequestCount(total))
        .request_counter(counter.clone(), total)
        .build()
        .expect("Failed to build worker");

    let (_shutdown_tx, shutdown_rx) = shutdown::channel();
    let worker_stats = worker.run(shutdown_rx).await.expect("Worker failed");

    assert_eq!(worker_stats.errors, 4);
    assert_eq!(worker_stats.completed, 3);
    assert_eq!(driver.calls(), 7);

    // Failures are never counted into the global totals
    let snapshot = stats.snapshot();
    assert_eq!(snapshot.completed, 3);
    assert_eq!(snapshot.total_tokens, 21);
    assert_eq!(snapshot.total_time, Duration::from_millis(60));

    // Failed attempts handed their slots back
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_worker_backs_off_after_failure() {
    let driver = Arc::new(MockDriver::new(Duration::ZERO, 0).with_fail_first(2));
    let stats = Arc::new(StatsAggregator::new());
    let (counter, total) = request_count(1);

    let worker = WorkerBuilder::new(0)
        .driver(driver)
        .sampler(Arc::new(MockSampler::new(1)))
        .stats(stats)
        .backoff(Duration::from_millis(60))
        .request_counter(counter, total)
        .build()
        .expect("Failed to build worker");

    let (_shutdown_tx, shutdown_rx) = shutdown::channel();
    let start = Instant::now();
    let worker_stats = worker.run(shutdown_rx).await.expect("Worker failed");

    // Two failures, each followed by the fixed backoff
    assert_eq!(worker_stats.errors, 2);
    assert_eq!(worker_stats.completed, 1);
    assert!(start.elapsed() >= Duration::from_millis(120));
}

#[tokio::test]
async fn test_worker_keeps_retrying_dead_endpoint() {
    let driver = Arc::new(MockDriver::failing());
    let stats = Arc::new(StatsAggregator::new());

    let worker = build_worker(0, driver.clone(), Arc::new(MockSampler::new(3)), stats.clone())
        .build()
        .expect("Failed to build worker");

    let (shutdown_tx, shutdown_rx) = shutdown::channel();
    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(!handle.is_finished(), "worker exited on failure");
    shutdown_tx.shutdown();

    let worker_stats = handle
        .await
        .expect("Worker task panicked")
        .expect("Worker failed");

    assert_eq!(worker_stats.completed, 0);
    assert!(worker_stats.errors >= 3);
    assert_eq!(worker_stats.errors, driver.calls());
    assert_eq!(stats.snapshot().completed, 0);
    assert_eq!(stats.snapshot().total_tokens, 0);
}

#[tokio::test]
async fn test_worker_circuit_breaker() {
    let driver = Arc::new(MockDriver::failing());
    let stats = Arc::new(StatsAggregator::new());

    let worker = build_worker(0, driver.clone(), Arc::new(MockSampler::new(1)), stats)
        .max_consecutive_failures(Some(3))
        .build()
        .expect("Failed to build worker");

    let (_shutdown_tx, shutdown_rx) = shutdown::channel();
    let worker_stats = tokio::time::timeout(Duration::from_secs(5), worker.run(shutdown_rx))
        .await
        .expect("Worker did not stop")
        .expect("Worker failed");

    assert_eq!(worker_stats.errors, 3);
    assert_eq!(worker_stats.consecutive_errors, 3);
    assert_eq!(driver.calls(), 3);
}

#[tokio::test]
async fn test_worker_intermittent_failures_do_not_trip_breaker() {
    // Every third call fails; a success in between resets the streak.
    let driver = Arc::new(MockDriver::new(Duration::from_millis(5), 1).with_fail_every(3));
    let stats = Arc::new(StatsAggregator::new());
    let (counter, total) = request_count(10);

    let worker = build_worker(0, driver, Arc::new(MockSampler::new(4)), stats.clone())
        .max_consecutive_failures(Some(2))
        .request_counter(counter, total)
        .build()
        .expect("Failed to build worker");

    let (_shutdown_tx, shutdown_rx) = shutdown::channel();
    let worker_stats = worker.run(shutdown_rx).await.expect("Worker failed");

    assert_eq!(worker_stats.completed, 10);
    assert!(worker_stats.errors > 0);
    assert_eq!(stats.snapshot().completed, 10);
}

#[tokio::test]
async fn test_worker_shutdown_interrupts_backoff() {
    let driver = Arc::new(MockDriver::failing());
    let stats = Arc::new(StatsAggregator::new());

    let worker = WorkerBuilder::new(0)
        .driver(driver)
        .sampler(Arc::new(MockSampler::new(1)))
        .stats(stats)
        .backoff(Duration::from_secs(60))
        .build()
        .expect("Failed to build worker");

    let (shutdown_tx, shutdown_rx) = shutdown::channel();
    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown_tx.shutdown();

    let worker_stats = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("Worker stuck in backoff")
        .expect("Worker task panicked")
        .expect("Worker failed");
    assert_eq!(worker_stats.errors, 1);
}

#[tokio::test]
async fn test_worker_shutdown_interrupts_request() {
    let driver = Arc::new(MockDriver::new(Duration::from_millis(1), 1).with_delay(Duration::from_secs(60)));
    let stats = Arc::new(StatsAggregator::new());

    let worker = build_worker(0, driver, Arc::new(MockSampler::new(1)), stats.clone())
        .build()
        .expect("Failed to build worker");

    let (shutdown_tx, shutdown_rx) = shutdown::channel();
    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown_tx.shutdown();

    let worker_stats = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("Worker did not exit promptly")
        .expect("Worker task panicked")
        .expect("Worker failed");
    assert_eq!(worker_stats.completed, 0);
    assert_eq!(stats.snapshot().completed, 0);
}

#[tokio::test]
async fn test_worker_exits_when_shutdown_precedes_run() {
    let driver = Arc::new(MockDriver::new(Duration::from_millis(1), 1));
    let worker = build_worker(0, driver.clone(), Arc::new(MockSampler::new(1)), Arc::new(StatsAggregator::new()))
        .build()
        .expect("Failed to build worker");

    let (shutdown_tx, shutdown_rx) = shutdown::channel();
    shutdown_tx.shutdown();

    let worker_stats = tokio::time::timeout(Duration::from_secs(1), worker.run(shutdown_rx))
        .await
        .expect("Worker ignored earlier shutdown")
        .expect("Worker failed");

    assert_eq!(worker_stats.completed, 0);
    assert_eq!(driver.calls(), 0);
}

#[tokio::test]
async fn test_worker_run_duration() {
    let driver = Arc::new(MockDriver::new(Duration::from_millis(20), 1).with_delay(Duration::from_millis(20)));
    let stats = Arc::new(StatsAggregator::new());

    let worker = build_worker(0, driver, Arc::new(MockSampler::new(1)), stats)
        .stop_condition(StopCondition::Duration(Duration::from_millis(100)))
        .build()
        .expect("Failed to build worker");

    let (_shutdown_tx, shutdown_rx) = shutdown::channel();
    let start = Instant::now();
    let worker_stats = worker.run(shutdown_rx).await.expect("Worker failed");

    assert!(start.elapsed() >= Duration::from_millis(100));
    assert!(worker_stats.completed > 0);
}

#[tokio::test]
async fn test_worker_empty_sampler_is_an_error() {
    let driver = Arc::new(MockDriver::new(Duration::ZERO, 0));
    let worker = build_worker(
        0,
        driver.clone(),
        Arc::new(MockSampler::new(0)),
        Arc::new(StatsAggregator::new()),
    )
    .build()
    .expect("Failed to build worker");

    let (_shutdown_tx, shutdown_rx) = shutdown::channel();
    assert!(worker.run(shutdown_rx).await.is_err());
    assert_eq!(driver.calls(), 0);
}

#[tokio::test]
async fn test_worker_with_rate_limit() {
    let driver = Arc::new(MockDriver::new(Duration::from_millis(1), 1));
    let (counter, total) = request_count(3);

    let worker = build_worker(0, driver, Arc::new(MockSampler::new(1)), Arc::new(StatsAggregator::new()))
        .rate_limit(Some(20.0))
        .request_counter(counter, total)
        .build()
        .expect("Failed to build worker");

    let (_shutdown_tx, shutdown_rx) = shutdown::channel();
    let start = Instant::now();
    let worker_stats = worker.run(shutdown_rx).await.expect("Worker failed");

    assert_eq!(worker_stats.completed, 3);
    assert!(start.elapsed() >= Duration::from_millis(80));
}

#[test]
fn test_worker_debug_format() {
    let worker = build_worker(
        7,
        Arc::new(MockDriver::new(Duration::ZERO, 0)),
        Arc::new(MockSampler::new(1)),
        Arc::new(StatsAggregator::new()),
    )
    .build()
    .expect("Failed to build worker");

    assert_eq!(worker.id(), 7);
    let debug = format!("{:?}", worker);
    assert!(debug.contains("Worker"));
    assert!(debug.contains("mock"));
    assert!(debug.contains("mock-corpus"));
}
