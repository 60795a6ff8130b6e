//! Worker execution loop

use crate::error::BenchResult;
use crate::response::Completion;
use crate::shutdown::ShutdownSignal;
use crate::stats::StatsAggregator;
use crate::traits::{DriverError, RequestDriver, Sampler, StopCondition};

use super::rate_limiter::RequestRateLimiter;
use super::stats::WorkerStats;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Worker runs requests in a loop: pick -> execute -> record or back off
///
/// Workers are independent tokio tasks managed by the Orchestrator. They
/// share the driver, sampler and aggregator via Arc and touch no other
/// shared mutable state.
pub struct Worker {
    /// Worker identifier, used for log attribution
    id: usize,

    /// Request driver (shared across workers)
    driver: Arc<dyn RequestDriver>,

    /// Corpus sampler (shared across workers)
    sampler: Arc<dyn Sampler>,

    /// Global counters (shared across workers)
    stats: Arc<StatsAggregator>,

    /// Per-worker pacing
    rate_limiter: RequestRateLimiter,

    /// Stop condition
    stop_condition: StopCondition,

    /// Delay after a failed attempt
    backoff: Duration,

    /// Give up after this many failures in a row
    max_consecutive_failures: Option<u32>,

    /// Shared slot counter for `StopCondition::RequestCount`
    request_counter: Option<Arc<AtomicUsize>>,

    /// Total successful requests wanted (with `request_counter`)
    total_requests: Option<usize>,
}

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Shutdown,
    StopCondition,
    TooManyFailures,
}

impl Worker {
    /// Create a new worker
    ///
    /// Use `WorkerBuilder` for a more ergonomic construction.
    pub fn new(
        id: usize,
        driver: Arc<dyn RequestDriver>,
        sampler: Arc<dyn Sampler>,
        stats: Arc<StatsAggregator>,
        stop_condition: StopCondition,
        backoff: Duration,
    ) -> Self {
        Self {
            id,
            driver,
            sampler,
            stats,
            rate_limiter: RequestRateLimiter::unlimited(),
            stop_condition,
            backoff,
            max_consecutive_failures: None,
            request_counter: None,
            total_requests: None,
        }
    }

    /// Pace requests with the given limiter
    pub fn with_rate_limiter(mut self, rate_limiter: RequestRateLimiter) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// Stop after `n` consecutive failures
    pub fn with_max_consecutive_failures(mut self, n: Option<u32>) -> Self {
        self.max_consecutive_failures = n;
        self
    }

    /// Share a slot counter so the pool records exactly `total` successes
    ///
    /// A worker claims a slot before each attempt and hands it back if the
    /// attempt fails, so failures never use up the budget.
    pub fn with_request_counter(mut self, counter: Arc<AtomicUsize>, total: usize) -> Self {
        self.request_counter = Some(counter);
        self.total_requests = Some(total);
        self
    }

    /// Run the worker loop until shutdown or the stop condition
    ///
    /// Per-request failures never end the loop (unless a consecutive
    /// failure cap is configured); they are logged and followed by the
    /// fixed backoff. Only a sampler error is returned as `Err`.
    pub async fn run(self, mut shutdown: ShutdownSignal) -> BenchResult<WorkerStats> {
        let mut stats = WorkerStats::new(self.id);
        stats.start();

        tracing::debug!(worker_id = self.id, driver = self.driver.driver_name(), "Worker started");

        let exit = loop {
            if shutdown.is_shutdown() {
                break Exit::Shutdown;
            }
            if self.should_stop(&stats) || !self.try_claim_request() {
                break Exit::StopCondition;
            }

            let path = match self.sampler.sample() {
                Ok(path) => path,
                Err(e) => {
                    self.release_request();
                    stats.stop();
                    return Err(e.into());
                }
            };

            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    self.release_request();
                    break Exit::Shutdown;
                }

                result = self.attempt(path) => match result {
                    Ok(completion) => {
                        stats.record_success(completion.tokens);
                        let snapshot = self.stats.apply(&completion);
                        tracing::info!(worker_id = self.id, "{snapshot} (Worker {})", self.id);
                    }
                    Err(e) => {
                        self.release_request();
                        stats.record_error();
                        tracing::warn!(
                            worker_id = self.id,
                            kind = %e.kind(),
                            error = %e,
                            "Request failed"
                        );

                        if self.too_many_failures(&stats) {
                            break Exit::TooManyFailures;
                        }

                        tokio::select! {
                            biased;
                            _ = shutdown.cancelled() => break Exit::Shutdown,
                            _ = tokio::time::sleep(self.backoff) => {}
                        }
                    }
                },
            }
        };

        stats.stop();
        if exit == Exit::TooManyFailures {
            tracing::warn!(
                worker_id = self.id,
                consecutive_errors = stats.consecutive_errors,
                "Worker giving up after consecutive failures"
            );
        }
        tracing::debug!(
            worker_id = self.id,
            reason = ?exit,
            completed = stats.completed,
            errors = stats.errors,
            elapsed_ms = ?stats.elapsed().map(|d| d.as_millis()),
            "Worker finished"
        );

        Ok(stats)
    }

    /// One request: wait for pacing, then hand the artifact to the driver
    async fn attempt(&self, path: &Path) -> Result<Completion, DriverError> {
        self.rate_limiter.wait().await;
        self.driver.execute(path).await
    }

    /// Try to claim a request slot from the shared counter
    ///
    /// Always succeeds when not counting requests.
    fn try_claim_request(&self) -> bool {
        if let (Some(counter), Some(total)) = (&self.request_counter, self.total_requests) {
            let claimed = counter.fetch_add(1, Ordering::SeqCst);
            if claimed >= total {
                counter.fetch_sub(1, Ordering::SeqCst);
                return false;
            }
        }
        true
    }

    /// Return a claimed slot that did not produce a success
    fn release_request(&self) {
        if let Some(counter) = &self.request_counter {
            counter.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn should_stop(&self, stats: &WorkerStats) -> bool {
        match &self.stop_condition {
            StopCondition::Duration(duration) => stats
                .started_at
                .map(|start| start.elapsed() >= *duration)
                .unwrap_or(false),
            // RequestCount is enforced through the shared counter
            StopCondition::RequestCount(_) | StopCondition::Indefinite => false,
        }
    }

    fn too_many_failures(&self, stats: &WorkerStats) -> bool {
        self.max_consecutive_failures
            .is_some_and(|max| stats.consecutive_errors >= max)
    }

    /// Get the worker ID
    pub fn id(&self) -> usize {
        self.id
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("driver", &self.driver.driver_name())
            .field("sampler", &self.sampler.name())
            .field("rate_limiter", &self.rate_limiter)
            .field("stop_condition", &self.stop_condition)
            .field("backoff", &self.backoff)
            .field("max_consecutive_failures", &self.max_consecutive_failures)
            .finish()
    }
}
