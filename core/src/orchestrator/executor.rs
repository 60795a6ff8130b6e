//! Orchestrator execution logic

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

use crate::config::HarnessConfig;
use crate::error::BenchResult;
use crate::shutdown::{self, ShutdownHandle};
use crate::stats::StatsAggregator;
use crate::traits::{RequestDriver, Sampler, StopCondition};
use crate::worker::{WorkerBuilder, WorkerStats};

use super::aggregator::aggregate_worker_stats;

/// Orchestrator manages the run lifecycle
///
/// Responsible for spawning workers, coordinating shutdown,
/// and collecting results.
pub struct Orchestrator {
    /// Harness configuration
    config: HarnessConfig,

    /// Request driver (shared across workers)
    driver: Arc<dyn RequestDriver>,

    /// Sampler (shared across workers)
    sampler: Arc<dyn Sampler>,

    /// Global counters (shared across workers)
    stats: Arc<StatsAggregator>,

    /// Run-wide shutdown level
    shutdown: ShutdownHandle,

    /// Shared slot counter for `StopCondition::RequestCount`
    request_counter: Arc<AtomicUsize>,
}

impl Orchestrator {
    /// Create a new orchestrator
    ///
    /// Use `OrchestratorBuilder` for validated construction.
    pub fn new(
        config: HarnessConfig,
        driver: Arc<dyn RequestDriver>,
        sampler: Arc<dyn Sampler>,
        stats: Arc<StatsAggregator>,
    ) -> Self {
        let (shutdown, _) = shutdown::channel();

        Self {
            config,
            driver,
            sampler,
            stats,
            shutdown,
            request_counter: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle that stops the run when `shutdown()` is called on it
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Trigger shutdown of all workers
    ///
    /// Shutdown is permanent: a `run` started afterwards returns at once.
    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }

    /// Get the harness configuration
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Global counters for this run
    pub fn stats(&self) -> &Arc<StatsAggregator> {
        &self.stats
    }

    /// Run the pool until every worker has stopped
    ///
    /// With `StopCondition::Indefinite` that only happens after
    /// [`shutdown`](Self::shutdown) (or a circuit breaker on every worker).
    pub async fn run(&self) -> BenchResult<Vec<WorkerStats>> {
        let start = Instant::now();

        let total_requests = match self.config.stop_condition {
            StopCondition::RequestCount(n) => Some(n),
            _ => None,
        };

        // Stop in-flight requests too, not just at the next loop iteration
        let timer = match self.config.stop_condition {
            StopCondition::Duration(limit) => Some(self.shutdown_after(limit)),
            _ => None,
        };

        tracing::info!(
            concurrency = self.config.concurrency,
            corpus_size = self.sampler.len(),
            driver = self.driver.driver_name(),
            model = self.driver.model_name(),
            stop_condition = ?self.config.stop_condition,
            "Starting stress run"
        );

        let mut handles = Vec::with_capacity(self.config.concurrency);
        for worker_id in 0..self.config.concurrency {
            let mut builder = WorkerBuilder::new(worker_id)
                .driver(Arc::clone(&self.driver))
                .sampler(Arc::clone(&self.sampler))
                .stats(Arc::clone(&self.stats))
                .stop_condition(self.config.stop_condition.clone())
                .backoff(self.config.backoff)
                .max_consecutive_failures(self.config.max_consecutive_failures)
                .rate_limit(self.config.rate_limit);

            if let Some(total) = total_requests {
                builder = builder.request_counter(Arc::clone(&self.request_counter), total);
            }

            let worker = builder.build()?;
            let shutdown_rx = self.shutdown.subscribe();

            handles.push(tokio::spawn(async move { worker.run(shutdown_rx).await }));
        }

        let mut results = Vec::with_capacity(handles.len());
        let mut worker_failures = 0;
        for (idx, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(Ok(stats)) => results.push(stats),
                Ok(Err(e)) => {
                    worker_failures += 1;
                    tracing::error!(worker_id = idx, error = %e, "Worker returned error");
                }
                Err(e) => {
                    worker_failures += 1;
                    tracing::error!(worker_id = idx, error = %e, "Worker task panicked");
                }
            }
        }

        if let Some(timer) = timer {
            timer.abort();
        }

        if results.is_empty() && worker_failures > 0 {
            return Err(crate::error::BenchError::orchestration(format!(
                "All {} workers failed",
                worker_failures
            )));
        }

        let summary = aggregate_worker_stats(&results);
        tracing::info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            completed = summary.total_completed,
            errors = summary.total_errors,
            tokens = summary.total_tokens,
            rps = summary.requests_per_second,
            "Stress run finished"
        );

        Ok(results)
    }

    /// Run with Ctrl+C signal handling
    ///
    /// Ctrl+C is a normal way to end the run: workers are told to stop
    /// and the collected stats are returned as usual.
    pub async fn run_with_signal_handling(&self) -> BenchResult<Vec<WorkerStats>> {
        let shutdown = self.shutdown.clone();

        let signal_handle = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Stopping stress test...");
                    shutdown.shutdown();
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                }
            }
        });

        let result = self.run().await;

        signal_handle.abort();

        result
    }

    /// Run with a timeout
    ///
    /// Triggers shutdown when the timeout is reached.
    pub async fn run_with_timeout(&self, timeout: Duration) -> BenchResult<Vec<WorkerStats>> {
        let timeout_handle = self.shutdown_after(timeout);

        let result = self.run().await;

        timeout_handle.abort();

        result
    }

    fn shutdown_after(&self, limit: Duration) -> JoinHandle<()> {
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(limit).await;
            tracing::info!(limit_secs = limit.as_secs_f64(), "Time limit reached, stopping");
            shutdown.shutdown();
        })
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("driver", &self.driver.driver_name())
            .field("sampler", &self.sampler.name())
            .finish()
    }
}
