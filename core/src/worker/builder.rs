//! Builder pattern for Worker construction

use crate::config::DEFAULT_BACKOFF;
use crate::error::{BenchError, BenchResult};
use crate::stats::StatsAggregator;
use crate::traits::{RequestDriver, Sampler, StopCondition};

use super::executor::Worker;
use super::rate_limiter::RequestRateLimiter;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating Worker instances
///
/// # Example
/// ```ignore
/// let worker = WorkerBuilder::new(0)
///     .driver(driver)
///     .sampler(sampler)
///     .stats(stats)
///     .backoff(Duration::from_secs(1))
///     .build()?;
/// ```
pub struct WorkerBuilder {
    id: usize,
    driver: Option<Arc<dyn RequestDriver>>,
    sampler: Option<Arc<dyn Sampler>>,
    stats: Option<Arc<StatsAggregator>>,
    stop_condition: StopCondition,
    backoff: Duration,
    max_consecutive_failures: Option<u32>,
    rate_limit: Option<f64>,
    request_counter: Option<(Arc<AtomicUsize>, usize)>,
}

impl WorkerBuilder {
    /// Create a new builder with the given worker ID
    pub fn new(id: usize) -> Self {
        Self {
            id,
            driver: None,
            sampler: None,
            stats: None,
            stop_condition: StopCondition::Indefinite,
            backoff: DEFAULT_BACKOFF,
            max_consecutive_failures: None,
            rate_limit: None,
            request_counter: None,
        }
    }

    /// Set the request driver
    pub fn driver(mut self, driver: Arc<dyn RequestDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Set the sampler
    pub fn sampler(mut self, sampler: Arc<dyn Sampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// Set the shared aggregator
    pub fn stats(mut self, stats: Arc<StatsAggregator>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Set the stop condition (default: indefinite)
    pub fn stop_condition(mut self, condition: StopCondition) -> Self {
        self.stop_condition = condition;
        self
    }

    /// Set the failure backoff (default: 1s)
    pub fn backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Cap consecutive failures (default: unbounded)
    pub fn max_consecutive_failures(mut self, n: Option<u32>) -> Self {
        self.max_consecutive_failures = n;
        self
    }

    /// Set the rate limit (requests per second)
    pub fn rate_limit(mut self, rps: Option<f64>) -> Self {
        self.rate_limit = rps;
        self
    }

    /// Share a request slot counter with the rest of the pool
    pub fn request_counter(mut self, counter: Arc<AtomicUsize>, total: usize) -> Self {
        self.request_counter = Some((counter, total));
        self
    }

    /// Build the Worker
    ///
    /// # Errors
    /// Returns an error if the driver, sampler or aggregator is missing.
    pub fn build(self) -> BenchResult<Worker> {
        let driver = self.driver.ok_or(BenchError::missing_config("driver"))?;
        let sampler = self.sampler.ok_or(BenchError::missing_config("sampler"))?;
        let stats = self.stats.ok_or(BenchError::missing_config("stats"))?;

        let mut worker = Worker::new(
            self.id,
            driver,
            sampler,
            stats,
            self.stop_condition,
            self.backoff,
        )
        .with_rate_limiter(RequestRateLimiter::new(self.rate_limit))
        .with_max_consecutive_failures(self.max_consecutive_failures);

        if let Some((counter, total)) = self.request_counter {
            worker = worker.with_request_counter(counter, total);
        }

        Ok(worker)
    }
}
