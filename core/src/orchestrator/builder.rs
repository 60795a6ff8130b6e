//! Builder pattern for Orchestrator construction

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::HarnessConfig;
use crate::error::{BenchError, BenchResult};
use crate::stats::StatsAggregator;
use crate::traits::{RequestDriver, Sampler, SamplerError, StopCondition};

use super::executor::Orchestrator;

/// Builder for creating an Orchestrator with proper configuration
///
/// # Example
///
/// ```ignore
/// let orchestrator = OrchestratorBuilder::new()
///     .concurrency(10)
///     .stop_condition(StopCondition::Duration(Duration::from_secs(300)))
///     .driver(driver)
///     .sampler(sampler)
///     .build()?;
/// ```
pub struct OrchestratorBuilder {
    config: HarnessConfig,
    driver: Option<Arc<dyn RequestDriver>>,
    sampler: Option<Arc<dyn Sampler>>,
    stats: Option<Arc<StatsAggregator>>,
}

impl OrchestratorBuilder {
    /// Create a new orchestrator builder with default configuration
    pub fn new() -> Self {
        Self {
            config: HarnessConfig::default(),
            driver: None,
            sampler: None,
            stats: None,
        }
    }

    /// Set the full harness configuration
    pub fn config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the concurrency level
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Set the stop condition
    pub fn stop_condition(mut self, stop: StopCondition) -> Self {
        self.config.stop_condition = stop;
        self
    }

    /// Set the failure backoff
    pub fn backoff(mut self, backoff: Duration) -> Self {
        self.config.backoff = backoff;
        self
    }

    /// Set the consecutive failure cap
    pub fn max_consecutive_failures(mut self, n: Option<u32>) -> Self {
        self.config.max_consecutive_failures = n;
        self
    }

    /// Set the rate limit (requests per second, per worker)
    pub fn rate_limit(mut self, rps: Option<f64>) -> Self {
        self.config.rate_limit = rps;
        self
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

    /// Use an existing aggregator instead of a fresh one
    pub fn stats(mut self, stats: Arc<StatsAggregator>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Build the orchestrator
    ///
    /// # Errors
    ///
    /// Returns an error if the driver or sampler is not set, if
    /// configuration validation fails, or if the sampler has no entries
    /// (`SamplerError::CorpusEmpty`).
    pub fn build(self) -> BenchResult<Orchestrator> {
        let driver = self
            .driver
            .ok_or_else(|| BenchError::missing_config("driver"))?;

        let sampler = self
            .sampler
            .ok_or_else(|| BenchError::missing_config("sampler"))?;

        self.config.validate()?;

        if sampler.is_empty() {
            return Err(SamplerError::CorpusEmpty {
                root: PathBuf::from(sampler.name()),
            }
            .into());
        }

        let stats = self.stats.unwrap_or_default();

        Ok(Orchestrator::new(self.config, driver, sampler, stats))
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
