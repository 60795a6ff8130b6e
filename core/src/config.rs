//! Harness configuration types

use crate::traits::StopCondition;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay after a failed attempt before the worker tries again
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Harness configuration
///
/// Defines how the worker pool runs: how many workers, when to stop,
/// and how workers react to failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Number of concurrent worker tasks
    pub concurrency: usize,

    /// Stop condition: indefinite, duration or successful request count
    pub stop_condition: StopCondition,

    /// Fixed delay after a failed attempt
    pub backoff: Duration,

    /// Stop a worker after this many failures in a row (None = never)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_consecutive_failures: Option<u32>,

    /// Optional per-worker rate limiting (requests per second)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<f64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            stop_condition: StopCondition::default(),
            backoff: DEFAULT_BACKOFF,
            max_consecutive_failures: None,
            rate_limit: None,
        }
    }
}

impl HarnessConfig {
    /// Create a new config with the given concurrency
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency,
            ..Default::default()
        }
    }

    /// Set the stop condition
    pub fn with_stop_condition(mut self, stop: StopCondition) -> Self {
        self.stop_condition = stop;
        self
    }

    /// Set the failure backoff
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Stop workers after `n` consecutive failures
    pub fn with_max_consecutive_failures(mut self, n: u32) -> Self {
        self.max_consecutive_failures = Some(n);
        self
    }

    /// Set the rate limit
    pub fn with_rate_limit(mut self, rps: f64) -> Self {
        self.rate_limit = Some(rps);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(
                "concurrency must be at least 1".into(),
            ));
        }

        if let Some(rps) = self.rate_limit {
            if rps <= 0.0 || !rps.is_finite() {
                return Err(ConfigError::InvalidRateLimit(
                    "rate limit must be positive".into(),
                ));
            }
            if Duration::try_from_secs_f64(1.0 / rps).is_err() {
                return Err(ConfigError::InvalidRateLimit(format!(
                    "rate limit {rps} is too small to pace requests"
                )));
            }
        }

        if self.max_consecutive_failures == Some(0) {
            return Err(ConfigError::InvalidFailurePolicy(
                "max consecutive failures must be at least 1".into(),
            ));
        }

        match self.stop_condition {
            StopCondition::RequestCount(0) => {
                return Err(ConfigError::InvalidStopCondition(
                    "request count must be at least 1".into(),
                ));
            }
            StopCondition::Duration(d) if d.is_zero() => {
                return Err(ConfigError::InvalidStopCondition(
                    "duration must be non-zero".into(),
                ));
            }
            _ => {}
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid concurrency value
    #[error("Invalid concurrency: {0}")]
    InvalidConcurrency(String),

    /// Invalid rate limit
    #[error("Invalid rate limit: {0}")]
    InvalidRateLimit(String),

    /// Invalid failure policy
    #[error("Invalid failure policy: {0}")]
    InvalidFailurePolicy(String),

    /// Invalid stop condition
    #[error("Invalid stop condition: {0}")]
    InvalidStopCondition(String),
}
