//! Optional request pacing for a single worker

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::time::Duration;

/// Token-bucket pacing backed by governor
///
/// Each worker owns its own limiter, so the effective pool-wide ceiling is
/// `rate_limit * concurrency`. Rates below 1 rps are honoured by spacing
/// permits out (0.5 rps means one request every two seconds).
pub struct RequestRateLimiter {
    limiter: Option<DefaultDirectRateLimiter>,
    rate_limit: Option<f64>,
}

impl RequestRateLimiter {
    /// Create a limiter for `rate_limit` requests per second; `None`,
    /// zero, negative or non-finite values disable pacing, as do rates
    /// whose period does not fit in a `Duration`.
    pub fn new(rate_limit: Option<f64>) -> Self {
        let limiter = rate_limit
            .filter(|rps| rps.is_finite() && *rps > 0.0)
            .and_then(|rps| Duration::try_from_secs_f64(1.0 / rps).ok())
            .and_then(Quota::with_period)
            .map(RateLimiter::direct);

        Self {
            limiter,
            rate_limit,
        }
    }

    /// Limiter that never waits
    pub fn unlimited() -> Self {
        Self::new(None)
    }

    /// Wait until the next request is allowed
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// Whether pacing is active
    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Configured requests per second
    pub fn rate_limit(&self) -> Option<f64> {
        self.rate_limit
    }
}

impl Default for RequestRateLimiter {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl std::fmt::Debug for RequestRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestRateLimiter")
            .field("rate_limit", &self.rate_limit)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
