//! End-of-run summary from per-worker results

use std::time::Duration;

use crate::worker::WorkerStats;

/// Summary of a finished run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of workers that reported back
    pub total_workers: usize,

    /// Successful requests
    pub total_completed: usize,

    /// Failed attempts
    pub total_errors: usize,

    /// Completion tokens from successful requests
    pub total_tokens: u64,

    /// Longest worker lifetime
    pub total_duration: Duration,

    /// Successful requests per second of wall time
    pub requests_per_second: f64,

    /// Completion tokens per second of wall time
    pub tokens_per_second: f64,
}

impl RunSummary {
    /// Attempts made (successes + failures)
    pub fn total_attempts(&self) -> usize {
        self.total_completed + self.total_errors
    }

    /// Fraction of attempts that succeeded (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        let total = self.total_attempts();
        if total > 0 {
            self.total_completed as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Combine per-worker stats into a run summary
pub fn aggregate_worker_stats(stats: &[WorkerStats]) -> RunSummary {
    if stats.is_empty() {
        return RunSummary::default();
    }

    let total_completed: usize = stats.iter().map(|s| s.completed).sum();
    let total_errors: usize = stats.iter().map(|s| s.errors).sum();
    let total_tokens: u64 = stats.iter().map(|s| s.tokens).sum();

    // Workers run side by side, so wall time is the longest one
    let total_duration = stats
        .iter()
        .filter_map(|s| s.elapsed())
        .max()
        .unwrap_or(Duration::ZERO);

    let secs = total_duration.as_secs_f64();
    let rate_multiplier = if secs > 0.0 { 1.0 / secs } else { 0.0 };

    RunSummary {
        total_workers: stats.len(),
        total_completed,
        total_errors,
        total_tokens,
        total_duration,
        requests_per_second: total_completed as f64 * rate_multiplier,
        tokens_per_second: total_tokens as f64 * rate_multiplier,
    }
}
