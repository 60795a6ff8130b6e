//! Per-worker counters
//!
//! These are owned by a single worker and never shared, so they need no
//! locking. The global, shared counters live in [`crate::stats`].

use std::time::{Duration, Instant};

/// Statistics tracked by each worker
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    /// Worker identifier
    pub worker_id: usize,

    /// Successful requests
    pub completed: usize,

    /// Failed attempts
    pub errors: usize,

    /// Failures since the last success
    pub consecutive_errors: u32,

    /// Completion tokens from successful requests
    pub tokens: u64,

    /// Worker start time
    pub started_at: Option<Instant>,

    /// Worker end time
    pub ended_at: Option<Instant>,
}

impl WorkerStats {
    /// Create new empty stats for `worker_id`
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            ..Default::default()
        }
    }

    /// Start tracking (records start time)
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop tracking (records end time)
    pub fn stop(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Time since start (or until stop, once stopped)
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|start| {
            self.ended_at
                .map(|end| end.duration_since(start))
                .unwrap_or_else(|| start.elapsed())
        })
    }

    /// Record a successful request
    pub fn record_success(&mut self, tokens: u64) {
        self.completed += 1;
        self.consecutive_errors = 0;
        self.tokens += tokens;
    }

    /// Record a failed attempt
    pub fn record_error(&mut self) {
        self.errors += 1;
        self.consecutive_errors += 1;
    }
}
