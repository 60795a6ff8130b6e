//! Global run statistics shared by all workers
//!
//! [`StatsAggregator`] guards the three run counters (completed requests,
//! cumulative latency, cumulative tokens) with a single lock. The only way
//! to change them is [`StatsAggregator::apply`], which also hands back a
//! [`Snapshot`] taken inside the same critical section, so a caller never
//! sees a count that disagrees with the totals.
//!
//! The lock is a `parking_lot::Mutex` rather than an async mutex: the
//! critical section is a handful of additions and never awaits.

use crate::response::Completion;
use parking_lot::Mutex;
use std::fmt;
use std::time::Duration;

/// The guarded counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct SharedStats {
    completed: u64,
    total_time: Duration,
    total_tokens: u64,
    last_duration: Duration,
}

impl SharedStats {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            completed: self.completed,
            total_time: self.total_time,
            total_tokens: self.total_tokens,
            average_time: average(self.total_time, self.completed),
            last_duration: self.last_duration,
        }
    }
}

fn average(total: Duration, count: u64) -> Duration {
    if count == 0 {
        Duration::ZERO
    } else {
        Duration::from_nanos((total.as_nanos() / u128::from(count)) as u64)
    }
}

/// A consistent view of the counters at one instant
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Snapshot {
    /// Successful requests applied so far
    pub completed: u64,
    /// Sum of request latencies
    pub total_time: Duration,
    /// Sum of completion tokens
    pub total_tokens: u64,
    /// `total_time / completed`, zero before the first completion
    pub average_time: Duration,
    /// Latency of the request that produced this snapshot
    pub last_duration: Duration,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tasks: {} | Avg Time: {:.2}s | Total Tokens: {} | Last Request: {:.2}s",
            self.completed,
            self.average_time.as_secs_f64(),
            self.total_tokens,
            self.last_duration.as_secs_f64()
        )
    }
}

/// Process-wide accumulator for successful requests
#[derive(Debug, Default)]
pub struct StatsAggregator {
    inner: Mutex<SharedStats>,
}

impl StatsAggregator {
    /// Create an aggregator with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful request and return the resulting snapshot
    pub fn apply(&self, completion: &Completion) -> Snapshot {
        let mut stats = self.inner.lock();
        stats.completed += 1;
        stats.total_time += completion.duration;
        stats.total_tokens += completion.tokens;
        stats.last_duration = completion.duration;
        stats.snapshot()
    }

    /// Read the counters without changing them
    ///
    /// Used for end-of-run summaries; progress reporting goes through
    /// [`apply`](Self::apply).
    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot()
    }
}
