//! Worker module for executing load against the endpoint
//!
//! The Worker is the core execution unit in ocr-bench, responsible for the
//! simple but critical loop: **pick -> execute -> record -> repeat**.
//!
//! Each Worker is a tokio task that:
//!
//! 1. Draws a random corpus entry from the Sampler (with replacement)
//! 2. Hands it to the RequestDriver, which reads, encodes and sends it
//! 3. On success, applies the outcome to the shared StatsAggregator and
//!    logs the resulting snapshot
//! 4. On failure, logs the cause and sleeps for the fixed backoff
//! 5. Repeats until shutdown or the stop condition
//!
//! A failure never ends the loop by itself. With the default unbounded
//! retry policy a dead endpoint turns into roughly one failed attempt per
//! worker per backoff period.
//!
//! # Example
//!
//! ```ignore
//! use ocr_bench_core::worker::WorkerBuilder;
//!
//! let worker = WorkerBuilder::new(0)
//!     .driver(driver)
//!     .sampler(sampler)
//!     .stats(stats)
//!     .build()?;
//!
//! let stats = worker.run(shutdown_rx).await?;
//! println!("Completed: {}", stats.completed);
//! ```

mod builder;
mod executor;
mod rate_limiter;
mod stats;

pub use builder::WorkerBuilder;
pub use executor::Worker;
pub use rate_limiter::RequestRateLimiter;
pub use stats::WorkerStats;

#[cfg(test)]
mod tests;
