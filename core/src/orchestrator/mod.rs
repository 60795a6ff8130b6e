//! Orchestrator for run lifecycle management
//!
//! The Orchestrator coordinates the complete stress run:
//! - Refusing to start on an empty corpus
//! - Spawning one worker task per unit of concurrency
//! - Signalling shutdown on Ctrl+C, timeout or request
//! - Collecting per-worker results into a run summary
//!
//! # Example
//!
//! ```ignore
//! use ocr_bench_core::OrchestratorBuilder;
//!
//! let orchestrator = OrchestratorBuilder::new()
//!     .concurrency(8)
//!     .driver(driver)
//!     .sampler(sampler)
//!     .build()?;
//!
//! let stats = orchestrator.run_with_signal_handling().await?;
//! ```

mod aggregator;
mod builder;
mod executor;

pub use aggregator::{aggregate_worker_stats, RunSummary};
pub use builder::OrchestratorBuilder;
pub use executor::Orchestrator;
