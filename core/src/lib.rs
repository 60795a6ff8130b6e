//! ocr-bench-core: Core machinery for stress-testing vision chat endpoints
//!
//! This crate provides everything that does not depend on a concrete
//! endpoint or corpus format, including:
//!
//! - Protocol data structures (chat completion requests and responses)
//! - Core traits (RequestDriver, Sampler)
//! - The shared statistics aggregator
//! - Workers and the orchestrator that runs them
//! - Error handling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod request;
pub mod response;
pub mod shutdown;
pub mod stats;
pub mod traits;
pub mod worker;

#[cfg(test)]
mod mocks;

pub use config::{ConfigError, HarnessConfig, DEFAULT_BACKOFF};
pub use error::*;
pub use orchestrator::{aggregate_worker_stats, Orchestrator, OrchestratorBuilder, RunSummary};
pub use request::*;
pub use response::*;
pub use shutdown::{ShutdownHandle, ShutdownSignal};
pub use stats::{Snapshot, StatsAggregator};
pub use traits::*;
pub use worker::{RequestRateLimiter, Worker, WorkerBuilder, WorkerStats};
