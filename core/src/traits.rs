//! Core traits for request drivers and samplers
//!
//! These traits are defined in core to avoid circular dependencies.
//! Implementations live in their respective crates (vendors/, samplers/).

use crate::response::Completion;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Request Driver Trait
// ============================================================================

/// Performs one unit of work against the endpoint under test
///
/// Given a corpus entry, a driver loads the artifact, issues a single remote
/// call and reports how long the call took and how many tokens it produced.
/// Drivers never retry internally; backoff is the worker's job.
#[async_trait]
pub trait RequestDriver: Send + Sync {
    /// Driver identifier (e.g., "openai")
    fn driver_name(&self) -> &str;

    /// Model identifier the driver targets
    fn model_name(&self) -> &str;

    /// Execute one request for the artifact at `path`
    async fn execute(&self, path: &Path) -> Result<Completion, DriverError>;
}

/// Coarse failure classification used for logging and per-worker stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Local artifact could not be read
    Io,
    /// Network, transport or endpoint failure
    Remote,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Io => write!(f, "io"),
            FailureKind::Remote => write!(f, "remote"),
        }
    }
}

/// A failed request attempt
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Reading the artifact failed
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Artifact that could not be read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The remote call failed
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl DriverError {
    /// Build an IO failure for `path`
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DriverError::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify this failure
    pub fn kind(&self) -> FailureKind {
        match self {
            DriverError::Io { .. } => FailureKind::Io,
            DriverError::Remote(_) => FailureKind::Remote,
        }
    }
}

/// Remote endpoint errors
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// HTTP/network error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("endpoint returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// Request timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Response body could not be decoded
    #[error("invalid response body: {0}")]
    Decode(String),
}

// ============================================================================
// Sampler Trait
// ============================================================================

/// Picks the next corpus entry for a worker
///
/// Sampling is uniform and with replacement: every call is an independent
/// draw, so a sampler never runs dry once it holds at least one entry.
pub trait Sampler: Send + Sync {
    /// Sampler name for identification (typically the corpus root)
    fn name(&self) -> &str;

    /// Number of entries available
    fn len(&self) -> usize;

    /// Whether there is nothing to sample
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Draw one entry
    fn sample(&self) -> Result<&Path, SamplerError>;
}

/// Sampler-specific errors
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    /// No eligible files were found under the corpus root
    #[error("no images found in {}", .root.display())]
    CorpusEmpty {
        /// Directory that was scanned
        root: PathBuf,
    },

    /// The sampler holds no entries
    #[error("sampler {0} has no entries")]
    Empty(String),
}

// ============================================================================
// Stop Condition
// ============================================================================

/// Run stop condition
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StopCondition {
    /// Run until explicitly stopped (Ctrl+C)
    #[default]
    Indefinite,

    /// Run for the specified duration
    Duration(Duration),

    /// Stop after exactly N successful requests across all workers
    RequestCount(usize),
}
