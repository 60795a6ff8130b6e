//! Error types for ocr-bench-core

use crate::config::ConfigError;
use crate::traits::{DriverError, SamplerError};
use thiserror::Error;

/// Harness-level error
///
/// Per-request failures ([`DriverError`]) are normally absorbed by the
/// worker loop; they only show up here when they escape a code path that
/// cannot back off and retry.
#[derive(Error, Debug)]
pub enum BenchError {
    /// Configuration failed validation
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A builder was finalised without a required component
    #[error("missing required component: {0}")]
    MissingConfig(&'static str),

    /// Corpus or sampler error (including an empty corpus)
    #[error(transparent)]
    Sampler(#[from] SamplerError),

    /// Request driver error
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Worker pool failure
    #[error("orchestration error: {0}")]
    Orchestration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchError {
    /// A builder is missing the named component
    pub fn missing_config(name: &'static str) -> Self {
        BenchError::MissingConfig(name)
    }

    /// Worker pool level failure
    pub fn orchestration(message: impl Into<String>) -> Self {
        BenchError::Orchestration(message.into())
    }

    /// Whether this error means the corpus had nothing to sample
    pub fn is_corpus_empty(&self) -> bool {
        matches!(self, BenchError::Sampler(SamplerError::CorpusEmpty { .. }))
    }
}

/// Result type alias
pub type BenchResult<T> = std::result::Result<T, BenchError>;
