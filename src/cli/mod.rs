//! CLI argument parsing and run dispatch

mod run;

pub use run::run;

use clap::Parser;
use ocr_bench_core::{HarnessConfig, StopCondition};
use ocr_bench_vendors::{EndpointConfig, DEFAULT_PROMPT};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "ocr-bench")]
#[command(author, version, about = "Stress test an OCR model behind an OpenAI-compatible API", long_about = None)]
pub struct Cli {
    /// Folder containing images (searched recursively)
    pub folder: PathBuf,

    /// Number of concurrent requests
    #[arg(short, long, default_value_t = 1)]
    pub concurrency: usize,

    /// Base URL for the API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub url: String,

    /// API key
    #[arg(long, env = "OPENAI_API_KEY", default_value = "no-key", hide_env_values = true)]
    pub key: String,

    /// Model name to use
    #[arg(long, default_value = "rednote-hilab/dots.ocr")]
    pub model: String,

    /// Instruction sent with every image (default: layout extraction)
    #[arg(long)]
    pub prompt: Option<String>,

    /// Completion token limit
    #[arg(long, default_value_t = 16_000)]
    pub max_tokens: u32,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.1)]
    pub temperature: f32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 600)]
    pub timeout_secs: u64,

    /// Delay after a failed request, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub backoff_ms: u64,

    /// Stop a worker after this many failures in a row (default: never)
    #[arg(long)]
    pub max_consecutive_failures: Option<u32>,

    /// Per-worker request rate limit (requests per second)
    #[arg(long)]
    pub rate_limit: Option<f64>,

    /// Stop after this many seconds
    #[arg(long, conflicts_with = "requests")]
    pub duration_secs: Option<u64>,

    /// Stop after this many successful requests
    #[arg(long)]
    pub requests: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Endpoint settings for the request driver
    pub fn endpoint_config(&self) -> EndpointConfig {
        EndpointConfig::new(&self.url)
            .with_api_key(&self.key)
            .with_model(&self.model)
            .with_prompt(self.prompt.as_deref().unwrap_or(DEFAULT_PROMPT))
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    /// Worker pool settings
    pub fn harness_config(&self) -> HarnessConfig {
        let stop_condition = match (self.duration_secs, self.requests) {
            (Some(secs), _) => StopCondition::Duration(Duration::from_secs(secs)),
            (None, Some(n)) => StopCondition::RequestCount(n),
            (None, None) => StopCondition::Indefinite,
        };

        HarnessConfig {
            concurrency: self.concurrency,
            stop_condition,
            backoff: Duration::from_millis(self.backoff_ms),
            max_consecutive_failures: self.max_consecutive_failures,
            rate_limit: self.rate_limit,
        }
    }
}
