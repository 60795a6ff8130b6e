//! Response types: the endpoint's wire format and the measured outcome

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A successful request, as measured by a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Wall-clock time of the remote call
    pub duration: Duration,
    /// Completion tokens reported by the endpoint (0 if not reported)
    pub tokens: u64,
}

impl Completion {
    /// Create a new completion
    pub fn new(duration: Duration, tokens: u64) -> Self {
        Self { duration, tokens }
    }
}

/// Chat completion response body
///
/// Only `usage` matters to the harness. The generated text is never
/// inspected, and unknown fields (`id`, `choices`, ...) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Token usage, if the server reports it
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Completion token count, defaulting to 0 when usage is absent
    pub fn completion_tokens(&self) -> u64 {
        self.usage
            .as_ref()
            .and_then(|u| u.completion_tokens)
            .unwrap_or(0)
    }
}

/// Token usage statistics from the endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Number of tokens in the completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>,
}
