//! OpenAI-compatible chat completions driver

use crate::config::{ConfigValidationError, EndpointConfig};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ocr_bench_core::{
    data_url, ChatCompletionRequest, ChatCompletionResponse, Completion, DriverError,
    RemoteError, RequestDriver, SamplingParams,
};
use reqwest::Client;
use std::path::Path;
use std::time::{Duration, Instant};

/// Sends one image per request to `{base_url}/chat/completions`
///
/// The HTTP client is built once and shared by every worker, so
/// connections are pooled across the whole run.
#[derive(Debug, Clone)]
pub struct OpenAIDriver {
    client: Client,
    config: EndpointConfig,
    url: String,
}

impl OpenAIDriver {
    /// Create a driver for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: EndpointConfig) -> Result<Self, ConfigValidationError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent(format!("ocr-bench/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let url = config.chat_url();
        Ok(Self {
            client,
            config,
            url,
        })
    }

    /// Endpoint configuration
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Full chat completions URL
    pub fn chat_url(&self) -> &str {
        &self.url
    }

    fn build_request(&self, path: &Path, bytes: &[u8]) -> ChatCompletionRequest {
        let image = data_url(mime_for(path), &STANDARD.encode(bytes));
        let params = SamplingParams {
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
            stream: false,
        };
        ChatCompletionRequest::vision(&self.config.model, &self.config.prompt, image, params)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> RemoteError {
        if err.is_timeout() {
            RemoteError::Timeout(self.config.timeout)
        } else {
            RemoteError::Http(err)
        }
    }
}

#[async_trait]
impl RequestDriver for OpenAIDriver {
    fn driver_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn execute(&self, path: &Path) -> Result<Completion, DriverError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DriverError::io(path, e))?;
        let request = self.build_request(path, &bytes);

        let start = Instant::now();
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))?;
        let duration = start.elapsed();

        tracing::debug!(
            path = %path.display(),
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            tokens = parsed.completion_tokens(),
            "Request completed"
        );

        Ok(Completion::new(duration, parsed.completion_tokens()))
    }
}

/// Image subtype for the `data:` URL, taken from the file extension
fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "png",
        "webp" => "webp",
        "gif" => "gif",
        _ => "jpeg",
    }
}
