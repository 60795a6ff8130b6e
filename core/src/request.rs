//! Chat completion request types (OpenAI-compatible wire format)

use serde::{Deserialize, Serialize};

/// A single chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Served model to target
    pub model: String,

    /// Conversation (a single user turn for this harness)
    pub messages: Vec<Message>,

    /// Decoding parameters, held constant for a whole run
    #[serde(flatten)]
    pub params: SamplingParams,
}

impl ChatCompletionRequest {
    /// Build a single-turn request asking `instruction` about one image
    pub fn vision(
        model: impl Into<String>,
        instruction: impl Into<String>,
        image_url: impl Into<String>,
        params: SamplingParams,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message {
                role: Role::User,
                content: vec![
                    ContentPart::text(instruction),
                    ContentPart::image_url(image_url),
                ],
            }],
            params,
        }
    }
}

/// Chat message carrying multimodal content parts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,
    /// Instruction text and image, in order
    pub content: Vec<ContentPart>,
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message (input)
    User,
}

/// Content part for multimodal messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    /// Text content part
    #[serde(rename = "text")]
    Text {
        /// The text content
        text: String,
    },

    /// Image URL content part
    #[serde(rename = "image_url")]
    ImageUrl {
        /// The image URL configuration
        image_url: ImageUrl,
    },
}

impl ContentPart {
    /// Create a text content part
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// Create an image URL content part
    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

/// Image reference; for this harness always an inline `data:` URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    /// The URL of the image
    pub url: String,
}

/// Format an inline image as `data:image/<format>;base64,<payload>`
pub fn data_url(format: &str, base64_payload: &str) -> String {
    format!("data:image/{format};base64,{base64_payload}")
}

/// Sampling parameters for generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Temperature for sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Whether to stream the response
    pub stream: bool,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: Some(0.1),
            max_tokens: Some(16_000),
            stream: false,
        }
    }
}
