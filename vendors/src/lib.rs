//! Request drivers for OpenAI-compatible vision endpoints
//!
//! This crate provides implementations of the `RequestDriver` trait for:
//!
//! - OpenAI-compatible `/chat/completions` servers (OpenAI, vLLM, SGLang, ...)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod openai;

pub use config::{ConfigValidationError, EndpointConfig, DEFAULT_PROMPT};
pub use openai::OpenAIDriver;
