//! Vision provider trait definition.

use super::types::{ProviderResponse, VisionRequest};
use crate::analysis::SchemaDialect;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Options for a generation request.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_output_tokens: Option<u32>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_output_tokens: None,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Errors that can occur when talking to a vision provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rejected credentials: {0}")]
    Unauthorized(String),

    #[error("Request payload too large")]
    PayloadTooLarge,

    #[error("Provider refused to analyze the input: {0}")]
    Refused(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,
}

impl ProviderError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Connection(e.to_string())
        }
    }
}

/// Trait for multimodal providers able to answer under a response schema.
///
/// Implementations issue exactly one request per [`generate`](Self::generate)
/// call and never retry.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Get the provider's name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Get the model being used.
    fn model(&self) -> &str;

    /// Dialect the response schema must be rendered in for this provider.
    fn schema_dialect(&self) -> SchemaDialect;

    /// Generate a structured answer about one image.
    async fn generate(
        &self,
        request: &VisionRequest<'_>,
        options: &GenerationOptions,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Check if the provider is reachable and accepts the key.
    async fn health_check(&self, api_key: &str) -> Result<(), ProviderError>;
}
