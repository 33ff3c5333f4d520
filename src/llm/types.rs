//! Common types for provider interactions.

use serde_json::Value;

/// Everything a provider needs to analyze one image.
#[derive(Debug, Clone)]
pub struct VisionRequest<'a> {
    /// Credential resolved for this call.
    pub api_key: &'a str,
    pub system_instruction: &'a str,
    pub user_text: &'a str,
    pub image_mime: &'a str,
    /// Image bytes, base64 encoded without any data-URL header.
    pub image_base64: &'a str,
    /// Result contract already rendered in the provider's dialect.
    pub response_schema: &'a Value,
}

/// Why a generation finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    /// Natural end of response.
    Stop,
    /// Hit the maximum token limit.
    MaxTokens,
    /// Any other provider specific reason.
    Other(String),
}

/// Token usage information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Raw answer of a provider, before contract validation.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Generated text, expected to be the JSON document. `None` when the
    /// provider produced no text part at all.
    pub text: Option<String>,
    pub finish_reason: FinishReason,
    pub usage: Option<TokenUsage>,
}
