//! OpenAI-compatible vision provider implementation.
//!
//! Works with OpenAI and any other service implementing the chat completions
//! API with image inputs and `json_schema` structured outputs.

use super::provider::{GenerationOptions, ProviderError, VisionProvider};
use super::types::{FinishReason, ProviderResponse, TokenUsage, VisionRequest};
use crate::analysis::SchemaDialect;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Name under which the result schema is registered in `response_format`.
const SCHEMA_NAME: &str = "seasonal_analysis";

/// OpenAI-compatible vision provider.
pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI-compatible provider.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the API (e.g., "https://api.openai.com/v1").
    /// * `model` - Model to use (e.g., "gpt-4o", "gpt-4o-mini").
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn to_openai_request(
        &self,
        request: &VisionRequest<'_>,
        options: &GenerationOptions,
    ) -> OpenAIChatRequest {
        let data_url = format!("data:{};base64,{}", request.image_mime, request.image_base64);

        OpenAIChatRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: vec![OpenAIContentPart::Text {
                        text: request.system_instruction.to_string(),
                    }],
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: vec![
                        OpenAIContentPart::Text {
                            text: request.user_text.to_string(),
                        },
                        OpenAIContentPart::ImageUrl {
                            image_url: OpenAIImageUrl { url: data_url },
                        },
                    ],
                },
            ],
            response_format: OpenAIResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: OpenAIJsonSchema {
                    name: SCHEMA_NAME.to_string(),
                    strict: true,
                    schema: request.response_schema.clone(),
                },
            },
            temperature: Some(options.temperature),
            max_tokens: options.max_output_tokens,
        }
    }
}

fn classify_error(status: u16, body: String) -> ProviderError {
    let message = serde_json::from_str::<OpenAIErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    match status {
        401 | 403 => ProviderError::Unauthorized(message),
        413 => ProviderError::PayloadTooLarge,
        429 => ProviderError::RateLimited,
        _ => ProviderError::Api { status, message },
    }
}

fn interpret_response(response: OpenAIChatResponse) -> Result<ProviderResponse, ProviderError> {
    let usage = response.usage.map(|u| TokenUsage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    let Some(choice) = response.choices.into_iter().next() else {
        return Ok(ProviderResponse {
            text: None,
            finish_reason: FinishReason::Other("no_choices".to_string()),
            usage,
        });
    };

    if let Some(refusal) = choice.message.refusal {
        return Err(ProviderError::Refused(refusal));
    }

    let finish_reason = match choice.finish_reason.as_deref() {
        Some("content_filter") => {
            return Err(ProviderError::Refused("content_filter".to_string()));
        }
        Some("length") => FinishReason::MaxTokens,
        Some("stop") | None => FinishReason::Stop,
        Some(other) => FinishReason::Other(other.to_string()),
    };

    Ok(ProviderResponse {
        text: choice
            .message
            .content
            .filter(|content| !content.trim().is_empty()),
        finish_reason,
        usage,
    })
}

#[async_trait]
impl VisionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn schema_dialect(&self) -> SchemaDialect {
        SchemaDialect::JsonSchema
    }

    async fn generate(
        &self,
        request: &VisionRequest<'_>,
        options: &GenerationOptions,
    ) -> Result<ProviderResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.to_openai_request(request, options);

        debug!(
            model = %self.model,
            mime = request.image_mime,
            image_base64_len = request.image_base64.len(),
            "Sending completion request to OpenAI-compatible API"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", request.api_key))
            .json(&body)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = classify_error(status.as_u16(), body);
            warn!(status = status.as_u16(), error = %error, "OpenAI-compatible request failed");
            return Err(error);
        }

        let openai_response: OpenAIChatResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse OpenAI response: {}", e))
        })?;

        let answer = interpret_response(openai_response)?;

        debug!(
            finish_reason = ?answer.finish_reason,
            has_text = answer.text.is_some(),
            "Received completion response from OpenAI-compatible API"
        );

        Ok(answer)
    }

    async fn health_check(&self, api_key: &str) -> Result<(), ProviderError> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status.as_u16(), body));
        }

        Ok(())
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAIChatRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    response_format: OpenAIResponseFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: Vec<OpenAIContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OpenAIContentPart {
    Text { text: String },
    ImageUrl { image_url: OpenAIImageUrl },
}

#[derive(Debug, Serialize)]
struct OpenAIImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct OpenAIResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
    json_schema: OpenAIJsonSchema,
}

#[derive(Debug, Serialize)]
struct OpenAIJsonSchema {
    name: String,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct OpenAIChatResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorEnvelope {
    error: OpenAIErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorBody {
    message: String,
}
