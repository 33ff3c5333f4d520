//! Gemini provider implementation.
//!
//! Uses the `generateContent` endpoint with native structured output:
//! the result contract travels as `generationConfig.responseSchema`.

use super::provider::{GenerationOptions, ProviderError, VisionProvider};
use super::types::{FinishReason, ProviderResponse, TokenUsage, VisionRequest};
use crate::analysis::SchemaDialect;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Finish reasons meaning the provider declined to answer.
const REFUSAL_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
    "IMAGE_SAFETY",
    "RECITATION",
];

/// Gemini provider.
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// # Arguments
    /// * `base_url` - API base URL (e.g., "https://generativelanguage.googleapis.com/v1beta").
    /// * `model` - Model to use (e.g., "gemini-2.5-flash").
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            model: model.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn to_gemini_request(
        request: &VisionRequest<'_>,
        options: &GenerationOptions,
    ) -> GeminiGenerateRequest {
        GeminiGenerateRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart::text(request.system_instruction)],
            },
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![
                    GeminiPart {
                        text: None,
                        inline_data: Some(GeminiInlineData {
                            mime_type: request.image_mime.to_string(),
                            data: request.image_base64.to_string(),
                        }),
                    },
                    GeminiPart::text(request.user_text),
                ],
            }],
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: request.response_schema.clone(),
                temperature: options.temperature,
                max_output_tokens: options.max_output_tokens,
            },
        }
    }
}

/// Classifies a non-success answer of the Gemini API.
fn classify_error(status: StatusCode, body: &str) -> ProviderError {
    let message = serde_json::from_str::<GeminiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status.as_u16() {
        401 | 403 => ProviderError::Unauthorized(message),
        413 => ProviderError::PayloadTooLarge,
        429 => ProviderError::RateLimited,
        400 if body.contains("API_KEY_INVALID") || message.contains("API key not valid") => {
            ProviderError::Unauthorized(message)
        }
        400 if message.contains("payload size exceeds") => ProviderError::PayloadTooLarge,
        code => ProviderError::Api {
            status: code,
            message,
        },
    }
}

/// Turns a successful response envelope into the provider-neutral answer.
fn interpret_response(response: GeminiGenerateResponse) -> Result<ProviderResponse, ProviderError> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(ProviderError::Refused(format!("prompt blocked: {}", reason)));
    }

    let usage = response.usage_metadata.map(|u| TokenUsage {
        prompt_tokens: u.prompt_token_count.unwrap_or(0),
        completion_tokens: u.candidates_token_count.unwrap_or(0),
        total_tokens: u.total_token_count.unwrap_or(0),
    });

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Ok(ProviderResponse {
            text: None,
            finish_reason: FinishReason::Other("NO_CANDIDATES".to_string()),
            usage,
        });
    };

    let finish_reason = match candidate.finish_reason.as_deref() {
        Some(reason) if REFUSAL_FINISH_REASONS.contains(&reason) => {
            return Err(ProviderError::Refused(format!("generation stopped: {}", reason)));
        }
        Some("STOP") | None => FinishReason::Stop,
        Some("MAX_TOKENS") => FinishReason::MaxTokens,
        Some(other) => FinishReason::Other(other.to_string()),
    };

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    Ok(ProviderResponse {
        text: if text.trim().is_empty() {
            None
        } else {
            Some(text)
        },
        finish_reason,
        usage,
    })
}

#[async_trait]
impl VisionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn schema_dialect(&self) -> SchemaDialect {
        SchemaDialect::Gemini
    }

    async fn generate(
        &self,
        request: &VisionRequest<'_>,
        options: &GenerationOptions,
    ) -> Result<ProviderResponse, ProviderError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = Self::to_gemini_request(request, options);

        debug!(
            model = %self.model,
            mime = request.image_mime,
            image_base64_len = request.image_base64.len(),
            temperature = options.temperature,
            "Sending generateContent request to Gemini"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", request.api_key)
            .json(&body)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = classify_error(status, &body);
            warn!(status = status.as_u16(), error = %error, "Gemini request failed");
            return Err(error);
        }

        let gemini_response: GeminiGenerateResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse Gemini response: {}", e))
        })?;

        let answer = interpret_response(gemini_response)?;

        debug!(
            finish_reason = ?answer.finish_reason,
            has_text = answer.text.is_some(),
            "Received generateContent response from Gemini"
        );

        Ok(answer)
    }

    async fn health_check(&self, api_key: &str) -> Result<(), ProviderError> {
        let url = format!("{}/models/{}", self.base_url, self.model);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status, &body));
        }

        Ok(())
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerateRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<GeminiInlineData>,
}

impl GeminiPart {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GeminiGenerateResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_request_shape() {
        let schema = json!({"type": "OBJECT"});
        let request = VisionRequest {
            api_key: "key",
            system_instruction: "You are a color analyst.",
            user_text: "Analyze this face.",
            image_mime: "image/png",
            image_base64: "iVBORw0KGgo=",
            response_schema: &schema,
        };
        let options = GenerationOptions {
            max_output_tokens: Some(2048),
            ..Default::default()
        };

        let body =
            serde_json::to_value(GeminiProvider::to_gemini_request(&request, &options)).unwrap();

        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You are a color analyst."
        );
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(
            body["contents"][0]["parts"][0]["inlineData"]["data"],
            "iVBORw0KGgo="
        );
        assert_eq!(body["contents"][0]["parts"][1]["text"], "Analyze this face.");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn test_trailing_slash_removal() {
        let provider = GeminiProvider::new("http://localhost:8080/", DEFAULT_MODEL);
        assert_eq!(provider.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_interpret_text_parts() {
        let answer = interpret_response(parse(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15}
        })))
        .unwrap();
        assert_eq!(answer.text.as_deref(), Some("{\"a\":1}"));
        assert_eq!(answer.finish_reason, FinishReason::Stop);
        assert_eq!(answer.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_interpret_blocked_prompt() {
        let result = interpret_response(parse(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })));
        assert!(matches!(result, Err(ProviderError::Refused(reason)) if reason.contains("SAFETY")));
    }

    #[test]
    fn test_interpret_safety_finish_reason() {
        let result = interpret_response(parse(json!({
            "candidates": [{"finishReason": "IMAGE_SAFETY"}]
        })));
        assert!(matches!(result, Err(ProviderError::Refused(_))));
    }

    #[test]
    fn test_interpret_empty_candidate() {
        let answer = interpret_response(parse(json!({
            "candidates": [{"content": {"parts": []}, "finishReason": "MAX_TOKENS"}]
        })))
        .unwrap();
        assert!(answer.text.is_none());
        assert_eq!(answer.finish_reason, FinishReason::MaxTokens);

        let answer = interpret_response(parse(json!({}))).unwrap();
        assert!(answer.text.is_none());
    }

    #[test]
    fn test_classify_errors() {
        let invalid_key = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            classify_error(StatusCode::BAD_REQUEST, invalid_key),
            ProviderError::Unauthorized(_)
        ));
        assert!(matches!(
            classify_error(StatusCode::FORBIDDEN, "denied"),
            ProviderError::Unauthorized(_)
        ));
        assert!(matches!(
            classify_error(StatusCode::PAYLOAD_TOO_LARGE, ""),
            ProviderError::PayloadTooLarge
        ));
        assert!(matches!(
            classify_error(StatusCode::TOO_MANY_REQUESTS, ""),
            ProviderError::RateLimited
        ));
        assert!(matches!(
            classify_error(StatusCode::SERVICE_UNAVAILABLE, r#"{"error":{"message":"overloaded"}}"#),
            ProviderError::Api { status: 503, message } if message == "overloaded"
        ));
    }
}
