//! Clients wired to a mock provider server

use super::constants::*;
use super::server::MockProviderServer;
use chromavisage::inference::{ApiKeySource, InferenceClient};
use chromavisage::llm::{GeminiProvider, GenerationOptions, OpenAiProvider};
use std::sync::Arc;
use std::time::Duration;

/// Generation options with a timeout short enough for tests.
pub fn test_options() -> GenerationOptions {
    GenerationOptions {
        timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

pub fn gemini_client(server: &MockProviderServer, credentials: ApiKeySource) -> InferenceClient {
    let provider = GeminiProvider::new(&server.base_url, GEMINI_TEST_MODEL);
    InferenceClient::new(Arc::new(provider), credentials).with_options(test_options())
}

pub fn openai_client(server: &MockProviderServer, credentials: ApiKeySource) -> InferenceClient {
    let provider = OpenAiProvider::new(&server.base_url, OPENAI_TEST_MODEL);
    InferenceClient::new(Arc::new(provider), credentials).with_options(test_options())
}

pub fn valid_key() -> ApiKeySource {
    ApiKeySource::Static(TEST_API_KEY.to_string())
}
