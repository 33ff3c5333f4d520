//! The inference client: one provider call per analysis.

use super::credentials::ApiKeySource;
use super::error::AnalysisError;
use super::image::UploadedImage;
use super::prompt::PromptTemplate;
use crate::analysis::{contract, parse_analysis, AnalysisResult, ContractViolation, SkinHue};
use crate::llm::{GenerationOptions, VisionProvider, VisionRequest};
use crate::seasons::undertone_family;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Default inline payload limit, in bytes.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// Sends one image to a vision provider under the result contract and
/// returns the validated result.
///
/// The client never retries. Cloning shares the underlying provider.
#[derive(Clone)]
pub struct InferenceClient {
    provider: Arc<dyn VisionProvider>,
    credentials: ApiKeySource,
    options: GenerationOptions,
    max_image_bytes: usize,
}

impl InferenceClient {
    pub fn new(provider: Arc<dyn VisionProvider>, credentials: ApiKeySource) -> Self {
        Self {
            provider,
            credentials,
            options: GenerationOptions::default(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn credentials(&self) -> &ApiKeySource {
        &self.credentials
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    /// Analyzes one image.
    ///
    /// Credentials are resolved before anything else, so a missing key fails
    /// without any network attempt.
    pub async fn analyze(
        &self,
        image: &UploadedImage,
        prompt: &PromptTemplate,
    ) -> Result<AnalysisResult, AnalysisError> {
        let result = self.analyze_once(image, prompt).await;

        match &result {
            Ok(analysis) => {
                info!(
                    provider = self.provider.name(),
                    season = %analysis.season_id,
                    confidence = analysis.confidence,
                    "Analysis completed"
                );
                warn_on_incoherent_undertone(analysis);
            }
            Err(e @ AnalysisError::ContractViolation(_)) => {
                error!(
                    provider = self.provider.name(),
                    model = self.provider.model(),
                    kind = %e.kind(),
                    error = %e,
                    "Provider answer does not satisfy the result contract"
                );
            }
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    kind = %e.kind(),
                    retryable = e.is_retryable(),
                    error = %e,
                    "Analysis failed"
                );
            }
        }

        result
    }

    async fn analyze_once(
        &self,
        image: &UploadedImage,
        prompt: &PromptTemplate,
    ) -> Result<AnalysisResult, AnalysisError> {
        let api_key = self.credentials.resolve().await?;

        if image.size() > self.max_image_bytes {
            return Err(AnalysisError::ImageTooLarge {
                size: image.size(),
                limit: self.max_image_bytes,
            });
        }

        let schema = contract().render(self.provider.schema_dialect());
        let image_base64 = image.to_base64();
        let request = VisionRequest {
            api_key: &api_key,
            system_instruction: &prompt.system_instruction,
            user_text: &prompt.user_text,
            image_mime: image.mime_type(),
            image_base64: &image_base64,
            response_schema: &schema,
        };

        debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            mime = image.mime_type(),
            size = image.size(),
            "Calling vision provider"
        );

        let response = tokio::time::timeout(
            self.options.timeout,
            self.provider.generate(&request, &self.options),
        )
        .await
        .map_err(|_| AnalysisError::Transport("Provider call timed out".to_string()))?
        .map_err(|e| AnalysisError::from_provider(e, image.size(), self.max_image_bytes))?;

        if let Some(usage) = response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                finish_reason = ?response.finish_reason,
                "Provider token usage"
            );
        }

        let text = response.text.ok_or(ContractViolation::EmptyBody)?;
        Ok(parse_analysis(&text)?)
    }

    /// Verifies the provider is reachable and accepts the configured key.
    pub async fn health_check(&self) -> Result<(), AnalysisError> {
        let api_key = self.credentials.resolve().await?;
        self.provider
            .health_check(&api_key)
            .await
            .map_err(|e| AnalysisError::from_provider(e, 0, self.max_image_bytes))
    }
}

/// A season whose undertone family contradicts the reported skin hue is kept,
/// but worth a warning: it usually means the model drifted.
fn warn_on_incoherent_undertone(result: &AnalysisResult) {
    let season_family = undertone_family(result.season_id.entry().characteristics.undertone);
    let contradicts = match result.skin_analysis.hue {
        SkinHue::Warm => season_family == "Cool",
        SkinHue::Cool => season_family == "Warm",
        SkinHue::Neutral => false,
    };
    if contradicts {
        warn!(
            season = %result.season_id,
            skin_hue = %result.skin_analysis.hue,
            season_undertone = season_family,
            "Season undertone contradicts the reported skin hue"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SchemaDialect;
    use crate::inference::image::ImageInput;
    use crate::llm::{FinishReason, ProviderError, ProviderResponse};
    use crate::seasons::SeasonId;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];

    const VALID_BODY: &str = r#"{
        "seasonId": "DARK_AUTUMN",
        "confidence": 0.87,
        "reasoning": "Deep warm skin with muted features.",
        "skinAnalysis": {"hue": "Warm", "value": "Deep", "chroma": "Muted"},
        "hairDiagnosis": {
            "naturalLevel": 6,
            "undertone": "Orange",
            "recommendedFormula": "Golden Copper Brown",
            "technicalCode": "6.34",
            "developerVol": "20 Vol",
            "explanation": "Warm reflects harmonize with the skin."
        }
    }"#;

    enum Behavior {
        Answer(Option<String>),
        Fail(fn() -> ProviderError),
        Hang,
    }

    struct MockProvider {
        behavior: Behavior,
        calls: AtomicUsize,
        last_request: Mutex<Option<(String, String, String)>>,
    }

    impl MockProvider {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VisionProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-model"
        }

        fn schema_dialect(&self) -> SchemaDialect {
            SchemaDialect::Gemini
        }

        async fn generate(
            &self,
            request: &VisionRequest<'_>,
            _options: &GenerationOptions,
        ) -> Result<ProviderResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some((
                request.api_key.to_string(),
                request.image_mime.to_string(),
                request.image_base64.to_string(),
            ));
            match &self.behavior {
                Behavior::Answer(text) => Ok(ProviderResponse {
                    text: text.clone(),
                    finish_reason: FinishReason::Stop,
                    usage: None,
                }),
                Behavior::Fail(make) => Err(make()),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    unreachable!()
                }
            }
        }

        async fn health_check(&self, _api_key: &str) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    fn make_image() -> UploadedImage {
        UploadedImage::decode(ImageInput::Bytes(PNG_HEADER.to_vec())).unwrap()
    }

    fn make_client(provider: Arc<MockProvider>) -> InferenceClient {
        InferenceClient::new(provider, ApiKeySource::Static("test-key".to_string()))
    }

    #[tokio::test]
    async fn test_successful_analysis() {
        let provider = MockProvider::new(Behavior::Answer(Some(VALID_BODY.to_string())));
        let client = make_client(provider.clone());

        let result = client
            .analyze(&make_image(), &PromptTemplate::seasonal())
            .await
            .unwrap();

        assert_eq!(result.season_id, SeasonId::DarkAutumn);
        assert_eq!(result.hair_diagnosis.natural_level, 6);
        assert_eq!(result.hair_diagnosis.technical_code, "6.34");
        assert_eq!(provider.call_count(), 1);

        let (key, mime, base64) = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(key, "test-key");
        assert_eq!(mime, "image/png");
        assert!(!base64.starts_with("data:"));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_network() {
        let provider = MockProvider::new(Behavior::Answer(Some(VALID_BODY.to_string())));
        let client = InferenceClient::new(
            provider.clone(),
            ApiKeySource::Env("CHROMAVISAGE_CLIENT_TEST_MISSING_KEY".to_string()),
        );

        let err = client
            .analyze(&make_image(), &PromptTemplate::seasonal())
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Configuration(_)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_body_is_contract_violation() {
        let provider = MockProvider::new(Behavior::Answer(None));
        let client = make_client(provider.clone());

        let err = client
            .analyze(&make_image(), &PromptTemplate::seasonal())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AnalysisError::ContractViolation(ContractViolation::EmptyBody)
        );
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_image_too_large_checked_locally() {
        let provider = MockProvider::new(Behavior::Answer(Some(VALID_BODY.to_string())));
        let client = make_client(provider.clone()).with_max_image_bytes(4);

        let err = client
            .analyze(&make_image(), &PromptTemplate::seasonal())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AnalysisError::ImageTooLarge {
                size: PNG_HEADER.len(),
                limit: 4
            }
        );
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failures_are_not_retried() {
        let provider = MockProvider::new(Behavior::Fail(|| ProviderError::Api {
            status: 503,
            message: "overloaded".to_string(),
        }));
        let client = make_client(provider.clone());

        let err = client
            .analyze(&make_image(), &PromptTemplate::seasonal())
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_refusal() {
        let provider = MockProvider::new(Behavior::Fail(|| {
            ProviderError::Refused("SAFETY".to_string())
        }));
        let err = make_client(provider)
            .analyze(&make_image(), &PromptTemplate::seasonal())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Refused(_)));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_transport() {
        let provider = MockProvider::new(Behavior::Hang);
        let client = make_client(provider).with_options(GenerationOptions {
            timeout: Duration::from_millis(50),
            ..Default::default()
        });

        let err = client
            .analyze(&make_image(), &PromptTemplate::seasonal())
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Transport(msg) if msg.contains("timed out")));
    }
}
