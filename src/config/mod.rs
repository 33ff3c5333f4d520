mod file_config;

pub use file_config::{FileConfig, GenerationConfig};

use crate::inference::{ApiKeySource, InferenceClient};
use crate::llm::{gemini, openai, GeminiProvider, GenerationOptions, OpenAiProvider, VisionProvider};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::sync::Arc;
use std::time::Duration;

/// Backend used for the analysis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProviderKind {
    #[default]
    Gemini,
    /// Any OpenAI-compatible chat completions API.
    Openai,
}

impl ProviderKind {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => gemini::DEFAULT_BASE_URL,
            ProviderKind::Openai => openai::DEFAULT_BASE_URL,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => gemini::DEFAULT_MODEL,
            ProviderKind::Openai => openai::DEFAULT_MODEL,
        }
    }

    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Openai => "OPENAI_API_KEY",
        }
    }
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub provider: ProviderKind,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub api_key_command: Option<String>,
    pub max_image_mb: u64,
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
    pub timeout_sec: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: None,
            model: None,
            api_key_env: None,
            api_key_command: None,
            max_image_mb: 20,
            temperature: 0.2,
            max_output_tokens: None,
            timeout_sec: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: ProviderKind,
    pub base_url: String,
    pub model: String,
    pub credentials: ApiKeySource,
    pub max_image_bytes: usize,
    pub generation: GenerationSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
    pub timeout: Duration,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let provider = match file.provider {
            Some(name) => parse_provider(&name).ok_or_else(|| {
                anyhow::anyhow!("Unknown provider '{}' (expected gemini or openai)", name)
            })?,
            None => cli.provider,
        };

        let base_url = file
            .base_url
            .or_else(|| cli.base_url.clone())
            .unwrap_or_else(|| provider.default_base_url().to_string());

        let model = file
            .model
            .or_else(|| cli.model.clone())
            .unwrap_or_else(|| provider.default_model().to_string());
        if model.trim().is_empty() {
            bail!("model must not be empty");
        }

        // A key command wins over an environment variable from either source.
        let credentials = match file
            .api_key_command
            .or_else(|| cli.api_key_command.clone())
        {
            Some(command) => ApiKeySource::Command(command),
            None => ApiKeySource::Env(
                file.api_key_env
                    .or_else(|| cli.api_key_env.clone())
                    .unwrap_or_else(|| provider.default_api_key_env().to_string()),
            ),
        };

        let max_image_mb = file.max_image_mb.unwrap_or(cli.max_image_mb);
        if max_image_mb == 0 {
            bail!("max_image_mb must be greater than zero");
        }
        let max_image_bytes = usize::try_from(max_image_mb)
            .ok()
            .and_then(|mb| mb.checked_mul(1024 * 1024))
            .ok_or_else(|| anyhow::anyhow!("max_image_mb is too large: {}", max_image_mb))?;

        let gen_file = file.generation.unwrap_or_default();
        let temperature = gen_file.temperature.unwrap_or(cli.temperature);
        if !(0.0..=1.0).contains(&temperature) {
            bail!("temperature must be within [0, 1], got {}", temperature);
        }
        let timeout_sec = gen_file.timeout_sec.unwrap_or(cli.timeout_sec);
        if timeout_sec == 0 {
            bail!("timeout_sec must be greater than zero");
        }
        let generation = GenerationSettings {
            temperature,
            max_output_tokens: gen_file.max_output_tokens.or(cli.max_output_tokens),
            timeout: Duration::from_secs(timeout_sec),
        };

        Ok(Self {
            provider,
            base_url,
            model,
            credentials,
            max_image_bytes,
            generation,
        })
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.generation.temperature,
            max_output_tokens: self.generation.max_output_tokens,
            timeout: self.generation.timeout,
        }
    }

    pub fn build_provider(&self) -> Arc<dyn VisionProvider> {
        match self.provider {
            ProviderKind::Gemini => Arc::new(GeminiProvider::new(&self.base_url, &self.model)),
            ProviderKind::Openai => Arc::new(OpenAiProvider::new(&self.base_url, &self.model)),
        }
    }

    pub fn build_client(&self) -> InferenceClient {
        InferenceClient::new(self.build_provider(), self.credentials.clone())
            .with_options(self.generation_options())
            .with_max_image_bytes(self.max_image_bytes)
    }
}

/// Uses clap's ValueEnum trait for parsing.
fn parse_provider(s: &str) -> Option<ProviderKind> {
    ProviderKind::from_str(s, true).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider() {
        assert_eq!(parse_provider("gemini"), Some(ProviderKind::Gemini));
        assert_eq!(parse_provider("OpenAI"), Some(ProviderKind::Openai));
        assert!(parse_provider("claude").is_none());
    }

    #[test]
    fn test_resolve_defaults() {
        let config = AppConfig::resolve(&CliConfig::default(), None).unwrap();

        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.base_url, gemini::DEFAULT_BASE_URL);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(
            config.credentials,
            ApiKeySource::Env("GEMINI_API_KEY".to_string())
        );
        assert_eq!(config.max_image_bytes, 20 * 1024 * 1024);
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.generation.max_output_tokens, None);
        assert_eq!(config.generation.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_resolve_provider_defaults_follow_provider() {
        let cli = CliConfig {
            provider: ProviderKind::Openai,
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli, None).unwrap();

        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(
            config.credentials,
            ApiKeySource::Env("OPENAI_API_KEY".to_string())
        );
        assert_eq!(config.build_client().provider_name(), "openai");
    }

    #[test]
    fn test_resolve_toml_overrides_cli() {
        let cli = CliConfig {
            model: Some("gemini-cli-model".to_string()),
            api_key_env: Some("CLI_KEY".to_string()),
            timeout_sec: 45,
            ..Default::default()
        };

        let file_config = FileConfig {
            provider: Some("openai".to_string()),
            model: Some("gpt-4o".to_string()),
            max_image_mb: Some(5),
            generation: Some(GenerationConfig {
                temperature: Some(0.0),
                max_output_tokens: Some(2048),
                timeout_sec: None,
            }),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, Some(file_config)).unwrap();

        // TOML values should override CLI
        assert_eq!(config.provider, ProviderKind::Openai);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_image_bytes, 5 * 1024 * 1024);
        assert_eq!(config.generation.temperature, 0.0);
        assert_eq!(config.generation.max_output_tokens, Some(2048));
        // CLI value used when TOML doesn't specify
        assert_eq!(config.credentials, ApiKeySource::Env("CLI_KEY".to_string()));
        assert_eq!(config.generation.timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_resolve_key_command_wins() {
        let cli = CliConfig {
            api_key_env: Some("SOME_KEY".to_string()),
            ..Default::default()
        };
        let file_config = FileConfig {
            api_key_command: Some("pass show gemini".to_string()),
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli, Some(file_config)).unwrap();
        assert_eq!(
            config.credentials,
            ApiKeySource::Command("pass show gemini".to_string())
        );
    }

    #[test]
    fn test_resolve_validation_errors() {
        let bad_temperature = CliConfig {
            temperature: 1.5,
            ..Default::default()
        };
        let err = AppConfig::resolve(&bad_temperature, None).unwrap_err();
        assert!(err.to_string().contains("temperature"));

        let zero_timeout = CliConfig {
            timeout_sec: 0,
            ..Default::default()
        };
        assert!(AppConfig::resolve(&zero_timeout, None).is_err());

        let zero_size = FileConfig {
            max_image_mb: Some(0),
            ..Default::default()
        };
        assert!(AppConfig::resolve(&CliConfig::default(), Some(zero_size)).is_err());

        let empty_model = CliConfig {
            model: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(AppConfig::resolve(&empty_model, None).is_err());

        let unknown_provider = FileConfig {
            provider: Some("mystery".to_string()),
            ..Default::default()
        };
        let err = AppConfig::resolve(&CliConfig::default(), Some(unknown_provider)).unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }
}
