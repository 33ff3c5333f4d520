use super::image::{format_size, ImageError};
use crate::analysis::ContractViolation;
use crate::llm::ProviderError;
use thiserror::Error;

/// Single message shown to the user for any client-side failure.
pub const USER_FACING_FAILURE: &str = "Failed to analyze image. Please try again.";

/// Failure of one analysis.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    /// Missing or rejected credentials. Fatal until the configuration changes.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid image: {0}")]
    Validation(#[from] ImageError),

    #[error("Image is {} but the provider accepts at most {}", format_size(*size), format_size(*limit))]
    ImageTooLarge { size: usize, limit: usize },

    /// Network failure, timeout, rate limiting or provider-side error.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider answer violates the result contract: {0}")]
    ContractViolation(#[from] ContractViolation),

    #[error("Provider refused to analyze the image: {0}")]
    Refused(String),
}

/// Kind of an [`AnalysisError`], kept for logging after the message collapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Validation,
    ImageTooLarge,
    Transport,
    ContractViolation,
    Refused,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Validation => "validation",
            ErrorKind::ImageTooLarge => "image_too_large",
            ErrorKind::Transport => "transport",
            ErrorKind::ContractViolation => "contract_violation",
            ErrorKind::Refused => "refused",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Configuration(_) => ErrorKind::Configuration,
            AnalysisError::Validation(_) => ErrorKind::Validation,
            AnalysisError::ImageTooLarge { .. } => ErrorKind::ImageTooLarge,
            AnalysisError::Transport(_) => ErrorKind::Transport,
            AnalysisError::ContractViolation(_) => ErrorKind::ContractViolation,
            AnalysisError::Refused(_) => ErrorKind::Refused,
        }
    }

    /// Whether trying again with the same input might succeed. Nothing is
    /// retried automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AnalysisError::Transport(_))
    }

    /// Message shown in the upload prompt. Input problems the user can fix
    /// keep their own wording; everything else collapses to one message.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Validation(e) => e.to_string(),
            AnalysisError::ImageTooLarge { .. } => self.to_string(),
            _ => USER_FACING_FAILURE.to_string(),
        }
    }

    /// Maps a wire-level failure into the client taxonomy.
    pub(crate) fn from_provider(error: ProviderError, image_size: usize, limit: usize) -> Self {
        match error {
            ProviderError::Unauthorized(message) => AnalysisError::Configuration(format!(
                "Provider rejected the API key: {}",
                message
            )),
            ProviderError::PayloadTooLarge => AnalysisError::ImageTooLarge {
                size: image_size,
                limit,
            },
            ProviderError::Refused(reason) => AnalysisError::Refused(reason),
            ProviderError::InvalidResponse(message) => {
                AnalysisError::ContractViolation(ContractViolation::Envelope(message))
            }
            ProviderError::Timeout => {
                AnalysisError::Transport("Provider call timed out".to_string())
            }
            ProviderError::RateLimited => {
                AnalysisError::Transport("Provider rate limit reached".to_string())
            }
            ProviderError::Connection(message) => AnalysisError::Transport(message),
            ProviderError::Api { status, message } => {
                AnalysisError::Transport(format!("Provider returned {}: {}", status, message))
            }
        }
    }
}
