//! Multimodal provider abstraction.
//!
//! Each backend turns a [`VisionRequest`] into one HTTP call and reports the
//! raw text of the answer. Contract validation happens above this layer.

pub mod gemini;
pub mod openai;
mod provider;
mod types;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use provider::{GenerationOptions, ProviderError, VisionProvider};
pub use types::{FinishReason, ProviderResponse, TokenUsage, VisionRequest};
