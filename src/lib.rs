//! ChromaVisage Library
//!
//! Seasonal color analysis of a portrait photo: a vision model classifies the
//! subject into one of 12 seasons and proposes a hair color formulation, which
//! is validated against a fixed contract and joined with the season palettes.

pub mod analysis;
pub mod cli_style;
pub mod config;
pub mod inference;
pub mod llm;
pub mod seasons;
pub mod session;
pub mod view;

// Re-export commonly used types for convenience
pub use analysis::{AnalysisResult, ContractViolation};
pub use config::{AppConfig, CliConfig, FileConfig, ProviderKind};
pub use inference::{AnalysisError, ApiKeySource, ImageInput, InferenceClient, UploadedImage};
pub use seasons::{SeasonEntry, SeasonId};
pub use session::{AnalysisSession, SessionState};
pub use view::{render, View};
