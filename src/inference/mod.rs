//! Inference client and its inputs: images, credentials and instructions.

mod client;
mod credentials;
mod error;
mod image;
mod prompt;

pub use client::{InferenceClient, DEFAULT_MAX_IMAGE_BYTES};
pub use credentials::ApiKeySource;
pub use error::{AnalysisError, ErrorKind, USER_FACING_FAILURE};
pub use image::{format_size, ImageError, ImageFormat, ImageInput, UploadedImage};
pub use prompt::PromptTemplate;
