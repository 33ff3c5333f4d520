//! Uploaded image handling.
//!
//! An [`UploadedImage`] can only be built through [`UploadedImage::decode`],
//! so holding one means the bytes are non-empty and sniffed as a supported
//! raster format. The bytes are never modified afterwards.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Raw input as supplied by the user.
#[derive(Debug, Clone)]
pub enum ImageInput {
    /// File contents.
    Bytes(Vec<u8>),
    /// A `data:<mime>;base64,<payload>` URL or a bare base64 payload.
    Encoded(String),
}

/// Raster formats the providers accept inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Heif,
}

impl ImageFormat {
    fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/webp" => Some(ImageFormat::Webp),
            "image/heif" | "image/heic" => Some(ImageFormat::Heif),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Heif => "image/heif",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
            ImageFormat::Webp => "WebP",
            ImageFormat::Heif => "HEIF",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("No image selected")]
    Missing,

    #[error("The selected file is empty")]
    Empty,

    #[error("Image payload is not valid base64: {0}")]
    InvalidEncoding(String),

    #[error("The selected file is not a recognizable image")]
    UnrecognizedType,

    #[error("Unsupported image type {0} (use JPEG, PNG, WebP or HEIF)")]
    UnsupportedType(String),
}

/// A validated image, held in memory only.
#[derive(Clone)]
pub struct UploadedImage {
    bytes: Arc<[u8]>,
    format: ImageFormat,
}

impl UploadedImage {
    /// Validates user input. Data-URL headers are stripped and the declared
    /// type, if any, is ignored in favor of the sniffed one.
    pub fn decode(input: ImageInput) -> Result<Self, ImageError> {
        let bytes = match input {
            ImageInput::Bytes(bytes) => bytes,
            ImageInput::Encoded(text) => {
                let payload = strip_data_url(&text);
                let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
                if compact.is_empty() {
                    return Err(ImageError::Empty);
                }
                STANDARD
                    .decode(compact.as_bytes())
                    .map_err(|e| ImageError::InvalidEncoding(e.to_string()))?
            }
        };

        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        let kind = infer::get(&bytes).ok_or(ImageError::UnrecognizedType)?;
        let format = ImageFormat::from_mime(kind.mime_type())
            .ok_or_else(|| ImageError::UnsupportedType(kind.mime_type().to_string()))?;

        debug!(format = %format, size = bytes.len(), "Decoded uploaded image");

        Ok(Self {
            bytes: bytes.into(),
            format,
        })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Bare base64 payload, without any data-URL header.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

impl fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedImage")
            .field("format", &self.format)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Drops everything up to the first comma, as in `data:image/png;base64,<payload>`.
fn strip_data_url(text: &str) -> &str {
    match text.split_once(',') {
        Some((_, payload)) => payload,
        None => text,
    }
}

/// Human readable size.
pub fn format_size(size: usize) -> String {
    format!("{:#}", byte_unit::Byte::from(size as u64))
}
