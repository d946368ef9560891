//! Watermark error types.
//!
//! Defines errors that can occur while marking an image.

use std::fmt;

/// Errors that can occur during watermark processing.
#[derive(Debug)]
pub enum WatermarkError {
    /// Source locator is malformed or uses an unsupported scheme
    SourceError(String),

    /// Failed to read the source image
    ReadError(String),

    /// Failed to decode the source image
    DecodeError(String),

    /// Failed to render text watermark
    RenderError(String),

    /// Invalid configuration
    ConfigError(String),

    /// Failed to encode or write the marked image
    EncodeError(String),
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceError(msg) => write!(f, "Invalid image source: {}", msg),
            Self::ReadError(msg) => write!(f, "Failed to read source image: {}", msg),
            Self::DecodeError(msg) => write!(f, "Failed to decode source image: {}", msg),
            Self::RenderError(msg) => write!(f, "Failed to render text watermark: {}", msg),
            Self::ConfigError(msg) => write!(f, "Watermark configuration error: {}", msg),
            Self::EncodeError(msg) => write!(f, "Failed to encode marked image: {}", msg),
        }
    }
}

impl std::error::Error for WatermarkError {}
