//! Source image loading.
//!
//! # Supported Sources
//!
//! - `file:///path/to/photo.jpg` - local file URI
//! - `/path/to/photo.jpg` or `photo.jpg` - bare path
//! - `data:image/jpeg;base64,...` - inline base64 payload

use super::WatermarkError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::DynamicImage;
use std::path::PathBuf;

/// Parsed source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    File(PathBuf),
    DataUri { mime: String, payload: String },
}

impl ImageSource {
    pub fn parse(uri: &str) -> Result<Self, WatermarkError> {
        if uri.is_empty() {
            return Err(WatermarkError::SourceError("empty source uri".to_string()));
        }

        if let Some(rest) = uri.strip_prefix("data:") {
            let (header, payload) = rest.split_once(',').ok_or_else(|| {
                WatermarkError::SourceError("data URI is missing ','".to_string())
            })?;
            let mime = header.strip_suffix(";base64").ok_or_else(|| {
                WatermarkError::SourceError(format!(
                    "only base64 data URIs are supported, got '{}'",
                    header
                ))
            })?;
            return Ok(ImageSource::DataUri {
                mime: mime.to_string(),
                payload: payload.to_string(),
            });
        }

        if let Some(path) = uri.strip_prefix("file://") {
            if path.is_empty() {
                return Err(WatermarkError::SourceError(format!(
                    "file URI has no path: {uri}"
                )));
            }
            return Ok(ImageSource::File(PathBuf::from(path)));
        }

        if let Some((scheme, _)) = uri.split_once("://") {
            return Err(WatermarkError::SourceError(format!(
                "Unsupported source scheme '{scheme}'. Use file:// or data:"
            )));
        }

        Ok(ImageSource::File(PathBuf::from(uri)))
    }

    /// Read the raw encoded bytes.
    pub async fn read(&self) -> Result<Vec<u8>, WatermarkError> {
        match self {
            ImageSource::File(path) => tokio::fs::read(path)
                .await
                .map_err(|e| WatermarkError::ReadError(format!("{}: {}", path.display(), e))),
            ImageSource::DataUri { payload, .. } => STANDARD
                .decode(payload.trim())
                .map_err(|e| WatermarkError::DecodeError(format!("invalid base64: {e}"))),
        }
    }
}

/// Decode encoded bytes into an image, guessing the format from content.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, WatermarkError> {
    image::load_from_memory(bytes).map_err(|e| WatermarkError::DecodeError(e.to_string()))
}
