//! Marking engine.
//!
//! Takes a [`WatermarkConfig`], loads the source image, stamps every text
//! label on it and hands back either a PNG data URI or the path of a PNG
//! written to the cache directory.
//!
//! Decoding, rendering and encoding are CPU-bound and run on tokio's
//! blocking pool.

use super::compositor::{Compositor, WatermarkLayer};
use super::config::{BackgroundKind, OutputFormat, WatermarkConfig, WatermarkText};
use super::position::{
    calculate_position, clamp_to_bounds, ImageDimensions, LabelDimensions, PlacementPosition,
};
use super::source::{decode, ImageSource};
use super::text_renderer::render_label;
use super::WatermarkError;
use crate::constants::{PNG_DATA_URI_PREFIX, SAVED_FILE_EXTENSION};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, ImageOutputFormat, RgbaImage};
use std::io::Cursor;
use std::path::PathBuf;

/// Image-marking capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarkingEngine: Send + Sync {
    /// Apply the configured texts; returns a data URI or a file path
    /// depending on `config.output_format`.
    async fn mark_text(&self, config: WatermarkConfig) -> Result<String, WatermarkError>;
}

/// In-process marking engine.
#[derive(Debug, Clone)]
pub struct ImageMarker {
    cache_dir: PathBuf,
}

impl ImageMarker {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }
}

#[async_trait]
impl MarkingEngine for ImageMarker {
    async fn mark_text(&self, config: WatermarkConfig) -> Result<String, WatermarkError> {
        config.validate().map_err(WatermarkError::ConfigError)?;

        let source = ImageSource::parse(&config.source_uri)?;
        let bytes = source.read().await?;

        let texts = config.texts.clone();
        let png = tokio::task::spawn_blocking(move || {
            let image = decode(&bytes)?;
            let marked = stamp_texts(&image, &texts)?;
            encode_png(&marked)
        })
        .await
        .map_err(|e| WatermarkError::EncodeError(format!("marking task failed: {e}")))??;

        tracing::debug!(
            source = %config.source_uri,
            encoded_bytes = png.len(),
            format = ?config.output_format,
            "Image marked"
        );

        match config.output_format {
            OutputFormat::Base64 => Ok(to_data_uri(&png)),
            OutputFormat::File => {
                tokio::fs::create_dir_all(&self.cache_dir)
                    .await
                    .map_err(|e| WatermarkError::EncodeError(e.to_string()))?;
                let path = self
                    .cache_dir
                    .join(format!("{}.{}", config.filename, SAVED_FILE_EXTENSION));
                tokio::fs::write(&path, &png)
                    .await
                    .map_err(|e| WatermarkError::EncodeError(format!("{}: {}", path.display(), e)))?;
                Ok(path.display().to_string())
            }
        }
    }
}

/// Stamp every text onto a copy of `image`, in order.
pub fn stamp_texts(
    image: &DynamicImage,
    texts: &[WatermarkText],
) -> Result<RgbaImage, WatermarkError> {
    let mut rgba = image.to_rgba8();
    let dims = ImageDimensions {
        width: rgba.width(),
        height: rgba.height(),
    };

    let mut compositor = Compositor::new();
    for text in texts {
        let label = render_label(&text.text, &text.style, &dims)?;
        let label_dims = LabelDimensions {
            width: label.width(),
            height: label.height(),
        };

        let placed = calculate_position(text.position, &dims, &label_dims, text.margin);
        let placed = match text.style.background.as_ref().map(|b| b.kind) {
            Some(BackgroundKind::StretchX) => PlacementPosition::new(0, placed.y),
            Some(BackgroundKind::StretchY) => PlacementPosition::new(placed.x, 0),
            _ => placed,
        };

        compositor.add_layer(WatermarkLayer {
            image: label,
            position: clamp_to_bounds(placed, &dims, &label_dims),
            opacity: 1.0,
        });
    }
    compositor.apply(&mut rgba);

    Ok(rgba)
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, WatermarkError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .map_err(|e| WatermarkError::EncodeError(e.to_string()))?;
    Ok(bytes)
}

pub fn to_data_uri(png: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URI_PREFIX, STANDARD.encode(png))
}
