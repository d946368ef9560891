//! Watermark configuration types.
//!
//! A [`WatermarkConfig`] is built fresh for every marking request and never
//! mutated afterwards. The app always builds it through
//! [`WatermarkConfig::for_asset`], which fixes the text, placement and
//! styling and derives the font size from the source width.

use serde::{Deserialize, Serialize};

use crate::acquisition::AcquiredAsset;
use crate::constants::{
    FALLBACK_FONT_SIZE, FONT_SIZE_WIDTH_DIVISOR, MARKER_FILENAME, WATERMARK_BACKGROUND_COLOR,
    WATERMARK_MARGIN, WATERMARK_PADDING_X, WATERMARK_PADDING_Y, WATERMARK_TEXT,
    WATERMARK_TEXT_COLOR,
};

/// Watermark position on the image (9-grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// How the text background box is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundKind {
    /// Box hugs the text plus padding
    #[default]
    Fit,
    /// Box spans the full image width
    StretchX,
    /// Box spans the full image height
    StretchY,
}

/// Box drawn behind the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBackgroundStyle {
    pub padding_x: u32,
    pub padding_y: u32,
    /// Hex color (#RGB or #RRGGBB)
    pub color: String,
    #[serde(default)]
    pub kind: BackgroundKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels
    pub font_size: u32,
    /// Hex color (#RGB or #RRGGBB)
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<TextBackgroundStyle>,
}

/// A single piece of text to stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatermarkText {
    pub text: String,
    pub position: WatermarkPosition,
    /// Distance from the image edges in pixels
    pub margin: u32,
    pub style: TextStyle,
}

/// What the marker hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `data:image/png;base64,...`
    #[default]
    Base64,
    /// Path of a PNG written to the marker's cache directory
    File,
}

/// A complete marking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    /// Locator of the source image
    pub source_uri: String,
    /// Texts applied in order
    pub texts: Vec<WatermarkText>,
    /// Base filename for file output
    pub filename: String,
    pub output_format: OutputFormat,
}

/// Font size for a source of the given width.
///
/// One fortieth of the width, rounded; assets without a width get
/// [`FALLBACK_FONT_SIZE`].
pub fn font_size_for_width(width: Option<u32>) -> u32 {
    match width {
        Some(w) if w > 0 => (f64::from(w) / FONT_SIZE_WIDTH_DIVISOR).round() as u32,
        _ => FALLBACK_FONT_SIZE,
    }
}

impl WatermarkConfig {
    /// The fixed app watermark for an acquired asset.
    pub fn for_asset(asset: &AcquiredAsset) -> Self {
        Self {
            source_uri: asset.uri.clone(),
            texts: vec![WatermarkText {
                text: WATERMARK_TEXT.to_string(),
                position: WatermarkPosition::BottomLeft,
                margin: WATERMARK_MARGIN,
                style: TextStyle {
                    font_size: font_size_for_width(asset.width),
                    color: WATERMARK_TEXT_COLOR.to_string(),
                    background: Some(TextBackgroundStyle {
                        padding_x: WATERMARK_PADDING_X,
                        padding_y: WATERMARK_PADDING_Y,
                        color: WATERMARK_BACKGROUND_COLOR.to_string(),
                        kind: BackgroundKind::Fit,
                    }),
                },
            }],
            filename: MARKER_FILENAME.to_string(),
            output_format: OutputFormat::Base64,
        }
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Validate the request before any decoding work starts.
    pub fn validate(&self) -> Result<(), String> {
        if self.source_uri.is_empty() {
            return Err("source_uri cannot be empty".to_string());
        }

        if self.texts.is_empty() {
            return Err("at least one watermark text is required".to_string());
        }

        if self.output_format == OutputFormat::File && self.filename.trim().is_empty() {
            return Err("filename cannot be empty for file output".to_string());
        }

        for (idx, text) in self.texts.iter().enumerate() {
            if text.text.is_empty() {
                return Err(format!("watermark text {} is empty", idx));
            }
            validate_hex(&text.style.color).map_err(|e| format!("text {}: {}", idx, e))?;
            if let Some(background) = &text.style.background {
                validate_hex(&background.color)
                    .map_err(|e| format!("text {} background: {}", idx, e))?;
            }
        }

        Ok(())
    }
}

fn validate_hex(color: &str) -> Result<(), String> {
    match color.strip_prefix('#') {
        Some(hex)
            if (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) =>
        {
            Ok(())
        }
        _ => Err(format!(
            "color must be in #RGB or #RRGGBB format, got '{}'",
            color
        )),
    }
}
