//! Watermark module for stamping text onto photos.
//!
//! # Pipeline
//!
//! ```text
//! AcquiredAsset ──> WatermarkConfig::for_asset ──> MarkingEngine::mark_text
//!                                                   │
//!                        ImageSource::parse/read ───┤
//!                        render_label (ab_glyph) ───┤
//!                        calculate_position ────────┤
//!                        Compositor::apply ─────────┤
//!                        encode_png ────────────────┴──> data URI / file path
//! ```
//!
//! The font size follows the source width (one fortieth, rounded) so the
//! label stays legible at any resolution; assets without a width get a
//! fixed fallback.

pub mod compositor;
pub mod config;
pub mod error;
pub mod marker;
pub mod position;
pub mod source;
pub mod text_renderer;

pub use compositor::{Compositor, WatermarkLayer};
pub use config::{
    font_size_for_width, BackgroundKind, OutputFormat, TextBackgroundStyle, TextStyle,
    WatermarkConfig, WatermarkPosition, WatermarkText,
};
pub use error::WatermarkError;
pub use marker::{encode_png, stamp_texts, to_data_uri, ImageMarker, MarkingEngine};
pub use position::{
    calculate_position, clamp_to_bounds, ImageDimensions, LabelDimensions, PlacementPosition,
};
pub use source::ImageSource;
pub use text_renderer::{measure_text, parse_hex_color, render_label, render_text, Color};

#[cfg(test)]
pub use marker::MockMarkingEngine;
