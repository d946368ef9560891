//! Text watermark rendering.
//!
//! Renders watermark text, optionally on a solid background box, into an
//! RGBA label that the compositor blends onto the photo.
//!
//! # Example
//!
//! ```
//! use watermarkize::watermark::text_renderer::{parse_hex_color, render_text, TextRenderOptions};
//!
//! let options = TextRenderOptions {
//!     text: "Created with Watermarkize".to_string(),
//!     font_size: 24.0,
//!     color: parse_hex_color("#fff").unwrap(),
//!     opacity: 1.0,
//! };
//!
//! let label = render_text(&options).unwrap();
//! assert!(label.width() > 0);
//! ```

use super::compositor::blend_over;
use super::config::{BackgroundKind, TextStyle};
use super::position::ImageDimensions;
use super::WatermarkError;
use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::sync::OnceLock;

/// Default embedded font, parsed on first use.
static DEFAULT_FONT: OnceLock<Option<FontRef<'static>>> = OnceLock::new();

/// Upper bound on a rendered label's area.
const MAX_LABEL_PIXELS: u64 = 1 << 26;

/// Embedded font data (DejaVu Sans, Bitstream Vera license).
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");

fn default_font() -> Result<&'static FontRef<'static>, WatermarkError> {
    DEFAULT_FONT
        .get_or_init(|| FontRef::try_from_slice(EMBEDDED_FONT_DATA).ok())
        .as_ref()
        .ok_or_else(|| WatermarkError::RenderError("Failed to load embedded font".to_string()))
}

/// RGB color parsed from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn with_alpha(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }
}

/// Options for text rendering.
#[derive(Debug, Clone)]
pub struct TextRenderOptions {
    pub text: String,
    /// Font size in pixels; values below 1 render at 1.
    pub font_size: f32,
    pub color: Color,
    /// Opacity (0.0 to 1.0).
    pub opacity: f32,
}

impl Default for TextRenderOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 24.0,
            color: Color::white(),
            opacity: 1.0,
        }
    }
}

/// Parse a hex color string (#RGB or #RRGGBB).
pub fn parse_hex_color(hex: &str) -> Result<Color, WatermarkError> {
    let hex = hex
        .strip_prefix('#')
        .ok_or_else(|| WatermarkError::RenderError("Color must start with '#'".to_string()))?;

    if !hex.is_ascii() {
        return Err(WatermarkError::RenderError(format!(
            "Color must be ASCII hex digits, got '{}'",
            hex
        )));
    }

    let digit = |s: &str| {
        u8::from_str_radix(s, 16)
            .map_err(|_| WatermarkError::RenderError(format!("Invalid hex digit in '{}'", s)))
    };

    match hex.len() {
        // Each digit is doubled: 0xF -> 0xFF
        3 => Ok(Color::new(
            digit(&hex[0..1])? * 17,
            digit(&hex[1..2])? * 17,
            digit(&hex[2..3])? * 17,
        )),
        6 => Ok(Color::new(
            digit(&hex[0..2])?,
            digit(&hex[2..4])?,
            digit(&hex[4..6])?,
        )),
        _ => Err(WatermarkError::RenderError(format!(
            "Color must be #RGB or #RRGGBB format, got {} characters",
            hex.len()
        ))),
    }
}

fn effective_size(font_size: f32) -> f32 {
    if font_size.is_finite() {
        font_size.max(1.0)
    } else {
        1.0
    }
}

/// Kerned pen position of each glyph in `text`, starting at x = 0, plus
/// the total advance.
fn layout<F: Font>(
    scaled_font: &ab_glyph::PxScaleFont<F>,
    text: &str,
) -> (Vec<(ab_glyph::GlyphId, f32)>, f32) {
    let mut pen = 0.0f32;
    let mut prev: Option<ab_glyph::GlyphId> = None;
    let mut placed = Vec::with_capacity(text.len());

    for c in text.chars() {
        let id = scaled_font.glyph_id(c);
        if let Some(prev) = prev {
            pen += scaled_font.kern(prev, id);
        }
        placed.push((id, pen));
        pen += scaled_font.h_advance(id);
        prev = Some(id);
    }

    (placed, pen)
}

/// Calculate the (width, height) of rendered text in pixels.
///
/// One pixel of slack on each side keeps antialiased edges inside the box.
pub fn measure_text(text: &str, font_size: f32) -> Result<(u32, u32), WatermarkError> {
    let font = default_font()?;
    let scaled_font = font.as_scaled(PxScale::from(effective_size(font_size)));
    let (_, advance) = layout(&scaled_font, text);

    Ok((
        advance.ceil() as u32 + 2,
        scaled_font.height().ceil() as u32 + 2,
    ))
}

/// Render text onto a transparent RGBA image sized to fit it.
pub fn render_text(options: &TextRenderOptions) -> Result<RgbaImage, WatermarkError> {
    if options.text.is_empty() {
        return Err(WatermarkError::RenderError(
            "Cannot render empty text".to_string(),
        ));
    }

    let (width, height) = measure_text(&options.text, options.font_size)?;
    let mut image = RgbaImage::new(width.max(1), height.max(1));
    draw_text(&mut image, options, 0.0, 0.0)?;
    Ok(image)
}

/// Draw text with its top-left corner at (`origin_x`, `origin_y`).
///
/// Pixels falling outside `image` are dropped.
fn draw_text(
    image: &mut RgbaImage,
    options: &TextRenderOptions,
    origin_x: f32,
    origin_y: f32,
) -> Result<(), WatermarkError> {
    let font = default_font()?;
    let scale = PxScale::from(effective_size(options.font_size));
    let scaled_font = font.as_scaled(scale);
    let baseline = origin_y + scaled_font.ascent();
    let (width, height) = image.dimensions();

    let (placed, _) = layout(&scaled_font, &options.text);
    for (id, pen) in placed {
        let glyph = id.with_scale_and_position(scale, ab_glyph::point(origin_x + pen, baseline));
        let Some(outline) = font.outline_glyph(glyph) else {
            // Whitespace has no outline
            continue;
        };

        let bounds = outline.px_bounds();
        outline.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i64 + i64::from(gx);
            let y = bounds.min.y as i64 + i64::from(gy);
            if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
                return;
            }

            let (x, y) = (x as u32, y as u32);
            let ink = options.color.with_alpha((coverage.clamp(0.0, 1.0) * 255.0) as u8);
            let under = *image.get_pixel(x, y);
            image.put_pixel(x, y, blend_over(under, ink, options.opacity));
        });
    }

    Ok(())
}

/// Render a styled label: text on its background box, if any.
///
/// `target` is the image the label will land on; stretched backgrounds span
/// its full width or height.
pub fn render_label(
    text: &str,
    style: &TextStyle,
    target: &ImageDimensions,
) -> Result<RgbaImage, WatermarkError> {
    let options = TextRenderOptions {
        text: text.to_string(),
        font_size: style.font_size as f32,
        color: parse_hex_color(&style.color)?,
        opacity: 1.0,
    };

    let Some(background) = &style.background else {
        return render_text(&options);
    };

    if text.is_empty() {
        return Err(WatermarkError::RenderError(
            "Cannot render empty text".to_string(),
        ));
    }

    let (text_w, text_h) = measure_text(text, options.font_size)?;
    let padded = |text: u32, padding: u32| {
        padding
            .checked_mul(2)
            .and_then(|p| p.checked_add(text))
            .ok_or_else(|| {
                WatermarkError::RenderError(format!("Background padding {} is too large", padding))
            })
    };
    let fit_w = padded(text_w, background.padding_x)?;
    let fit_h = padded(text_h, background.padding_y)?;

    let (box_w, box_h) = match background.kind {
        BackgroundKind::Fit => (fit_w, fit_h),
        BackgroundKind::StretchX => (fit_w.max(target.width), fit_h),
        BackgroundKind::StretchY => (fit_w, fit_h.max(target.height)),
    };

    if u64::from(box_w) * u64::from(box_h) > MAX_LABEL_PIXELS {
        return Err(WatermarkError::RenderError(format!(
            "Label box {}x{} is too large",
            box_w, box_h
        )));
    }

    let fill = parse_hex_color(&background.color)?.with_alpha(255);
    let mut label = RgbaImage::from_pixel(box_w.max(1), box_h.max(1), fill);

    let text_y = match background.kind {
        BackgroundKind::StretchY => (box_h.saturating_sub(text_h)) / 2,
        _ => background.padding_y,
    };
    draw_text(
        &mut label,
        &options,
        background.padding_x as f32,
        text_y as f32,
    )?;

    Ok(label)
}
