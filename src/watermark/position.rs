//! Position calculation for watermark placement.
//!
//! # Example
//!
//! ```
//! use watermarkize::watermark::position::{calculate_position, ImageDimensions, LabelDimensions};
//! use watermarkize::watermark::WatermarkPosition;
//!
//! let image = ImageDimensions { width: 800, height: 600 };
//! let label = LabelDimensions { width: 100, height: 50 };
//!
//! let pos = calculate_position(WatermarkPosition::BottomLeft, &image, &label, 10);
//! assert_eq!((pos.x, pos.y), (10, 540)); // 600 - 50 - 10
//! ```

use super::WatermarkPosition;

/// Dimensions of the target image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Dimensions of the rendered label (text plus background box).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelDimensions {
    pub width: u32,
    pub height: u32,
}

/// Top-left corner of a placed label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Calculate where a label goes for a 9-grid position.
///
/// Coordinates may be negative if the label is larger than the image; use
/// [`clamp_to_bounds`] to pull it back in.
pub fn calculate_position(
    position: WatermarkPosition,
    image: &ImageDimensions,
    label: &LabelDimensions,
    margin: u32,
) -> PlacementPosition {
    let img_w = image.width as i32;
    let img_h = image.height as i32;
    let lb_w = label.width as i32;
    let lb_h = label.height as i32;
    let m = margin as i32;

    let left = m;
    let center_x = (img_w - lb_w) / 2;
    let right = img_w - lb_w - m;
    let top = m;
    let center_y = (img_h - lb_h) / 2;
    let bottom = img_h - lb_h - m;

    match position {
        WatermarkPosition::TopLeft => PlacementPosition::new(left, top),
        WatermarkPosition::TopCenter => PlacementPosition::new(center_x, top),
        WatermarkPosition::TopRight => PlacementPosition::new(right, top),
        WatermarkPosition::CenterLeft => PlacementPosition::new(left, center_y),
        WatermarkPosition::Center => PlacementPosition::new(center_x, center_y),
        WatermarkPosition::CenterRight => PlacementPosition::new(right, center_y),
        WatermarkPosition::BottomLeft => PlacementPosition::new(left, bottom),
        WatermarkPosition::BottomCenter => PlacementPosition::new(center_x, bottom),
        WatermarkPosition::BottomRight => PlacementPosition::new(right, bottom),
    }
}

/// Clamp a position so the label stays inside the image.
///
/// Labels larger than the image are pinned to the top-left corner.
pub fn clamp_to_bounds(
    pos: PlacementPosition,
    image: &ImageDimensions,
    label: &LabelDimensions,
) -> PlacementPosition {
    let max_x = (image.width as i32 - label.width as i32).max(0);
    let max_y = (image.height as i32 - label.height as i32).max(0);

    PlacementPosition::new(pos.x.clamp(0, max_x), pos.y.clamp(0, max_y))
}
