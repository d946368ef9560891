//! Watermark compositor for blending labels onto images.
//!
//! Layers are blended in the order they were added with the Porter-Duff
//! "over" operator. Parts of a layer that fall outside the target are
//! clipped.

use super::position::PlacementPosition;
use image::{Rgba, RgbaImage};

/// A rendered label placed on the target image.
#[derive(Clone)]
pub struct WatermarkLayer {
    pub image: RgbaImage,
    pub position: PlacementPosition,
    /// Extra opacity applied on top of the label's own alpha (0.0 to 1.0).
    pub opacity: f32,
}

impl std::fmt::Debug for WatermarkLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkLayer")
            .field("dimensions", &(self.image.width(), self.image.height()))
            .field("position", &self.position)
            .field("opacity", &self.opacity)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Compositor {
    layers: Vec<WatermarkLayer>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_layer(&mut self, layer: WatermarkLayer) {
        self.layers.push(layer);
    }

    /// Blend every layer onto `target`, in insertion order.
    pub fn apply(&self, target: &mut RgbaImage) {
        for layer in &self.layers {
            blend_layer(target, layer);
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

fn blend_layer(target: &mut RgbaImage, layer: &WatermarkLayer) {
    let target_width = target.width() as i32;
    let target_height = target.height() as i32;

    let x_start = layer.position.x.max(0);
    let y_start = layer.position.y.max(0);
    let x_end = (layer.position.x + layer.image.width() as i32).min(target_width);
    let y_end = (layer.position.y + layer.image.height() as i32).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let lx = (tx - layer.position.x) as u32;
            let ly = (ty - layer.position.y) as u32;

            let label_pixel = layer.image.get_pixel(lx, ly);
            let target_pixel = target.get_pixel(tx as u32, ty as u32);

            let blended = blend_over(*target_pixel, *label_pixel, layer.opacity);
            target.put_pixel(tx as u32, ty as u32, blended);
        }
    }
}

/// result = foreground + background * (1 - foreground.alpha)
pub(crate) fn blend_over(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
