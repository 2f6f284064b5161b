//! Per-color sprite handles and the radial-gradient sprite they stand for

use crate::curves::{lerp_color, lerp_f32};
use pyro_core::{Color, TextureHandle, TextureSource};
use std::collections::HashMap;

/// Side length of the baked sprite, in pixels
pub const SPRITE_SIZE: usize = 64;

/// Hands out one texture handle per distinct color.
///
/// Colors are keyed by their 8-bit RGB value, so `#ff0000` requested twice
/// shares a handle.
#[derive(Debug, Default)]
pub struct TextureCache {
    handles: HashMap<u32, TextureHandle>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl TextureSource for TextureCache {
    fn texture_for(&mut self, color: Color) -> TextureHandle {
        let next = TextureHandle(self.handles.len() as u32);
        *self.handles.entry(color.to_hex()).or_insert(next)
    }
}

/// Bake the particle sprite for `color` as RGBA8, `size × size` pixels.
///
/// White core, the color at 30% of the radius with half alpha, fully
/// transparent at the rim.
pub fn radial_gradient_rgba(color: Color, size: usize) -> Vec<u8> {
    let [r, g, b] = color.to_rgb8();
    let tint = [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0];
    let white = [1.0, 1.0, 1.0, 1.0];
    let mid = [tint[0], tint[1], tint[2], 0.5];
    let rim = [tint[0], tint[1], tint[2], 0.0];

    let center = size as f32 / 2.0;
    let inner = size as f32 / 32.0;
    let outer = size as f32 / 2.0;

    let mut pixels = Vec::with_capacity(size * size * 4);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            let d = (dx * dx + dy * dy).sqrt();
            let t = ((d - inner) / (outer - inner)).clamp(0.0, 1.0);
            let c = if t < 0.3 {
                lerp_color(white, mid, t / 0.3)
            } else {
                lerp_color(mid, rim, (t - 0.3) / 0.7)
            };
            pixels.extend(c.iter().map(|v| lerp_f32(0.0, 255.0, *v).round() as u8));
        }
    }
    pixels
}
