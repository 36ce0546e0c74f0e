pub mod graphics;
pub mod sprite;
pub mod texture;

pub use graphics::Graphics;
pub use sprite::{Sprite, SpritePipeline};
pub use texture::{Texture, TextureSizeError};

use glam::Vec2;

/// Axis-aligned rectangle in layout pixels, origin top-left, y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    pub fn min(&self) -> Vec2 {
        self.origin
    }

    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    /// Two triangles covering the rectangle, as `(position, uv)` pairs. The
    /// texture is stretched to fill it.
    pub fn quad(&self) -> [(Vec2, Vec2); 6] {
        let (min, max) = (self.min(), self.max());
        let top_right = Vec2::new(max.x, min.y);
        let bottom_left = Vec2::new(min.x, max.y);
        [
            (min, Vec2::new(0.0, 0.0)),
            (top_right, Vec2::new(1.0, 0.0)),
            (bottom_left, Vec2::new(0.0, 1.0)),
            (top_right, Vec2::new(1.0, 0.0)),
            (max, Vec2::new(1.0, 1.0)),
            (bottom_left, Vec2::new(0.0, 1.0)),
        ]
    }
}

/// 8-bit sRGB color to the linear `wgpu::Color` expected by sRGB targets.
pub fn clear_color(rgba: [u8; 4]) -> wgpu::Color {
    fn linear(c: u8) -> f64 {
        let c = f64::from(c) / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    wgpu::Color {
        r: linear(rgba[0]),
        g: linear(rgba[1]),
        b: linear(rgba[2]),
        a: f64::from(rgba[3]) / 255.0,
    }
}
