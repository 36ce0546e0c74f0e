//! Single-line text rasterization with fontdue.

use std::path::Path;

use fontdue::{Font, FontSettings};
use image::{Rgba, RgbaImage};

use crate::assets::AssetKind;
use crate::error::{Result, ShellError};

/// A typeface opened at one fixed pixel size.
pub struct FontFace {
    font: Font,
    size: f32,
}

impl FontFace {
    pub fn load(path: &Path, size: f32) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| ShellError::asset(AssetKind::Font, path, e))?;
        Self::from_bytes(bytes, size).map_err(|e| ShellError::asset(AssetKind::Font, path, e))
    }

    pub fn from_bytes(bytes: Vec<u8>, size: f32) -> Result<Self, &'static str> {
        let settings = FontSettings {
            scale: size,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(bytes, settings)?;
        Ok(Self { font, size })
    }

    /// Render `text` onto a transparent canvas exactly as large as the text.
    pub fn rasterize(&self, text: &str, color: [u8; 4]) -> RgbaImage {
        let (ascent, descent) = self
            .font
            .horizontal_line_metrics(self.size)
            .map(|m| (m.ascent, m.descent))
            .unwrap_or((self.size, 0.0));
        let baseline = ascent.ceil();

        let advance: f32 = text
            .chars()
            .map(|ch| self.font.metrics(ch, self.size).advance_width)
            .sum();
        let width = (advance.ceil() as u32).max(1);
        let height = ((ascent - descent).ceil() as u32).max(1);

        let mut canvas = RgbaImage::new(width, height);
        let mut pen = 0.0f32;
        for ch in text.chars() {
            let (metrics, coverage) = self.font.rasterize(ch, self.size);
            let glyph = Glyph {
                left: (pen + metrics.xmin as f32).round() as i32,
                top: baseline as i32 - metrics.ymin - metrics.height as i32,
                width: metrics.width,
                coverage: &coverage,
            };
            glyph.blit(&mut canvas, color);
            pen += metrics.advance_width;
        }
        canvas
    }
}

/// A rasterized glyph's coverage mask and its placement on the canvas.
struct Glyph<'a> {
    left: i32,
    top: i32,
    width: usize,
    coverage: &'a [u8],
}

impl Glyph<'_> {
    /// Write `color` with the glyph coverage as alpha. Overlapping glyphs keep
    /// the stronger coverage; pixels off the canvas are dropped.
    fn blit(&self, canvas: &mut RgbaImage, color: [u8; 4]) {
        if self.width == 0 {
            return;
        }
        let [r, g, b, a] = color;
        for (i, &cov) in self.coverage.iter().enumerate() {
            if cov == 0 {
                continue;
            }
            let x = self.left + (i % self.width) as i32;
            let y = self.top + (i / self.width) as i32;
            if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
                continue;
            }
            let alpha = ((u16::from(cov) * u16::from(a)) / 255) as u8;
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            if alpha > pixel.0[3] {
                *pixel = Rgba([r, g, b, alpha]);
            }
        }
    }
}
