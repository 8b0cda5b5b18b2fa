//! A tiny built-in 5×7 pixel font.
//!
//! Lets the swarm form text without a system font rasterizer. Text is drawn
//! centered onto a transparent mask and handed to a [`MaskSampler`].
//! Lowercase letters are drawn as uppercase; characters without a glyph
//! leave a blank cell.

use crate::glyph::{GlyphPointProvider, MaskSampler};
use glam::Vec3;
use image::{GrayAlphaImage, LumaA};

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
/// Blank columns between characters, in font pixels.
const SPACING: u32 = 1;

/// Row bitmaps, top row first. Bit 4 is the leftmost column.
fn glyph_rows(c: char) -> Option<[u8; 7]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '\'' => [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '<' => [0x02, 0x04, 0x08, 0x10, 0x08, 0x04, 0x02],
        _ => return None,
    };
    Some(rows)
}

/// Rasterizes text with the built-in font and samples the result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BitmapFont {
    /// Mask width in pixels.
    pub canvas_width: u32,
    /// Mask height in pixels.
    pub canvas_height: u32,
    /// Upper bound on the size of one font pixel, in mask pixels.
    pub max_scale: u32,
    pub sampler: MaskSampler,
}

impl Default for BitmapFont {
    fn default() -> Self {
        Self {
            canvas_width: 600,
            canvas_height: 200,
            max_scale: 8,
            sampler: MaskSampler::default(),
        }
    }
}

impl BitmapFont {
    /// Whether the font has a glyph for `c`. Spaces count as supported.
    pub fn supports(c: char) -> bool {
        c == ' ' || glyph_rows(c).is_some()
    }

    /// Largest scale at which `chars` characters fit on one line.
    fn scale_for(&self, chars: u32) -> u32 {
        let advance = GLYPH_W + SPACING;
        let fit_w = self.canvas_width / (chars * advance).max(1);
        let fit_h = self.canvas_height / GLYPH_H;
        fit_w.min(fit_h).min(self.max_scale).max(1)
    }

    /// Draw `text` centered onto a transparent mask.
    pub fn rasterize(&self, text: &str) -> GrayAlphaImage {
        let mut mask = GrayAlphaImage::new(self.canvas_width, self.canvas_height);
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return mask;
        }

        let scale = self.scale_for(chars.len() as u32);
        let advance = (GLYPH_W + SPACING) * scale;
        let line_w = advance * chars.len() as u32 - SPACING * scale;
        let line_h = GLYPH_H * scale;
        let origin_x = self.canvas_width.saturating_sub(line_w) / 2;
        let origin_y = self.canvas_height.saturating_sub(line_h) / 2;

        for (i, &c) in chars.iter().enumerate() {
            let Some(rows) = glyph_rows(c) else { continue };
            let cell_x = origin_x + advance * i as u32;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                        continue;
                    }
                    let px = cell_x + col * scale;
                    let py = origin_y + row as u32 * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            let (x, y) = (px + dx, py + dy);
                            if x < self.canvas_width && y < self.canvas_height {
                                mask.put_pixel(x, y, LumaA([255, 255]));
                            }
                        }
                    }
                }
            }
        }
        mask
    }
}

impl GlyphPointProvider for BitmapFont {
    fn generate(&self, text: &str) -> Vec<Vec3> {
        self.sampler.sample(&self.rasterize(text))
    }
}
