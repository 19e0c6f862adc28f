// The text stencil: the fixed message, drawn into its own transparent layer that sits
// above the paint. Re-rendered from scratch whenever the canvas size changes.

use crate::config::Config;
use crate::glyphs::{self, GlyphStyle};
use crate::raster;
use image::{Rgba, RgbaImage};
use std::sync::Arc;

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Left edge of every character so that the line runs exactly from `left` to `right`.
///
/// The slack between the natural width (sum of `advances`) and the target width is spread
/// evenly over the `n - 1` gaps. A single character just sits at `left`. If the text is
/// wider than the target, the spacing goes negative and characters overlap.
pub fn justify(advances: &[f32], left: f32, right: f32) -> Vec<f32> {
    let natural: f32 = advances.iter().sum();
    let gaps = advances.len().saturating_sub(1);
    let spacing = if gaps > 0 { (right - left - natural) / gaps as f32 } else { 0.0 };

    let mut x = left;
    advances
        .iter()
        .map(|advance| {
            let origin = x;
            x += advance + spacing;
            origin
        })
        .collect()
}

pub struct TextStencil {
    config: Arc<Config>,
    buffer: RgbaImage,
}

impl TextStencil {
    pub fn new(config: Arc<Config>, width: u32, height: u32) -> Self {
        let mut stencil = Self { config, buffer: RgbaImage::new(1, 1) };
        stencil.render(width, height);
        stencil
    }

    pub fn buffer(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Lay the message out for a `width` x `height` canvas.
    pub fn render(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        let text = &self.config.text;
        let mut layer = raster::solid(width, height, Rgba([0, 0, 0, 0]));

        let (w, h) = (width as f32, height as f32);
        let scale = (w / self.config.base_width).min(h / self.config.base_height);
        let font_size = text.font_size * scale;
        let line_height = text.line_height * scale;
        let total_height = line_height * text.lines.len() as f32;
        let start_y = (h - total_height) / 2.0 + line_height / 4.0;

        for (index, line) in text.lines.iter().enumerate() {
            let y = start_y + index as f32 * line_height;
            if index == 0 {
                // Heading: smaller, solid, centred.
                let size = text.heading_font_size * scale;
                let x = (w - glyphs::text_width(line, size)) / 2.0;
                glyphs::draw_text(&mut layer, x, y, line, size, GlyphStyle::Fill(INK));
                continue;
            }

            let style = GlyphStyle::Outline { color: INK, weight: (text.stroke_weight * scale).max(1.0) };
            if text.justify_body {
                // The last character is measured by its ink so it ends on the right margin.
                let count = line.chars().count();
                let advances: Vec<f32> = line
                    .chars()
                    .enumerate()
                    .map(|(i, c)| {
                        if i + 1 == count { glyphs::ink_width(c, font_size) } else { glyphs::char_width(c, font_size) }
                    })
                    .collect();
                let (left, right) = text.justify_margins;
                let origins = justify(&advances, w * left, w * right);
                for (ch, x) in line.chars().zip(origins) {
                    glyphs::draw_char(&mut layer, x, y, ch, font_size, style);
                }
            } else {
                let x = (w - glyphs::text_width(line, font_size)) / 2.0;
                glyphs::draw_text(&mut layer, x, y, line, font_size, style);
            }
        }

        log::debug!("text stencil rendered at {width}x{height} (scale {scale:.3})");
        self.buffer = layer;
    }
}
