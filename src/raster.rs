// Software rasterizer over RGBA layers.
// Layers are straight-alpha `image::RgbaImage`; the window framebuffer is packed 0x00RRGGBB.

use crate::blend::BlendMode;
use crate::types::FrameBuffer;
use image::{imageops, Rgba, RgbaImage};

/// Distance from (px,py) to the segment (x0,y0)-(x1,y1).
/// A zero-length segment degenerates to the distance to its single point.
#[inline]
fn distance_to_segment(px: f32, py: f32, x0: f32, y0: f32, x1: f32, y1: f32) -> f32 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 { (((px - x0) * dx + (py - y0) * dy) / len_sq).clamp(0.0, 1.0) } else { 0.0 };
    let cx = x0 + t * dx;
    let cy = y0 + t * dy;
    ((px - cx) * (px - cx) + (py - cy) * (py - cy)).sqrt()
}

/// Source-over one pixel, scaling the source alpha by `coverage` in [0,1].
#[inline]
fn blend_pixel(img: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>, coverage: f32) {
    let a = (color[3] as f32 * coverage).round().clamp(0.0, 255.0) as u8;
    if a == 0 {
        return;
    }
    let dst = img.get_pixel_mut(x, y);
    *dst = BlendMode::Blend.apply(Rgba([color[0], color[1], color[2], a]), *dst);
}

/// Anti-aliased line of width `weight` with round caps (a capsule).
/// Pixels outside the image are clipped; a non-positive weight draws nothing.
pub fn stroke_line(img: &mut RgbaImage, x0: f32, y0: f32, x1: f32, y1: f32, weight: f32, color: Rgba<u8>) {
    if !(weight > 0.0) || !x0.is_finite() || !y0.is_finite() || !x1.is_finite() || !y1.is_finite() {
        return;
    }
    let half = weight / 2.0;
    let (w, h) = img.dimensions();

    // Bounding box, padded half a pixel for the AA ramp.
    let min_x = (x0.min(x1) - half - 0.5).floor().max(0.0);
    let min_y = (y0.min(y1) - half - 0.5).floor().max(0.0);
    let max_x = (x0.max(x1) + half + 0.5).ceil().min(w as f32 - 1.0);
    let max_y = (y0.max(y1) + half + 0.5).ceil().min(h as f32 - 1.0);
    if max_x < min_x || max_y < min_y {
        return;
    }

    for y in min_y as u32..=max_y as u32 {
        for x in min_x as u32..=max_x as u32 {
            // Sample at the pixel center.
            let d = distance_to_segment(x as f32 + 0.5, y as f32 + 0.5, x0, y0, x1, y1);
            // 1 inside, 0 outside, linear ramp across one pixel at the edge
            let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
            if coverage > 0.0 {
                blend_pixel(img, x, y, color, coverage);
            }
        }
    }
}

/// Fill an axis-aligned rectangle (clipped). Used for glyph cells.
pub fn fill_rect(img: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, color: Rgba<u8>) {
    let (iw, ih) = img.dimensions();
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w).min(iw as i32);
    let y1 = (y + h).min(ih as i32);
    for py in y0..y1 {
        for px in x0..x1 {
            blend_pixel(img, px as u32, py as u32, color, 1.0);
        }
    }
}

/// Blend `src` onto `dst` pixel by pixel with `mode`, both anchored at the origin.
/// Only the overlapping region is touched.
pub fn composite(dst: &mut RgbaImage, src: &RgbaImage, mode: BlendMode) {
    let w = dst.width().min(src.width());
    let h = dst.height().min(src.height());
    for y in 0..h {
        for x in 0..w {
            let d = dst.get_pixel_mut(x, y);
            *d = mode.apply(*src.get_pixel(x, y), *d);
        }
    }
}

/// Draw `src` stretched to cover all of `dst` (source-over).
pub fn draw_scaled(dst: &mut RgbaImage, src: &RgbaImage) {
    if src.dimensions() == dst.dimensions() {
        composite(dst, src, BlendMode::Blend);
        return;
    }
    if src.width() == 0 || src.height() == 0 {
        return;
    }
    let scaled = imageops::resize(src, dst.width(), dst.height(), imageops::FilterType::Triangle);
    composite(dst, &scaled, BlendMode::Blend);
}

/// Solid layer of one color.
pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// Copy a (flattened) layer into the window framebuffer at (x,y), dropping alpha.
pub fn blit_to_frame(fb: &mut FrameBuffer, img: &RgbaImage, x: usize, y: usize) {
    let w = (img.width() as usize).min(fb.width.saturating_sub(x));
    let h = (img.height() as usize).min(fb.height.saturating_sub(y));
    for row in 0..h {
        let dst_start = (y + row) * fb.width + x;
        for col in 0..w {
            let p = img.get_pixel(col as u32, row as u32);
            fb.pixels[dst_start + col] = ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn line_covers_its_middle_not_far_away() {
        let mut img = solid(40, 40, CLEAR);
        stroke_line(&mut img, 5.0, 20.0, 35.0, 20.0, 6.0, RED);
        assert_eq!(*img.get_pixel(20, 20), RED);
        assert_eq!(*img.get_pixel(20, 19), RED);
        assert_eq!(img.get_pixel(20, 30)[3], 0);
        assert_eq!(img.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn zero_length_line_is_a_dot() {
        let mut img = solid(20, 20, CLEAR);
        stroke_line(&mut img, 10.0, 10.0, 10.0, 10.0, 4.0, RED);
        assert_eq!(*img.get_pixel(10, 10), RED);
        assert_eq!(img.get_pixel(15, 10)[3], 0);
    }

    #[test]
    fn off_canvas_line_is_clipped() {
        let mut img = solid(10, 10, CLEAR);
        stroke_line(&mut img, -50.0, -50.0, -40.0, -40.0, 8.0, RED);
        stroke_line(&mut img, 5.0, 5.0, 500.0, 5.0, 2.0, RED);
        assert!(img.pixels().all(|p| p[1] == 0));
        assert_eq!(*img.get_pixel(9, 5), RED);
    }

    #[test]
    fn nan_or_zero_weight_draws_nothing() {
        let mut img = solid(10, 10, CLEAR);
        stroke_line(&mut img, 1.0, 1.0, 8.0, 8.0, 0.0, RED);
        stroke_line(&mut img, f32::NAN, 1.0, 8.0, 8.0, 3.0, RED);
        assert!(img.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn draw_scaled_stretches_to_fill() {
        let src = solid(4, 3, RED);
        let mut dst = solid(8, 6, CLEAR);
        draw_scaled(&mut dst, &src);
        assert_eq!(*dst.get_pixel(0, 0), RED);
        assert_eq!(*dst.get_pixel(7, 5), RED);
    }

    #[test]
    fn blit_packs_rgb() {
        let mut fb = FrameBuffer::new(4, 4);
        blit_to_frame(&mut fb, &solid(2, 2, Rgba([0x12, 0x34, 0x56, 255])), 1, 1);
        assert_eq!(fb.pixels[5], 0x0012_3456);
        assert_eq!(fb.pixels[0], 0);
        assert_eq!(fb.pixels[15], 0);
    }
}
