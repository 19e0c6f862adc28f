// 5x7 bitmap font, scaled up to any size.
// Good enough for a block-capitals poster message and the HUD; no shaping, left to right only.

use crate::raster;
use image::{Rgba, RgbaImage};

/// Glyph cell edge as a fraction of the font size (7 rows ≈ half an em).
const CELL_PER_EM: f32 = 0.07;
/// Columns a space advances.
const SPACE_COLS: u32 = 3;

/// Return a 5x7 glyph bitmap. Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
/// Lowercase maps onto uppercase.
pub fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '#' => g!(0b01010,0b01010,0b11111,0b01010,0b11111,0b01010,0b01010),
        '_' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b11111),

        _ => None,
    }
}

/// (first, last) inked column, or None for blank glyphs.
fn ink_columns(rows: &[u8; 7]) -> Option<(u32, u32)> {
    let bits = rows.iter().fold(0u8, |acc, r| acc | r);
    if bits & 0b11111 == 0 {
        return None;
    }
    let first = (0..5).find(|c| bits & (1 << (4 - c)) != 0)?;
    let last = (0..5).rev().find(|c| bits & (1 << (4 - c)) != 0)?;
    Some((first, last))
}

/// Columns this character advances: inked width plus one column of gap.
fn advance_cols(ch: char) -> u32 {
    match glyph5x7(ch).as_ref().and_then(ink_columns) {
        Some((first, last)) => last - first + 2,
        None => SPACE_COLS,
    }
}

pub fn cell_size(font_size: f32) -> f32 {
    font_size * CELL_PER_EM
}

/// Height of the inked glyph box.
pub fn glyph_height(font_size: f32) -> f32 {
    7.0 * cell_size(font_size)
}

/// Measured advance of one character at `font_size`.
pub fn char_width(ch: char, font_size: f32) -> f32 {
    advance_cols(ch) as f32 * cell_size(font_size)
}

/// Inked width of one character, without the gap column. Zero for blanks.
pub fn ink_width(ch: char, font_size: f32) -> f32 {
    match glyph5x7(ch).as_ref().and_then(ink_columns) {
        Some((first, last)) => (last - first + 1) as f32 * cell_size(font_size),
        None => 0.0,
    }
}

/// Width of a run of text from its left edge to the last character's ink.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let mut chars = text.chars();
    let Some(last) = chars.next_back() else { return 0.0 };
    chars.map(|c| char_width(c, font_size)).sum::<f32>() + ink_width(last, font_size)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GlyphStyle {
    Fill(Rgba<u8>),
    /// Transparent inside, `weight`-pixel line along the glyph's edges.
    Outline { color: Rgba<u8>, weight: f32 },
}

/// Draw one character with its left edge at `x`, vertically centred on `y_center`.
pub fn draw_char(img: &mut RgbaImage, x: f32, y_center: f32, ch: char, font_size: f32, style: GlyphStyle) {
    let Some(rows) = glyph5x7(ch) else { return };
    let Some((first, _)) = ink_columns(&rows) else { return };
    let cell = cell_size(font_size);
    let top = y_center - glyph_height(font_size) / 2.0;

    let lit = |c: i32, r: i32| -> bool {
        (0..5).contains(&c) && (0..7).contains(&r) && rows[r as usize] & (1 << (4 - c)) != 0
    };

    for r in 0..7i32 {
        for c in 0..5i32 {
            if !lit(c, r) {
                continue;
            }
            // Round each edge separately so neighbouring cells share a boundary exactly.
            let x0 = (x + (c - first as i32) as f32 * cell).round() as i32;
            let x1 = (x + (c - first as i32 + 1) as f32 * cell).round() as i32;
            let y0 = (top + r as f32 * cell).round() as i32;
            let y1 = (top + (r + 1) as f32 * cell).round() as i32;

            match style {
                GlyphStyle::Fill(color) => raster::fill_rect(img, x0, y0, x1 - x0, y1 - y0, color),
                GlyphStyle::Outline { color, weight } => {
                    let w = weight.max(1.0).round() as i32;
                    let h = w / 2;
                    if !lit(c, r - 1) {
                        raster::fill_rect(img, x0 - h, y0 - h, x1 - x0 + w, w, color);
                    }
                    if !lit(c, r + 1) {
                        raster::fill_rect(img, x0 - h, y1 - h, x1 - x0 + w, w, color);
                    }
                    if !lit(c - 1, r) {
                        raster::fill_rect(img, x0 - h, y0 - h, w, y1 - y0 + w, color);
                    }
                    if !lit(c + 1, r) {
                        raster::fill_rect(img, x1 - h, y0 - h, w, y1 - y0 + w, color);
                    }
                }
            }
        }
    }
}

/// Draw a run of text starting at `x`, each character advanced by its measured width.
pub fn draw_text(img: &mut RgbaImage, mut x: f32, y_center: f32, text: &str, font_size: f32, style: GlyphStyle) {
    for ch in text.chars() {
        draw_char(img, x, y_center, ch, font_size, style);
        x += char_width(ch, font_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_characters_all_have_glyphs() {
        for ch in "DEAR WORLD LEADERS, PLEASE STOP MESSING UP OUR PLANET".chars() {
            assert!(glyph5x7(ch).is_some(), "{ch:?}");
        }
        assert_eq!(glyph5x7('a'), glyph5x7('A'));
    }

    #[test]
    fn advances_are_proportional() {
        assert_eq!(advance_cols('A'), 6);
        assert_eq!(advance_cols('I'), 4);
        assert_eq!(advance_cols('.'), 2);
        assert_eq!(advance_cols(' '), SPACE_COLS);
        // unknown glyphs advance like a space
        assert_eq!(advance_cols('€'), SPACE_COLS);
    }

    #[test]
    fn text_width_stops_at_last_ink() {
        // A advances 6 cells, I is 3 cells of ink; 7px cells at 100px
        let w = text_width("AI", 100.0);
        assert!((w - (6.0 + 3.0) * 7.0).abs() < 1e-3, "{w}");
        assert_eq!(text_width("", 100.0), 0.0);
        assert!((ink_width('A', 100.0) - 35.0).abs() < 1e-3);
        assert_eq!(ink_width(' ', 100.0), 0.0);
    }

    #[test]
    fn fill_and_outline_differ_inside() {
        let mut fill = raster::solid(200, 200, Rgba([0, 0, 0, 0]));
        let mut outline = fill.clone();
        let black = Rgba([0, 0, 0, 255]);
        draw_char(&mut fill, 10.0, 100.0, 'H', 300.0, GlyphStyle::Fill(black));
        draw_char(&mut outline, 10.0, 100.0, 'H', 300.0, GlyphStyle::Outline { color: black, weight: 2.0 });
        // 300px font -> 21px cells; (20,100) is inside the left stem at row 3
        let (px, py) = (20, 100);
        assert_eq!(fill.get_pixel(px, py)[3], 255);
        assert_eq!(outline.get_pixel(px, py)[3], 0);
        let inked = |img: &RgbaImage| img.pixels().filter(|p| p[3] > 0).count();
        assert!(inked(&outline) > 0 && inked(&outline) < inked(&fill));
    }
}
