// Palette colors and the random pick used by the "random" menu entry.

use crate::rng::Rng32;
use image::Rgba;
use std::fmt;

/// Opaque sRGB color, as written in the palette ("#FF5733").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `#RGB` (leading `#` optional). Anything else is `None`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => None,
        }
    }

    /// Straight-alpha RGBA with `opacity` in [0,1].
    pub fn with_opacity(self, opacity: f32) -> Rgba<u8> {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([self.r, self.g, self.b, a])
    }

    /// 0x00RRGGBB, what minifb wants.
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Uniform pick from the palette. `None` only for an empty palette.
pub fn random_color(palette: &[Color], rng: &mut Rng32) -> Option<Color> {
    if palette.is_empty() {
        return None;
    }
    let idx = (rng.next_f32() * palette.len() as f32) as usize;
    palette.get(idx.min(palette.len() - 1)).copied()
}

/// What the color menu is set to. `Random` re-rolls a palette color at the start of every stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorChoice {
    Fixed(Color),
    Random,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_palette_hex() {
        assert_eq!(Color::from_hex("#FF5733"), Some(Color::rgb(0xFF, 0x57, 0x33)));
        assert_eq!(Color::from_hex("3357ff"), Some(Color::rgb(0x33, 0x57, 0xFF)));
        assert_eq!(Color::from_hex("#0f8"), Some(Color::rgb(0x00, 0xFF, 0x88)));
    }

    #[test]
    fn rejects_garbage_hex() {
        assert_eq!(Color::from_hex("#FF57"), None);
        assert_eq!(Color::from_hex("#GG5733"), None);
        assert_eq!(Color::from_hex("#ÿÿÿ"), None);
    }

    #[test]
    fn display_is_upper_hex() {
        assert_eq!(Color::rgb(1, 0xAB, 0xFF).to_string(), "#01ABFF");
    }

    #[test]
    fn opacity_goes_into_alpha() {
        assert_eq!(Color::rgb(10, 20, 30).with_opacity(1.0), Rgba([10, 20, 30, 255]));
        assert_eq!(Color::rgb(10, 20, 30).with_opacity(0.0)[3], 0);
        assert_eq!(Color::rgb(10, 20, 30).with_opacity(7.0)[3], 255);
    }

    #[test]
    fn random_pick_stays_in_palette_and_covers_it() {
        let palette = [Color::rgb(1, 0, 0), Color::rgb(2, 0, 0), Color::rgb(3, 0, 0)];
        let mut rng = Rng32::from_seed(7);
        let mut seen = [false; 3];
        for _ in 0..300 {
            let c = random_color(&palette, &mut rng).unwrap();
            let i = palette.iter().position(|p| *p == c).unwrap();
            seen[i] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(random_color(&[], &mut rng), None);
    }
}
