// How the paint layer mixes with whatever is under it.
// Names follow the usual canvas vocabulary so they can be typed in config or picked from the menu.

use image::Rgba;

#[derive(
    strum::AsRefStr,
    strum::Display,
    strum::EnumString,
    PartialEq,
    Eq,
    Copy,
    Clone,
    Hash,
    Debug,
)]
#[strum(serialize_all = "snake_case")]
pub enum BlendMode {
    /// Plain source-over.
    Blend,
    Add,
    Darkest,
    Lightest,
    Difference,
    Exclusion,
    Multiply,
    Screen,
    Overlay,
    HardLight,
    /// Source replaces destination, alpha included.
    Replace,
}

impl Default for BlendMode {
    fn default() -> Self {
        Self::Multiply
    }
}

impl BlendMode {
    /// Mix one channel pair, both in [0,1]. `s` is the paint, `d` the backdrop.
    #[inline]
    fn mix(self, s: f32, d: f32) -> f32 {
        match self {
            Self::Blend | Self::Replace => s,
            Self::Add => (s + d).min(1.0),
            Self::Darkest => s.min(d),
            Self::Lightest => s.max(d),
            Self::Difference => (s - d).abs(),
            Self::Exclusion => s + d - 2.0 * s * d,
            Self::Multiply => s * d,
            Self::Screen => s + d - s * d,
            Self::Overlay => hard_light(d, s),
            Self::HardLight => hard_light(s, d),
        }
    }

    /// Composite `src` over `dst` (both straight alpha).
    /// The mixed color only applies where the backdrop is opaque; elsewhere the paint shows as-is.
    pub fn apply(self, src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
        if self == Self::Replace {
            return src;
        }
        let sa = src[3] as f32 / 255.0;
        if sa <= 0.0 {
            return dst;
        }
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);

        let mut out = [0u8; 4];
        for c in 0..3 {
            let s = src[c] as f32 / 255.0;
            let d = dst[c] as f32 / 255.0;
            let mixed = (1.0 - da) * s + da * self.mix(s, d);
            // premultiplied result, then back to straight alpha
            let pre = sa * mixed + da * d * (1.0 - sa);
            out[c] = to_u8(pre / out_a);
        }
        out[3] = to_u8(out_a);
        Rgba(out)
    }
}

#[inline]
fn hard_light(s: f32, d: f32) -> f32 {
    if s <= 0.5 { 2.0 * s * d } else { 1.0 - 2.0 * (1.0 - s) * (1.0 - d) }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn multiply_onto_white_keeps_paint() {
        let paint = Rgba([200, 40, 90, 255]);
        assert_eq!(BlendMode::Multiply.apply(paint, WHITE), paint);
    }

    #[test]
    fn multiply_onto_black_stays_black() {
        let paint = Rgba([200, 40, 90, 255]);
        assert_eq!(BlendMode::Multiply.apply(paint, BLACK), BLACK);
    }

    #[test]
    fn screen_onto_black_keeps_paint() {
        let paint = Rgba([12, 200, 77, 255]);
        assert_eq!(BlendMode::Screen.apply(paint, BLACK), paint);
    }

    #[test]
    fn transparent_paint_leaves_backdrop() {
        let backdrop = Rgba([10, 20, 30, 255]);
        for mode in [BlendMode::Multiply, BlendMode::Blend, BlendMode::Difference] {
            assert_eq!(mode.apply(Rgba([255, 0, 0, 0]), backdrop), backdrop, "{mode}");
        }
    }

    #[test]
    fn paint_over_empty_backdrop_is_unchanged() {
        let paint = Rgba([90, 90, 250, 128]);
        assert_eq!(BlendMode::Multiply.apply(paint, Rgba([0, 0, 0, 0])), paint);
    }

    #[test]
    fn half_alpha_multiply_is_between() {
        let out = BlendMode::Multiply.apply(Rgba([0, 0, 0, 128]), WHITE);
        assert_eq!(out[3], 255);
        assert!(out[0] > 120 && out[0] < 135, "got {out:?}");
    }

    #[test]
    fn names_round_trip_through_strum() {
        assert_eq!(BlendMode::from_str("hard_light").unwrap(), BlendMode::HardLight);
        assert_eq!(BlendMode::Multiply.as_ref(), "multiply");
        assert!(BlendMode::from_str("sparkle").is_err());
    }
}
