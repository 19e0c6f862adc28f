// Compiled-in configuration.
//
// Built once in `main` and handed to every component constructor; nothing reads it
// from a global.

use crate::blend::BlendMode;
use crate::color::Color;

/// Brush physics constants. `initial_*` values are what `reset_all` restores.
#[derive(Clone, Debug, PartialEq)]
pub struct BrushConfig {
    /// Nominal stroke radius at rest, in canvas pixels.
    pub size: f32,
    pub opacity: f32,
    pub spring: f32,
    pub friction: f32,
    /// Sub-steps per frame of movement.
    pub split_num: usize,
    /// Bristle offset between the three parallel segments.
    pub diff: f32,
    pub initial_speed: f32,
    pub initial_radius: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            size: 16.0,
            opacity: 0.8,
            spring: 0.4,
            friction: 0.45,
            split_num: 100,
            diff: 2.0,
            initial_speed: 0.5,
            initial_radius: 1.0,
        }
    }
}

/// Message text and its typographic metrics, all given at the base resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct TextConfig {
    pub lines: Vec<String>,
    pub font_size: f32,
    pub heading_font_size: f32,
    pub line_height: f32,
    /// Outline width of the body lines.
    pub stroke_weight: f32,
    /// Justify body lines between the margins (otherwise they are centred).
    pub justify_body: bool,
    /// Left and right edge of a justified line, as fractions of the canvas width.
    pub justify_margins: (f32, f32),
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            lines: ["DEAR WORLD", " LEADERS,", "PLEASE STOP", "MESSING UP", "OUR PLANET"]
                .into_iter()
                .map(String::from)
                .collect(),
            font_size: 240.0,
            heading_font_size: 90.0,
            line_height: 167.0,
            stroke_weight: 2.0,
            justify_body: true,
            justify_margins: (0.03, 0.97),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub palette: Vec<Color>,
    pub brush: BrushConfig,
    /// width / height
    pub aspect_ratio: f32,
    pub base_width: f32,
    pub base_height: f32,
    pub text: TextConfig,
    pub background: Color,
    /// Color of the window area outside the canvas.
    pub letterbox: Color,
    pub default_blend_mode: BlendMode,
    /// Modes offered in the blend menu; anything else is rejected.
    pub blend_modes: Vec<BlendMode>,
    pub storage_key: String,
    pub export_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        let palette = [
            "#FF5733", // orange-red
            "#33FF57", // green
            "#3357FF", // blue
            "#F033FF", // purple
            "#FF33F0", // pink
            "#FFFF33", // yellow
            "#33FFFF", // cyan
            "#FF3333", // red
            "#33FF33", // lime
            "#3333FF", // deep blue
        ]
        .into_iter()
        .filter_map(Color::from_hex)
        .collect();

        Self {
            palette,
            brush: BrushConfig::default(),
            aspect_ratio: 4.0 / 3.0,
            base_width: 1280.0,
            base_height: 960.0,
            text: TextConfig::default(),
            background: Color::WHITE,
            letterbox: Color::rgb(0x20, 0x20, 0x20),
            default_blend_mode: BlendMode::Multiply,
            blend_modes: vec![
                BlendMode::Multiply,
                BlendMode::Darkest,
                BlendMode::Difference,
                BlendMode::Exclusion,
                BlendMode::Overlay,
                BlendMode::Screen,
                BlendMode::Blend,
            ],
            storage_key: "dearworldleaders_drawing".into(),
            export_file_name: "dearworldleaders_drawing.png".into(),
        }
    }
}

impl Config {
    /// Same config with the brush size adjusted for the device we run on.
    pub fn for_device(mut self, mobile: bool) -> Self {
        if mobile {
            self.brush.size /= 2.0;
        }
        self
    }
}
