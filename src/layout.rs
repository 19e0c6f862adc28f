// Fits the fixed-aspect canvas into whatever size the window currently has.

use crate::config::Config;
use crate::types::{CanvasSize, Viewport};

/// Largest canvas with the configured aspect ratio that fits in the window.
pub fn canvas_dimensions(config: &Config, window_width: f32, window_height: f32) -> CanvasSize {
    let aspect = config.aspect_ratio;
    if window_height <= 0.0 || window_width <= 0.0 {
        return CanvasSize { width: 0.0, height: 0.0 };
    }
    if window_width / window_height > aspect {
        // Window is wider than the canvas wants: height limits.
        CanvasSize { width: window_height * aspect, height: window_height }
    } else {
        CanvasSize { width: window_width, height: window_width / aspect }
    }
}

/// Canvas dimensions plus the offset that centers it in the window.
pub fn viewport(config: &Config, window_width: usize, window_height: usize) -> Viewport {
    let size = canvas_dimensions(config, window_width as f32, window_height as f32);
    let (width, height) = size.pixels();
    Viewport {
        x: window_width.saturating_sub(width as usize) / 2,
        y: window_height.saturating_sub(height as usize) / 2,
        width,
        height,
    }
}
