// Core types shared by the canvas, stencil and window code.

/// What the window shows: one `u32` per pixel, 0x00RRGGBB for minifb.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Reallocate only if the window changed size.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0u32; width * height];
        }
    }
}

/// Canvas size in (fractional) pixels, as produced by the dimension calculator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    /// Whole-pixel size used for the layer buffers (never zero).
    /// Rounds so `1440.00003` and `299.99998` land on the pixel the window actually has.
    pub fn pixels(&self) -> (u32, u32) {
        ((self.width.round() as u32).max(1), (self.height.round() as u32).max(1))
    }
}

/// Where the canvas sits inside the window (letterboxed, centered).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x: usize,
    pub y: usize,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Window coordinates -> canvas coordinates. Points outside the canvas are kept
    /// (strokes may run off the edge; the rasterizer clips).
    pub fn to_canvas(&self, wx: f32, wy: f32) -> (f32, f32) {
        (wx - self.x as f32, wy - self.y as f32)
    }
}

/// Pointer snapshot for one frame, in window coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub position: Option<(f32, f32)>,
    pub down: bool,
}
