// The application driver: pointer routing, stroke lifecycle, compositing and the
// glue between canvas, stencil, brush and storage. One instance, driven once per frame.

use crate::brush::Brush;
use crate::canvas::Canvas;
use crate::color::{random_color, Color, ColorChoice};
use crate::config::Config;
use crate::error::Error;
use crate::layout;
use crate::raster;
use crate::rng::Rng32;
use crate::stencil::TextStencil;
use crate::storage::{DrawingStore, KeyValueStore, PendingLoad};
use crate::types::{FrameBuffer, PointerState, Viewport};
use crate::ui::UiState;
use crate::blend::BlendMode;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Pointer drag state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Stroking,
}

/// Emitted on drag transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeEvent {
    Began,
    /// `saved` says whether the drawing made it into storage.
    Ended { saved: bool },
}

pub struct App<S> {
    config: Arc<Config>,
    brush: Brush,
    canvas: Canvas,
    stencil: TextStencil,
    store: DrawingStore<S>,
    drag: DragState,
    viewport: Viewport,
    window_size: (usize, usize),
    color_choice: ColorChoice,
    /// Color the next stroke will use.
    next_color: Color,
    rng: Rng32,
    /// Saved drawing still decoding; applied when it lands.
    pending_load: Option<PendingLoad>,
    ui: UiState,
    /// A stroke has ended since startup, so the paint layer is the user's, not the load's.
    painted: bool,
    /// Background + paint + stencil, rebuilt every `compose`.
    composed: RgbaImage,
}

impl<S: KeyValueStore> App<S> {
    /// Build every component for a window of the given size and start loading any saved
    /// drawing. The load finishes in the background; see [`App::poll_pending_load`].
    pub fn new(config: Arc<Config>, store: DrawingStore<S>, window_width: usize, window_height: usize, mut rng: Rng32) -> Self {
        let viewport = layout::viewport(&config, window_width, window_height);
        let brush_rng = Rng32::from_seed(rng.next_u32());
        let brush = Brush::new(&config.brush, brush_rng);
        let canvas = Canvas::new(config.clone(), viewport.width, viewport.height);
        let stencil = TextStencil::new(config.clone(), viewport.width, viewport.height);
        let next_color = random_color(&config.palette, &mut rng).unwrap_or(Color::BLACK);

        let mut app = Self {
            brush,
            canvas,
            stencil,
            store,
            drag: DragState::Idle,
            viewport,
            window_size: (window_width, window_height),
            color_choice: ColorChoice::Random,
            next_color,
            rng,
            pending_load: None,
            ui: UiState { restart_visible: false, color_indicator: next_color },
            painted: false,
            composed: RgbaImage::new(1, 1),
            config,
        };

        if let Some(pending) = app.store.load() {
            log::info!("restoring saved drawing");
            app.canvas.set_has_content(true);
            app.ui.update_for_saved_drawing(true);
            app.pending_load = Some(pending);
        }
        app
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn stencil(&self) -> &TextStencil {
        &self.stencil
    }

    pub fn store(&self) -> &DrawingStore<S> {
        &self.store
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn color_choice(&self) -> ColorChoice {
        self.color_choice
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.canvas.blend_mode()
    }

    /// Apply the saved drawing if its decode has finished. True once it has been applied.
    /// A decode that lands after a restart is still painted in (accepted race); a resize
    /// waits for it instead. A failed decode drops the "saved drawing" state.
    pub fn poll_pending_load(&mut self) -> bool {
        let Some(result) = self.pending_load.as_ref().and_then(PendingLoad::poll) else {
            return false;
        };
        self.pending_load = None;
        self.apply_load_result(result)
    }

    /// Block until the saved drawing (if any) is decoded and applied.
    pub fn finish_pending_load(&mut self) -> bool {
        match self.pending_load.take() {
            Some(pending) => self.apply_load_result(pending.wait()),
            None => false,
        }
    }

    fn apply_load_result(&mut self, result: Result<RgbaImage, Error>) -> bool {
        match result {
            Ok(image) => {
                self.canvas.apply_loaded(&image);
                true
            }
            Err(e) => {
                log::error!("Error loading drawing: {e}");
                if !self.painted {
                    self.canvas.set_has_content(false);
                    self.ui.update_for_saved_drawing(false);
                }
                false
            }
        }
    }

    /// Feed one frame of pointer state through the Idle/Stroking machine.
    pub fn handle_pointer(&mut self, pointer: PointerState) -> Option<StrokeEvent> {
        match (self.drag, pointer.down) {
            (DragState::Idle, true) => {
                let (x, y) = self.canvas_point(pointer.position?)?;
                self.begin_stroke();
                self.brush.stroke_to(&mut self.canvas, x, y);
                Some(StrokeEvent::Began)
            }
            (DragState::Stroking, true) => {
                // Off-window samples keep the stroke alive without moving it.
                if let Some((wx, wy)) = pointer.position {
                    let (x, y) = self.viewport.to_canvas(wx, wy);
                    self.brush.stroke_to(&mut self.canvas, x, y);
                }
                None
            }
            (DragState::Stroking, false) => Some(self.end_stroke()),
            (DragState::Idle, false) => None,
        }
    }

    /// Window point -> canvas point, only if it is on the canvas.
    fn canvas_point(&self, (wx, wy): (f32, f32)) -> Option<(f32, f32)> {
        let (x, y) = self.viewport.to_canvas(wx, wy);
        let inside = x >= 0.0 && y >= 0.0 && x < self.viewport.width as f32 && y < self.viewport.height as f32;
        inside.then_some((x, y))
    }

    fn begin_stroke(&mut self) {
        self.drag = DragState::Stroking;
        let color = match self.color_choice {
            ColorChoice::Fixed(color) => color,
            ColorChoice::Random => {
                let color = self.next_color;
                self.next_color = random_color(&self.config.palette, &mut self.rng).unwrap_or(color);
                color
            }
        };
        self.canvas.set_stroke_color(color);
        self.ui.color_indicator = self.indicator_color();
        log::debug!("stroke begins in {color}, next {}", self.ui.color_indicator);
    }

    fn end_stroke(&mut self) -> StrokeEvent {
        self.drag = DragState::Idle;
        self.brush.end();
        self.painted = true;
        self.canvas.set_has_content(true);
        let saved = self.canvas.save(&mut self.store);
        // A failed save leaves the previous drawing in storage, and restart must still reach it.
        self.ui.update_for_saved_drawing(saved || self.store.has_saved());
        StrokeEvent::Ended { saved }
    }

    fn indicator_color(&self) -> Color {
        match self.color_choice {
            ColorChoice::Fixed(color) => color,
            ColorChoice::Random => self.next_color,
        }
    }

    /// Wipe paint and brush state and forget the saved drawing.
    pub fn restart(&mut self) {
        log::info!("starting a new drawing");
        self.canvas.clear();
        self.brush.reset_all();
        self.drag = DragState::Idle;
        self.store.clear();
        self.ui.update_for_saved_drawing(false);
    }

    pub fn select_color(&mut self, choice: ColorChoice) {
        self.color_choice = choice;
        self.ui.color_indicator = self.indicator_color();
    }

    /// Pick a palette entry; out-of-range indices are ignored.
    pub fn select_palette_color(&mut self, index: usize) {
        match self.config.palette.get(index) {
            Some(&color) => self.select_color(ColorChoice::Fixed(color)),
            None => log::debug!("ignoring palette index {index}"),
        }
    }

    /// Switch to a named blend mode (ignored unless offered). Returns whether it changed.
    pub fn select_blend_mode(&mut self, name: &str) -> bool {
        self.canvas.set_blend_mode(name)
    }

    /// Step through the offered blend modes.
    pub fn cycle_blend_mode(&mut self) {
        let modes = &self.config.blend_modes;
        if modes.is_empty() {
            return;
        }
        let next = match modes.iter().position(|m| *m == self.canvas.blend_mode()) {
            Some(i) => modes[(i + 1) % modes.len()],
            None => modes[0],
        };
        self.canvas.set_blend_mode(next.as_ref());
    }

    /// The window changed size: refit the canvas, carry the paint over, redo the text.
    pub fn resize_window(&mut self, window_width: usize, window_height: usize) {
        if (window_width, window_height) == self.window_size {
            return;
        }
        self.window_size = (window_width, window_height);
        let viewport = layout::viewport(&self.config, window_width, window_height);
        let resized = (viewport.width, viewport.height) != self.canvas.size();
        self.viewport = viewport;
        if resized {
            // The resized layer gets saved, so the stored drawing has to be in it first.
            self.finish_pending_load();
            log::info!("canvas {}x{}", viewport.width, viewport.height);
            self.brush.end();
            self.canvas.resize(viewport.width, viewport.height, &mut self.store);
            self.stencil.render(viewport.width, viewport.height);
        }
    }

    /// Flatten background, paint (with its blend mode) and stencil.
    pub fn compose(&mut self) -> &RgbaImage {
        let (w, h) = self.canvas.size();
        let background = self.config.background.with_opacity(1.0);
        if self.composed.dimensions() == (w, h) {
            self.composed.pixels_mut().for_each(|p| *p = background);
        } else {
            self.composed = raster::solid(w, h, background);
        }
        self.canvas.composite_onto(&mut self.composed);
        raster::composite(&mut self.composed, self.stencil.buffer(), BlendMode::Blend);
        &self.composed
    }

    /// Compose and copy into the window framebuffer, letterboxed.
    pub fn render(&mut self, fb: &mut FrameBuffer) {
        let letterbox = self.config.letterbox.to_u32();
        fb.pixels.iter_mut().for_each(|p| *p = letterbox);
        let viewport = self.viewport;
        raster::blit_to_frame(fb, self.compose(), viewport.x, viewport.y);
    }

    /// One frame: finish loads, route the pointer, draw.
    pub fn frame(&mut self, pointer: PointerState, fb: &mut FrameBuffer) -> Option<StrokeEvent> {
        self.poll_pending_load();
        let event = self.handle_pointer(pointer);
        self.render(fb);
        event
    }

    /// Write the flattened picture as a PNG.
    pub fn export_png(&mut self, path: &Path) -> Result<(), Error> {
        self.compose().save_with_format(path, image::ImageFormat::Png)?;
        log::info!("exported {}", path.display());
        Ok(())
    }

    /// Export under the conventional file name in the user's picture directory
    /// (current directory if there is none).
    pub fn export_to_pictures(&mut self) -> Result<PathBuf, Error> {
        let mut path = dirs::picture_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(&self.config.export_file_name);
        self.export_png(&path)?;
        Ok(path)
    }
}
