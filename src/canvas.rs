// The paint layer: an off-screen RGBA buffer the brush draws into, plus the stroke
// color/weight and the blend mode it is composited with.

use crate::blend::BlendMode;
use crate::brush::StrokeSurface;
use crate::color::Color;
use crate::config::Config;
use crate::raster;
use crate::storage::{DrawingStore, KeyValueStore};
use image::{Rgba, RgbaImage};
use std::str::FromStr;
use std::sync::Arc;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

pub struct Canvas {
    config: Arc<Config>,
    buffer: RgbaImage,
    stroke_color: Rgba<u8>,
    stroke_weight: f32,
    blend_mode: BlendMode,
    /// Set once the user has drawn something worth persisting.
    has_content: bool,
}

impl Canvas {
    /// Fresh transparent buffer with the configured default blend mode.
    pub fn new(config: Arc<Config>, width: u32, height: u32) -> Self {
        let blend_mode = config.default_blend_mode;
        let stroke_color = Color::BLACK.with_opacity(config.brush.opacity);
        Self {
            buffer: raster::solid(width.max(1), height.max(1), TRANSPARENT),
            stroke_color,
            stroke_weight: 1.0,
            blend_mode,
            has_content: false,
            config,
        }
    }

    pub fn buffer(&self) -> &RgbaImage {
        &self.buffer
    }

    pub fn size(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color.with_opacity(self.config.brush.opacity);
    }

    pub fn stroke_color(&self) -> Rgba<u8> {
        self.stroke_color
    }

    pub fn stroke_weight(&self) -> f32 {
        self.stroke_weight
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Switch blend mode by name. Names outside the configured menu are ignored.
    /// Returns whether the mode changed.
    pub fn set_blend_mode(&mut self, name: &str) -> bool {
        let Ok(mode) = BlendMode::from_str(name.trim()) else {
            log::debug!("ignoring unknown blend mode {name:?}");
            return false;
        };
        if !self.config.blend_modes.contains(&mode) {
            log::debug!("ignoring blend mode {mode} (not offered)");
            return false;
        }
        if mode == self.blend_mode {
            return false;
        }
        log::info!("blend mode: {mode}");
        self.blend_mode = mode;
        true
    }

    pub fn has_content(&self) -> bool {
        self.has_content
    }

    pub fn set_has_content(&mut self, value: bool) {
        self.has_content = value;
    }

    /// Wipe the paint. Does not touch storage.
    pub fn clear(&mut self) {
        self.buffer.pixels_mut().for_each(|p| *p = TRANSPARENT);
        self.has_content = false;
    }

    /// Rebuild the buffer at a new size, carrying the old paint over scaled to fit.
    /// If the drawing had been saved, the resized version replaces it in storage.
    pub fn resize<S: KeyValueStore>(&mut self, width: u32, height: u32, store: &mut DrawingStore<S>) {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == self.buffer.dimensions() {
            return;
        }
        let snapshot = std::mem::replace(&mut self.buffer, raster::solid(width, height, TRANSPARENT));
        raster::draw_scaled(&mut self.buffer, &snapshot);
        log::debug!("paint layer {}x{} -> {width}x{height}", snapshot.width(), snapshot.height());
        if self.has_content {
            store.save(&self.buffer);
        }
    }

    /// Persist the paint if there is any. Returns whether storage now holds it.
    pub fn save<S: KeyValueStore>(&self, store: &mut DrawingStore<S>) -> bool {
        self.has_content && store.save(&self.buffer)
    }

    /// Paint a decoded saved drawing on top of the current buffer, scaled to fit.
    pub fn apply_loaded(&mut self, image: &RgbaImage) {
        raster::draw_scaled(&mut self.buffer, image);
    }

    /// Blend the paint onto `dst` (background, usually) with the current mode.
    pub fn composite_onto(&self, dst: &mut RgbaImage) {
        raster::composite(dst, &self.buffer, self.blend_mode);
    }
}

impl StrokeSurface for Canvas {
    fn set_stroke_weight(&mut self, weight: f32) {
        self.stroke_weight = weight;
    }

    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        raster::stroke_line(&mut self.buffer, x0, y0, x1, y1, self.stroke_weight, self.stroke_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn canvas() -> Canvas {
        Canvas::new(Arc::new(Config::default()), 80, 60)
    }

    fn store() -> DrawingStore<MemoryStore> {
        DrawingStore::new(MemoryStore::new(), "k")
    }

    fn scribble(c: &mut Canvas) {
        c.set_stroke_color(Color::rgb(0x33, 0x57, 0xFF));
        c.set_stroke_weight(6.0);
        c.line(10.0, 10.0, 70.0, 50.0);
    }

    fn painted(c: &Canvas) -> usize {
        c.buffer().pixels().filter(|p| p[3] > 0).count()
    }

    #[test]
    fn starts_empty_with_default_mode() {
        let c = canvas();
        assert_eq!(c.size(), (80, 60));
        assert_eq!(c.blend_mode(), BlendMode::Multiply);
        assert_eq!(painted(&c), 0);
        assert!(!c.has_content());
    }

    #[test]
    fn stroke_color_carries_opacity() {
        let mut c = canvas();
        c.set_stroke_color(Color::rgb(1, 2, 3));
        assert_eq!(c.stroke_color(), Rgba([1, 2, 3, 204]));
    }

    #[test]
    fn unknown_or_unoffered_mode_is_ignored() {
        let mut c = canvas();
        assert!(c.set_blend_mode("screen"));
        assert!(!c.set_blend_mode("glitter"));
        assert_eq!(c.blend_mode(), BlendMode::Screen);
        // real mode, but not in the default menu
        assert!(!c.set_blend_mode("hard_light"));
        assert_eq!(c.blend_mode(), BlendMode::Screen);
    }

    #[test]
    fn clear_wipes_paint_and_flag() {
        let mut c = canvas();
        scribble(&mut c);
        c.set_has_content(true);
        assert!(painted(&c) > 0);
        c.clear();
        assert_eq!(painted(&c), 0);
        assert!(!c.has_content());
    }

    #[test]
    fn save_is_noop_without_content() {
        let mut c = canvas();
        let mut s = store();
        scribble(&mut c);
        assert!(!c.save(&mut s));
        assert!(!s.has_saved());
        c.set_has_content(true);
        assert!(c.save(&mut s));
        assert!(s.has_saved());
    }

    #[test]
    fn resize_keeps_paint_and_mode_and_repersists() {
        let mut c = canvas();
        let mut s = store();
        c.set_blend_mode("darkest");
        scribble(&mut c);
        c.set_has_content(true);
        c.resize(160, 120, &mut s);
        assert_eq!(c.size(), (160, 120));
        assert_eq!(c.blend_mode(), BlendMode::Darkest);
        // the diagonal scaled by 2
        assert!(c.buffer().get_pixel(80, 60)[3] > 0);
        let saved = s.load().unwrap().wait().unwrap();
        assert_eq!(saved.dimensions(), (160, 120));
    }

    #[test]
    fn resize_without_content_does_not_touch_storage() {
        let mut c = canvas();
        let mut s = store();
        scribble(&mut c);
        c.resize(40, 30, &mut s);
        assert!(!s.has_saved());
    }

    #[test]
    fn composite_multiplies_over_background() {
        let mut c = canvas();
        c.set_stroke_color(Color::rgb(0xFF, 0x57, 0x33));
        c.set_stroke_weight(10.0);
        c.line(40.0, 30.0, 40.0, 30.0);
        let mut bg = raster::solid(80, 60, Rgba([255, 255, 255, 255]));
        c.composite_onto(&mut bg);
        let p = bg.get_pixel(40, 30);
        assert_eq!(p[0], 255);
        assert!(p[1] < 255 && p[2] < 255);
        assert_eq!(*bg.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }
}
