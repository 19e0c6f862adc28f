// Window + HUD drawing. The only place that talks to minifb.
// Everything else sees pointer snapshots, hotkeys and a FrameBuffer.

use crate::error::Error;
use crate::glyphs::glyph5x7;
use crate::types::{FrameBuffer, PointerState};
use crate::ui::Hotkey;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,
}

impl Drawer {
    /// Resizable window; the canvas is refitted whenever its size changes.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let options = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, options).map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    pub fn size(&self) -> (usize, usize) {
        let (w, h) = self.window.get_size();
        (w.max(1), h.max(1))
    }

    /// Pointer position (window pixels, clamped) and left button state.
    pub fn pointer(&self) -> PointerState {
        PointerState {
            position: self.window.get_mouse_pos(MouseMode::Clamp),
            down: self.window.get_mouse_down(MouseButton::Left),
        }
    }

    /// Keys pressed since last frame, as hotkeys.
    pub fn hotkeys(&self) -> Vec<Hotkey> {
        self.window.get_keys_pressed(KeyRepeat::No).into_iter().filter_map(to_hotkey).collect()
    }
}

fn to_hotkey(key: Key) -> Option<Hotkey> {
    let hotkey = match key {
        Key::Key0 => Hotkey::Digit(0),
        Key::Key1 => Hotkey::Digit(1),
        Key::Key2 => Hotkey::Digit(2),
        Key::Key3 => Hotkey::Digit(3),
        Key::Key4 => Hotkey::Digit(4),
        Key::Key5 => Hotkey::Digit(5),
        Key::Key6 => Hotkey::Digit(6),
        Key::Key7 => Hotkey::Digit(7),
        Key::Key8 => Hotkey::Digit(8),
        Key::Key9 => Hotkey::Digit(9),
        Key::C => Hotkey::Char('C'),
        Key::M => Hotkey::Char('M'),
        Key::R => Hotkey::Char('R'),
        Key::S => Hotkey::Char('S'),
        Key::Backspace | Key::Delete => Hotkey::Backspace,
        _ => return None,
    };
    Some(hotkey)
}

/* ---------- HUD: pixels, color swatch, tiny bitmap font ---------- */

#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Filled square with a 1-pixel black border: the current color indicator.
pub fn draw_swatch(fb: &mut FrameBuffer, x: i32, y: i32, size: i32, color: u32) {
    for dy in 0..size {
        for dx in 0..size {
            let edge = dx == 0 || dy == 0 || dx == size - 1 || dy == size - 1;
            put_pixel(fb, x + dx, y + dy, if edge { 0 } else { color });
        }
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (pass_offset, pass_color) in [(1, 0x0000_0000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(fb, x + rx + pass_offset, y + ry as i32 + pass_offset, pass_color);
                    }
                }
            }
        }
    }
}

/// HUD text: fixed 6-pixel advance, 1:1 scale.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}
