// What you SEE:
// • A 4:3 canvas with the message stencilled on top, letterboxed in the window.
// • Hold Left Mouse: paint with a springy, bristly brush; the text shows through the paint.
// • Releasing the mouse saves the drawing; it comes back next time you start.
// • 1-9/0 pick a palette color, R random color per stroke, M next blend mode.
// • S saves a PNG, C (or Backspace once something is saved) starts over. ESC quits.

use stencil_paint::color::ColorChoice;
use stencil_paint::rng::Rng32;
use stencil_paint::storage::{DrawingStore, FileStore};
use stencil_paint::types::FrameBuffer;
use stencil_paint::ui::UiController;
use stencil_paint::window::{draw_swatch, draw_text_5x7, Drawer};
use stencil_paint::{device, App, Config, Error};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mobile = device::is_mobile_device();
    let config = Arc::new(Config::default().for_device(mobile));
    log::info!("{} (mobile: {mobile})", device::host_user_agent());

    let store = match FileStore::in_user_data_dir() {
        Some(store) => {
            log::info!("drawing kept in {}", store.dir().display());
            store
        }
        None => {
            log::warn!("no local data dir, keeping the drawing next to the binary");
            FileStore::new(".")
        }
    };
    let store = DrawingStore::new(store, config.storage_key.clone());

    let (w, h) = (config.base_width as usize, config.base_height as usize);
    let mut drawer = Drawer::new("Dear World Leaders", w, h)?;
    let (w, h) = drawer.size();
    let mut app = App::new(config.clone(), store, w, h, Rng32::from_time());
    let ui = UiController::standard(&config.palette);
    let mut screen = FrameBuffer::new(w, h);

    // FPS for the HUD
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let (w, h) = drawer.size();
        screen.resize(w, h);
        app.resize_window(w, h);

        for key in drawer.hotkeys() {
            ui.dispatch(key, &mut app);
        }

        if let Some(event) = app.frame(drawer.pointer(), &mut screen) {
            log::debug!("{event:?}");
        }

        // HUD: color indicator swatch, control hints, blend mode, FPS
        let color_label = match app.color_choice() {
            ColorChoice::Random => "RANDOM".to_owned(),
            ColorChoice::Fixed(c) => c.to_string(),
        };
        draw_swatch(&mut screen, 8, 8, 12, app.ui().color_indicator.to_u32());
        let hud = format!("{color_label} | {} | {hud_fps_text}", app.blend_mode().as_ref().to_uppercase());
        draw_text_5x7(&mut screen, 26, 10, &hud, 0x00_FF_FF_FF);
        let hints: Vec<String> = ui
            .visible(app.ui())
            .filter(|c| c.name != "color")
            .map(|c| format!("{}: {}", c.hotkey.label(), c.tooltip.to_uppercase()))
            .collect();
        draw_text_5x7(&mut screen, 8, h as i32 - 14, &hints.join(" | "), 0x00_FF_FF_FF);

        drawer.present(&screen)?;

        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            hud_fps_text = format!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
