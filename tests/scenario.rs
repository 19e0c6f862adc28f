// Whole-app scenarios driven through the public API, no window.

use stencil_paint::rng::Rng32;
use stencil_paint::storage::{DrawingStore, FileStore, KeyValueStore, MemoryStore};
use stencil_paint::types::{FrameBuffer, PointerState};
use stencil_paint::ui::{Hotkey, UiController};
use stencil_paint::{App, Config, StrokeEvent};
use std::sync::Arc;

fn pressed(x: f32, y: f32) -> PointerState {
    PointerState { position: Some((x, y)), down: true }
}

fn released() -> PointerState {
    PointerState { position: Some((100.0, 100.0)), down: false }
}

#[test]
fn stroke_saves_and_clear_forgets() {
    let config = Arc::new(Config::default());
    let key = config.storage_key.clone();
    let store = DrawingStore::new(MemoryStore::new(), key.clone());
    let mut app = App::new(config.clone(), store, 1280, 960, Rng32::from_seed(2024));
    let ui = UiController::standard(&config.palette);
    let mut fb = FrameBuffer::new(1280, 960);

    assert!(!app.store().inner().contains_key(&key));
    assert!(!app.ui().restart_visible);

    // drag from (10,10) to (100,100) over a few frames
    assert_eq!(app.frame(pressed(10.0, 10.0), &mut fb), Some(StrokeEvent::Began));
    for i in 1..=9 {
        let t = 10.0 + i as f32 * 10.0;
        app.frame(pressed(t, t), &mut fb);
    }
    assert_eq!(app.frame(released(), &mut fb), Some(StrokeEvent::Ended { saved: true }));

    let value = app.store().inner().get(&key).unwrap().unwrap();
    assert!(!value.is_empty());
    assert!(app.ui().restart_visible);
    assert!(app.canvas().buffer().pixels().any(|p| p[3] > 0));

    assert!(ui.dispatch(Hotkey::Char('C'), &mut app));
    assert!(!app.store().inner().contains_key(&key));
    assert!(!app.ui().restart_visible);
    assert!(app.canvas().buffer().pixels().all(|p| p[3] == 0));
}

#[test]
fn drawing_survives_a_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = Arc::new(Config::default());

    let painted = {
        let store = DrawingStore::new(FileStore::new(dir.path()), config.storage_key.clone());
        let mut app = App::new(config.clone(), store, 640, 480, Rng32::from_seed(3));
        let mut fb = FrameBuffer::new(640, 480);
        app.frame(pressed(50.0, 300.0), &mut fb);
        for i in 0..12 {
            app.frame(pressed(50.0 + i as f32 * 40.0, 300.0 - i as f32 * 15.0), &mut fb);
        }
        app.frame(released(), &mut fb);
        app.canvas().buffer().clone()
    };

    let store = DrawingStore::new(FileStore::new(dir.path()), config.storage_key.clone());
    let mut app = App::new(config, store, 640, 480, Rng32::from_seed(4));
    assert!(app.ui().restart_visible);
    assert!(app.finish_pending_load());
    assert_eq!(app.canvas().buffer(), &painted);
}

#[test]
fn storage_failure_keeps_the_app_usable() {
    let config = Arc::new(Config::default());
    let store = DrawingStore::new(MemoryStore::with_quota(8), config.storage_key.clone());
    let mut app = App::new(config, store, 320, 240, Rng32::from_seed(9));
    let mut fb = FrameBuffer::new(320, 240);

    app.frame(pressed(20.0, 20.0), &mut fb);
    app.frame(pressed(120.0, 90.0), &mut fb);
    assert_eq!(app.frame(released(), &mut fb), Some(StrokeEvent::Ended { saved: false }));
    assert!(!app.ui().restart_visible);
    assert!(app.canvas().buffer().pixels().any(|p| p[3] > 0));
}
