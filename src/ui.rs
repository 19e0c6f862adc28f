// Controls: a name, a tooltip, a hotkey and a typed handler.
//
// The controller knows nothing about the window; the presentation layer turns key presses
// into `Hotkey`s and hands them to `UiController::dispatch`.

use crate::app::App;
use crate::color::{Color, ColorChoice};
use crate::storage::KeyValueStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hotkey {
    /// Letter keys, stored uppercase.
    Char(char),
    Digit(u8),
    Backspace,
}

impl Hotkey {
    /// Short name for the HUD.
    pub fn label(&self) -> String {
        match self {
            Self::Char(c) => c.to_string(),
            Self::Digit(d) => d.to_string(),
            Self::Backspace => "BKSP".to_owned(),
        }
    }
}

/// What the controls show: restart only exists while a drawing is saved, and the indicator
/// shows the color the next stroke will use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UiState {
    pub restart_visible: bool,
    pub color_indicator: Color,
}

impl UiState {
    pub fn update_for_saved_drawing(&mut self, has_saved_drawing: bool) {
        self.restart_visible = has_saved_drawing;
    }
}

pub type Handler<S> = Box<dyn Fn(&mut App<S>)>;

pub struct Control<S> {
    pub name: &'static str,
    pub tooltip: String,
    pub hotkey: Hotkey,
    handler: Handler<S>,
    shown: fn(&UiState) -> bool,
}

impl<S: KeyValueStore> Control<S> {
    pub fn new(
        name: &'static str,
        tooltip: impl Into<String>,
        hotkey: Hotkey,
        handler: impl Fn(&mut App<S>) + 'static,
    ) -> Self {
        Self { name, tooltip: tooltip.into(), hotkey, handler: Box::new(handler), shown: |_| true }
    }

    /// Only active (and listed) while `shown` says so.
    pub fn shown_when(mut self, shown: fn(&UiState) -> bool) -> Self {
        self.shown = shown;
        self
    }

    pub fn is_shown(&self, ui: &UiState) -> bool {
        (self.shown)(ui)
    }
}

pub struct UiController<S> {
    controls: Vec<Control<S>>,
}

impl<S: KeyValueStore> Default for UiController<S> {
    fn default() -> Self {
        Self { controls: Vec::new() }
    }
}

impl<S: KeyValueStore + 'static> UiController<S> {
    /// Save, restart, clear, color menu (one key per palette entry plus random) and the
    /// blend menu.
    pub fn standard(palette: &[Color]) -> Self {
        let mut ui = Self::default();
        ui.register(Control::new("save", "Save as PNG", Hotkey::Char('S'), |app| {
            if let Err(e) = app.export_to_pictures() {
                log::error!("Error exporting drawing: {e}");
            }
        }));
        ui.register(
            Control::new("restart", "Start new drawing", Hotkey::Backspace, App::restart)
                .shown_when(|ui| ui.restart_visible),
        );
        ui.register(Control::new("clear", "Clear canvas", Hotkey::Char('C'), App::restart));
        for (index, color) in palette.iter().enumerate().take(10) {
            // 1..9 then 0 for the tenth
            let digit = ((index + 1) % 10) as u8;
            let tooltip = format!("Paint with {color}");
            ui.register(Control::new("color", tooltip, Hotkey::Digit(digit), move |app| {
                app.select_palette_color(index);
            }));
        }
        ui.register(Control::new("random color", "Random color every stroke", Hotkey::Char('R'), |app| {
            app.select_color(ColorChoice::Random)
        }));
        ui.register(Control::new("blend", "Next blend mode", Hotkey::Char('M'), App::cycle_blend_mode));
        ui
    }

    pub fn register(&mut self, control: Control<S>) {
        self.controls.push(control);
    }

    /// Run the handler bound to `key`. Returns false if nothing (visible) is bound to it.
    pub fn dispatch(&self, key: Hotkey, app: &mut App<S>) -> bool {
        let ui = *app.ui();
        match self.controls.iter().find(|c| c.hotkey == key && c.is_shown(&ui)) {
            Some(control) => {
                log::debug!("control {:?} ({key:?})", control.name);
                (control.handler)(app);
                true
            }
            None => false,
        }
    }

    /// Controls currently on offer (for the HUD).
    pub fn visible<'a>(&'a self, ui: &'a UiState) -> impl Iterator<Item = &'a Control<S>> + 'a {
        self.controls.iter().filter(move |c| c.is_shown(ui))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::rng::Rng32;
    use crate::storage::{DrawingStore, MemoryStore};
    use crate::types::PointerState;
    use std::sync::Arc;

    fn app() -> App<MemoryStore> {
        let config = Arc::new(Config::default());
        let store = DrawingStore::new(MemoryStore::new(), config.storage_key.clone());
        App::new(config, store, 640, 480, Rng32::from_seed(5))
    }

    fn draw_something(app: &mut App<MemoryStore>) {
        for (x, y) in [(20.0, 20.0), (60.0, 40.0), (90.0, 70.0)] {
            app.handle_pointer(PointerState { position: Some((x, y)), down: true });
        }
        app.handle_pointer(PointerState::default());
    }

    #[test]
    fn digit_keys_pick_palette_colors() {
        let mut app = app();
        let ui = UiController::standard(&app.config().palette.clone());
        assert!(ui.dispatch(Hotkey::Digit(1), &mut app));
        assert_eq!(app.color_choice(), ColorChoice::Fixed(app.config().palette[0]));
        assert!(ui.dispatch(Hotkey::Digit(0), &mut app));
        assert_eq!(app.color_choice(), ColorChoice::Fixed(app.config().palette[9]));
        assert!(ui.dispatch(Hotkey::Char('R'), &mut app));
        assert_eq!(app.color_choice(), ColorChoice::Random);
    }

    #[test]
    fn restart_key_only_works_while_visible() {
        let mut app = app();
        let ui = UiController::standard(&app.config().palette.clone());
        assert!(!ui.dispatch(Hotkey::Backspace, &mut app));
        assert!(ui.visible(app.ui()).all(|c| c.name != "restart"));

        draw_something(&mut app);
        assert!(app.ui().restart_visible);
        assert!(ui.visible(app.ui()).any(|c| c.name == "restart"));
        assert!(ui.dispatch(Hotkey::Backspace, &mut app));
        assert!(!app.ui().restart_visible);
        assert!(!app.store().has_saved());
    }

    #[test]
    fn blend_key_cycles() {
        let mut app = app();
        let ui = UiController::standard(&app.config().palette.clone());
        let before = app.blend_mode();
        assert!(ui.dispatch(Hotkey::Char('M'), &mut app));
        assert_ne!(app.blend_mode(), before);
    }

    #[test]
    fn unbound_key_is_ignored() {
        let mut app = app();
        let ui = UiController::standard(&app.config().palette.clone());
        assert!(!ui.dispatch(Hotkey::Char('Q'), &mut app));
    }

    #[test]
    fn custom_controls_can_be_registered() {
        let mut app = app();
        let mut ui = UiController::default();
        ui.register(Control::new("overlay", "Overlay mode", Hotkey::Char('O'), |app: &mut App<MemoryStore>| {
            app.select_blend_mode("overlay");
        }));
        assert!(ui.dispatch(Hotkey::Char('O'), &mut app));
        assert_eq!(app.blend_mode(), crate::blend::BlendMode::Overlay);
    }
}
