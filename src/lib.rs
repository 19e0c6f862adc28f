// A painting toy: a spring-damped, bristly brush over a text stencil.
//
// The paint layer blends into the background (multiply by default) and the message is
// drawn on top, so the text always shows through whatever gets painted. The painting is
// kept in a small key-value store between runs.

pub mod app;
pub mod blend;
pub mod brush;
pub mod canvas;
pub mod color;
pub mod config;
pub mod device;
pub mod error;
pub mod glyphs;
pub mod layout;
pub mod raster;
pub mod rng;
pub mod stencil;
pub mod storage;
pub mod types;
pub mod ui;
pub mod window;

pub use app::{App, DragState, StrokeEvent};
pub use config::Config;
pub use error::Error;
