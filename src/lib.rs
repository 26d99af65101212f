#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod color;
pub mod components;
pub mod config;
pub mod error;
pub mod event;
pub mod file_handler;
pub mod fill;
pub mod input;
pub mod panels;
pub mod preview;
pub mod raster;
pub mod selection;
pub mod stamp;
pub mod surface;
pub mod task;
pub mod text;
pub mod texture_manager;
pub mod tools;

pub use app::{PaintApp, PaintSettings};
pub use canvas::{Canvas, CanvasInput};
pub use color::ColorState;
pub use config::{ConfigSetting, FontConfig, ToolConfig};
pub use error::{CanvasError, CanvasResult};
pub use event::{CanvasEvent, EventBus, EventHandler};
pub use fill::{FillReport, flood_fill};
pub use preview::{PREVIEW_INTERVAL, PreviewStats};
pub use selection::Selection;
pub use stamp::StampLibrary;
pub use surface::{CANVAS_HEIGHT, CANVAS_WIDTH, Surface};
pub use text::FontBook;
pub use tools::{KeyInput, Mode, PointerEvent, Tool, ToolType};
