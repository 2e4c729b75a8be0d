#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod flood_fill;
pub mod history;
pub mod input;
pub mod raster;
pub mod renderer;
pub mod state;
pub mod surface;
pub mod tools;
pub mod util;

pub use app::PaintApp;
pub use canvas::Canvas;
pub use color::Rgb;
pub use config::SurfaceConfig;
pub use error::{SurfaceError, SurfaceResult};
pub use export::{ClipboardSink, ExportedImage, RasterFormat};
pub use history::{History, Snapshot};
pub use input::{InputEvent, InputHandler, Shortcut};
pub use renderer::Renderer;
pub use state::Gesture;
pub use surface::DrawingSurface;
pub use tools::{ToolSettings, ToolType};
