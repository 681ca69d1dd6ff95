pub mod commands;
pub mod theme;
pub mod types;

pub use commands::{FontFamily, RenderCommand, TextAlign};
pub use theme::ThemeToken;
pub use types::{Point, Rect};
