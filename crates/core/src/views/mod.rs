//! Label views. Each emits renderer-agnostic `RenderCommand`s in CSS px.

pub mod label;
pub mod sheet;
pub mod symbol;
pub mod text;

pub use label::{LabelCard, render_label};
pub use sheet::{LabelSheet, layout_sheet, render_empty_prompt};
pub use symbol::{SurfaceFrame, render_surface};
pub use text::symbol_lines;
