use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// Views emit a `Vec<RenderCommand>` per drawing surface or label card.
/// Renderers (SVG, egui, canvas, terminal) consume the list in order; each
/// command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Fill a rectangle, optionally stroking its outline.
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
    },

    /// Draw a text string anchored at `position` (baseline).
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
        font: FontFamily,
    },

    /// Push an affine transform (applied to all subsequent commands until
    /// the matching `PopTransform`).
    PushTransform { translate: Point, scale: Point },

    /// Pop the most recent transform.
    PopTransform,

    /// Begin a logical group (a label card or a code surface). Renderers may
    /// use this for hit-testing, page breaks or accessibility.
    BeginGroup { id: String, label: Option<String> },

    /// End the current group.
    EndGroup,
}

impl RenderCommand {
    /// Shorthand for a borderless filled rectangle.
    pub fn fill(rect: Rect, color: ThemeToken) -> Self {
        Self::DrawRect {
            rect,
            color,
            border_color: None,
        }
    }

    /// Shorthand for a translate-only transform.
    pub fn translate(x: f64, y: f64) -> Self {
        Self::PushTransform {
            translate: Point::new(x, y),
            scale: Point::new(1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    Proportional,
    Monospace,
}
