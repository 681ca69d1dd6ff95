use serde::{Deserialize, Serialize};
use shelfmark_protocol::{FontFamily, Point, Rect, RenderCommand, TextAlign, ThemeToken};

use crate::config::LabelStyle;
use crate::model::Record;

use super::symbol::SurfaceFrame;

/// One printable label: arrow, code surface, then shelf, module and level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCard {
    /// Position of the record in the loaded sequence.
    pub index: usize,
    pub width: f64,
    pub height: f64,
    pub commands: Vec<RenderCommand>,
}

/// Vertical offset of the surface inside a card with this record's arrow.
pub fn surface_offset(record: &Record, style: &LabelStyle) -> f64 {
    let arrow = if record.arrow.is_empty() {
        0.0
    } else {
        style.line_height
    };
    style.card_padding + arrow
}

pub fn render_label(
    index: usize,
    record: &Record,
    frame: &SurfaceFrame,
    style: &LabelStyle,
) -> LabelCard {
    let pad = style.card_padding;
    let width = style.card_min_width.max(frame.width + 2.0 * pad);
    let center = width / 2.0;

    let lines: Vec<(&str, ThemeToken, f64)> = [
        (record.shelf.as_str(), ThemeToken::TextPrimary, style.font_size),
        (record.module.as_str(), ThemeToken::TextPrimary, style.font_size),
        (record.level.as_str(), ThemeToken::TextSecondary, style.font_size * 0.85),
    ]
    .into_iter()
    .filter(|(text, ..)| !text.is_empty())
    .collect();

    let surface_y = surface_offset(record, style);
    let height = surface_y + frame.height + lines.len() as f64 * style.line_height + pad;

    let mut commands = Vec::with_capacity(frame.commands.len() + 10);
    commands.push(RenderCommand::BeginGroup {
        id: format!("label-{index}"),
        label: Some(record.code.clone()),
    });
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, width, height),
        color: ThemeToken::CardBackground,
        border_color: Some(ThemeToken::CardBorder),
    });

    if !record.arrow.is_empty() {
        commands.push(text_line(
            &record.arrow,
            center,
            pad + baseline(style),
            ThemeToken::TextSecondary,
            style.font_size * 0.85,
        ));
    }

    commands.push(RenderCommand::BeginGroup {
        id: format!("surface-{index}"),
        label: None,
    });
    commands.push(RenderCommand::translate(
        (width - frame.width) / 2.0,
        surface_y,
    ));
    commands.extend(frame.commands.iter().cloned());
    commands.push(RenderCommand::PopTransform);
    commands.push(RenderCommand::EndGroup);

    let mut y = surface_y + frame.height;
    for (text, color, size) in lines {
        commands.push(text_line(text, center, y + baseline(style), color, size));
        y += style.line_height;
    }

    commands.push(RenderCommand::EndGroup);

    LabelCard {
        index,
        width,
        height,
        commands,
    }
}

fn baseline(style: &LabelStyle) -> f64 {
    style.line_height * 0.75
}

fn text_line(text: &str, x: f64, y: f64, color: ThemeToken, font_size: f64) -> RenderCommand {
    RenderCommand::DrawText {
        position: Point::new(x, y),
        text: text.to_string(),
        color,
        font_size,
        align: TextAlign::Center,
        font: FontFamily::Proportional,
    }
}
