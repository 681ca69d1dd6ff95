use serde::{Deserialize, Serialize};
use shelfmark_protocol::{FontFamily, Point, Rect, RenderCommand, TextAlign, ThemeToken};

use crate::config::LabelStyle;
use crate::model::CodeKind;
use crate::symbology::{EncodeError, LinearSymbol, MatrixSymbol, Symbol};

/// Everything that goes on one record's drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceFrame {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<RenderCommand>,
    /// Set when the frame is an error placeholder.
    pub error: Option<EncodeError>,
}

impl SurfaceFrame {
    pub fn is_placeholder(&self) -> bool {
        self.error.is_some()
    }
}

/// Render an encoding result. Failures become a placeholder frame of the
/// kind's nominal size, so one bad code never disturbs the layout.
pub fn render_surface(
    encoded: &Result<Symbol, EncodeError>,
    kind: CodeKind,
    style: &LabelStyle,
) -> SurfaceFrame {
    match encoded {
        Ok(Symbol::Linear(symbol)) => render_linear(symbol, style),
        Ok(Symbol::Matrix(symbol)) => render_matrix(symbol, style),
        Err(err) => render_error(err, kind, style),
    }
}

pub fn render_linear(symbol: &LinearSymbol, style: &LabelStyle) -> SurfaceFrame {
    let margin = style.bar_margin;
    let mw = style.module_width;
    let width = symbol.modules.len() as f64 * mw + 2.0 * margin;
    let height = style.bar_height + style.text_margin + style.font_size + 2.0 * margin;

    let mut commands = Vec::with_capacity(symbol.modules.len() / 2 + 2);
    commands.push(RenderCommand::fill(
        Rect::new(0.0, 0.0, width, height),
        ThemeToken::Paper,
    ));

    // One rect per run of adjacent bars.
    let mut i = 0;
    while i < symbol.modules.len() {
        if !symbol.modules[i] {
            i += 1;
            continue;
        }
        let run = symbol.modules[i..].iter().take_while(|&&m| m).count();
        commands.push(RenderCommand::fill(
            Rect::new(margin + i as f64 * mw, margin, run as f64 * mw, style.bar_height),
            ThemeToken::Ink,
        ));
        i += run;
    }

    commands.push(RenderCommand::DrawText {
        position: Point::new(
            width / 2.0,
            margin + style.bar_height + style.text_margin + style.font_size,
        ),
        text: symbol.text.clone(),
        color: ThemeToken::Ink,
        font_size: style.font_size,
        align: TextAlign::Center,
        font: FontFamily::Monospace,
    });

    SurfaceFrame {
        width,
        height,
        commands,
        error: None,
    }
}

pub fn render_matrix(symbol: &MatrixSymbol, style: &LabelStyle) -> SurfaceFrame {
    let size = style.qr_width;
    let quiet = style.qr_margin as usize;
    let total = symbol.width + 2 * quiet;
    let px = if total == 0 { 0.0 } else { size / total as f64 };

    let mut commands = Vec::with_capacity(symbol.width * symbol.width / 4 + 1);
    commands.push(RenderCommand::fill(
        Rect::new(0.0, 0.0, size, size),
        ThemeToken::Paper,
    ));

    for y in 0..symbol.width {
        let mut x = 0;
        while x < symbol.width {
            if !symbol.is_dark(x, y) {
                x += 1;
                continue;
            }
            let run = (x..symbol.width).take_while(|&c| symbol.is_dark(c, y)).count();
            commands.push(RenderCommand::fill(
                Rect::new(
                    (quiet + x) as f64 * px,
                    (quiet + y) as f64 * px,
                    run as f64 * px,
                    px,
                ),
                ThemeToken::Ink,
            ));
            x += run;
        }
    }

    SurfaceFrame {
        width: size,
        height: size,
        commands,
        error: None,
    }
}

/// Placeholder size for a kind whose symbol could not be built.
pub fn nominal_size(kind: CodeKind, style: &LabelStyle) -> (f64, f64) {
    match kind {
        CodeKind::Barcode => (
            style.card_min_width - 2.0 * style.card_padding,
            style.bar_height + style.text_margin + style.font_size + 2.0 * style.bar_margin,
        ),
        CodeKind::QrCode => (style.qr_width, style.qr_width),
    }
}

pub fn render_error(err: &EncodeError, kind: CodeKind, style: &LabelStyle) -> SurfaceFrame {
    let (width, height) = nominal_size(kind, style);
    let mid = height / 2.0;
    let commands = vec![
        RenderCommand::DrawRect {
            rect: Rect::new(0.0, 0.0, width, height),
            color: ThemeToken::CardBackground,
            border_color: Some(ThemeToken::TextError),
        },
        RenderCommand::DrawText {
            position: Point::new(width / 2.0, mid),
            text: format!("Cannot encode as {}", kind.title()),
            color: ThemeToken::TextError,
            font_size: style.font_size,
            align: TextAlign::Center,
            font: FontFamily::Proportional,
        },
        RenderCommand::DrawText {
            position: Point::new(width / 2.0, mid + style.line_height),
            text: err.to_string(),
            color: ThemeToken::TextMuted,
            font_size: style.font_size * 0.8,
            align: TextAlign::Center,
            font: FontFamily::Proportional,
        },
    ];
    SurfaceFrame {
        width,
        height,
        commands,
        error: Some(err.clone()),
    }
}
