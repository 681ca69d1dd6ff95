use shelfmark_core::svg::css_color;
use shelfmark_core::views::SurfaceFrame;
use shelfmark_core::{Surface, SurfaceError};
use shelfmark_protocol::{FontFamily, RenderCommand, TextAlign};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// A `<canvas>` owned by the host page.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }

    fn context(&self) -> Result<CanvasRenderingContext2d, SurfaceError> {
        self.canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| SurfaceError::Draw("canvas has no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::Draw("unexpected context type".into()))
    }
}

impl Surface for CanvasSurface {
    fn paint(&mut self, frame: &SurfaceFrame) -> Result<(), SurfaceError> {
        if !self.canvas.is_connected() {
            return Err(SurfaceError::Gone);
        }
        // Resizing also clears the canvas.
        self.canvas.set_width(frame.width.ceil() as u32);
        self.canvas.set_height(frame.height.ceil() as u32);
        let ctx = self.context()?;
        draw(&ctx, &frame.commands).map_err(js_err)
    }
}

fn draw(ctx: &CanvasRenderingContext2d, commands: &[RenderCommand]) -> Result<(), JsValue> {
    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
            } => {
                ctx.set_fill_style_str(css_color(*color));
                ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
                if let Some(border) = border_color {
                    ctx.set_stroke_style_str(css_color(*border));
                    ctx.stroke_rect(rect.x + 0.5, rect.y + 0.5, rect.w - 1.0, rect.h - 1.0);
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
                font,
            } => {
                let family = match font {
                    FontFamily::Proportional => "system-ui, sans-serif",
                    FontFamily::Monospace => "monospace",
                };
                ctx.set_font(&format!("{font_size}px {family}"));
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                    TextAlign::Right => "right",
                });
                ctx.set_text_baseline("alphabetic");
                ctx.set_fill_style_str(css_color(*color));
                ctx.fill_text(text, position.x, position.y)?;
            }
            RenderCommand::PushTransform { translate, scale } => {
                ctx.save();
                ctx.translate(translate.x, translate.y)?;
                ctx.scale(scale.x, scale.y)?;
            }
            RenderCommand::PopTransform => ctx.restore(),
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
    Ok(())
}

fn js_err(e: JsValue) -> SurfaceError {
    SurfaceError::Draw(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}
