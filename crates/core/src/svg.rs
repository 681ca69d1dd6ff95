//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings,
//! and wraps label cards into a printable HTML page.

use std::fmt::Write;

use shelfmark_protocol::{FontFamily, RenderCommand, TextAlign, ThemeToken};

use crate::views::LabelCard;

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions. Output always
/// uses the light (print) palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64) -> String {
    let mut svg = String::with_capacity(commands.len() * 96 + 256);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" shape-rendering="crispEdges">"#,
    );
    push_commands(&mut svg, commands);
    svg.push_str("</svg>");
    svg
}

fn push_commands(svg: &mut String, commands: &[RenderCommand]) {
    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
            } => {
                let fill = css_color(*color);
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}""#,
                    rect.x, rect.y, rect.w, rect.h,
                );
                if let Some(border) = border_color {
                    let _ = write!(svg, r#" stroke="{}""#, css_color(*border));
                }
                svg.push_str("/>");
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
                font,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let family = match font {
                    FontFamily::Proportional => "system-ui,-apple-system,sans-serif",
                    FontFamily::Monospace => "ui-monospace,monospace",
                };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}" text-anchor="{anchor}" font-family="{family}">{}</text>"#,
                    position.x,
                    position.y,
                    css_color(*color),
                    escape_xml(text),
                );
            }
            RenderCommand::PushTransform { translate, scale } => {
                let _ = write!(
                    svg,
                    r#"<g transform="translate({} {}) scale({} {})">"#,
                    translate.x, translate.y, scale.x, scale.y,
                );
            }
            RenderCommand::BeginGroup { id, label } => {
                let _ = write!(svg, r#"<g id="{}""#, escape_xml(id));
                if let Some(label) = label {
                    let _ = write!(svg, r#" aria-label="{}""#, escape_xml(label));
                }
                svg.push('>');
            }
            RenderCommand::PopTransform | RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }
}

/// A self-contained HTML page with one inline SVG per card, for the
/// browser's print dialog. Cards never split across pages.
pub fn render_print_html(cards: &[LabelCard], title: &str) -> String {
    let mut html = String::with_capacity(cards.iter().map(|c| c.commands.len() * 96).sum::<usize>() + 1024);
    let _ = write!(
        html,
        concat!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n",
            "<style>\n",
            "body {{ margin: 0; padding: 16px; background: #ffffff; }}\n",
            ".label {{ break-inside: avoid; page-break-inside: avoid; margin: 0 0 16px 0; }}\n",
            ".label svg {{ display: block; }}\n",
            "@media print {{ body {{ padding: 0; }} }}\n",
            "</style>\n</head>\n<body>\n"
        ),
        escape_xml(title),
    );
    for card in cards {
        let _ = write!(html, "<div class=\"label\" data-index=\"{}\">", card.index);
        html.push_str(&render_svg(&card.commands, card.width, card.height));
        html.push_str("</div>\n");
    }
    html.push_str("</body>\n</html>\n");
    html
}

/// CSS color of a token in the print palette.
pub fn css_color(token: ThemeToken) -> &'static str {
    match token {
        ThemeToken::Ink => "#000000",
        ThemeToken::Paper => "#ffffff",
        ThemeToken::CardBackground => "#ffffff",
        ThemeToken::CardBorder => "#e5e7eb",
        ThemeToken::TextPrimary => "#1f2937",
        ThemeToken::TextSecondary => "#4b5563",
        ThemeToken::TextMuted => "#6b7280",
        ThemeToken::TextError => "#dc2626",
        ThemeToken::Background => "#f9fafb",
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
