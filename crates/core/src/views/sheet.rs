use serde::{Deserialize, Serialize};
use shelfmark_protocol::{FontFamily, Point, Rect, RenderCommand, TextAlign, ThemeToken};

use crate::ingest::schema::expected_columns;

use super::label::LabelCard;

/// Height of the empty-state prompt.
pub const EMPTY_PROMPT_HEIGHT: f64 = 120.0;

/// Cards laid out on a grid, ready for SVG or print export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSheet {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<RenderCommand>,
}

/// Place cards left to right, top to bottom. Cells take the widest card's
/// width; each row is as tall as its tallest card.
pub fn layout_sheet(cards: &[LabelCard], columns: u32, gap: f64) -> LabelSheet {
    let columns = columns.max(1) as usize;
    let cell_w = cards.iter().map(|c| c.width).fold(0.0, f64::max);

    let mut commands = Vec::with_capacity(cards.iter().map(|c| c.commands.len() + 2).sum());
    let mut y = 0.0;
    for row in cards.chunks(columns) {
        for (col, card) in row.iter().enumerate() {
            let x = col as f64 * (cell_w + gap);
            commands.push(RenderCommand::translate(x, y));
            commands.extend(card.commands.iter().cloned());
            commands.push(RenderCommand::PopTransform);
        }
        let row_h = row.iter().map(|c| c.height).fold(0.0, f64::max);
        y += row_h + gap;
    }

    let used_cols = columns.min(cards.len());
    let width = if used_cols == 0 {
        0.0
    } else {
        used_cols as f64 * cell_w + (used_cols - 1) as f64 * gap
    };
    let height = if cards.is_empty() { 0.0 } else { y - gap };

    LabelSheet {
        width,
        height,
        commands,
    }
}

/// Shown instead of cards when no records are loaded.
pub fn render_empty_prompt(width: f64) -> Vec<RenderCommand> {
    let center = width / 2.0;
    let line = |y: f64, text: String, color: ThemeToken, font_size: f64, font: FontFamily| {
        RenderCommand::DrawText {
            position: Point::new(center, y),
            text,
            color,
            font_size,
            align: TextAlign::Center,
            font,
        }
    };
    vec![
        RenderCommand::DrawRect {
            rect: Rect::new(0.0, 0.0, width, EMPTY_PROMPT_HEIGHT),
            color: ThemeToken::Background,
            border_color: None,
        },
        line(
            40.0,
            "Open a spreadsheet to create labels".into(),
            ThemeToken::TextPrimary,
            18.0,
            FontFamily::Proportional,
        ),
        line(
            70.0,
            "The first sheet needs a header row with these columns:".into(),
            ThemeToken::TextSecondary,
            13.0,
            FontFamily::Proportional,
        ),
        line(
            95.0,
            expected_columns().join(", "),
            ThemeToken::TextMuted,
            13.0,
            FontFamily::Monospace,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(index: usize, width: f64, height: f64) -> LabelCard {
        LabelCard {
            index,
            width,
            height,
            commands: vec![RenderCommand::EndGroup],
        }
    }

    fn offsets(sheet: &LabelSheet) -> Vec<(f64, f64)> {
        sheet
            .commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::PushTransform { translate, .. } => Some((translate.x, translate.y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn single_column_stacks_cards() {
        let sheet = layout_sheet(&[card(0, 200.0, 100.0), card(1, 220.0, 50.0)], 1, 10.0);
        assert_eq!(offsets(&sheet), vec![(0.0, 0.0), (0.0, 110.0)]);
        assert_eq!((sheet.width, sheet.height), (220.0, 160.0));
    }

    #[test]
    fn grid_wraps_after_column_count() {
        let cards: Vec<_> = (0..3).map(|i| card(i, 100.0, 40.0)).collect();
        let sheet = layout_sheet(&cards, 2, 5.0);
        assert_eq!(offsets(&sheet), vec![(0.0, 0.0), (105.0, 0.0), (0.0, 45.0)]);
        assert_eq!((sheet.width, sheet.height), (205.0, 85.0));
    }

    #[test]
    fn empty_sheet_has_no_size() {
        let sheet = layout_sheet(&[], 3, 16.0);
        assert!(sheet.commands.is_empty());
        assert_eq!((sheet.width, sheet.height), (0.0, 0.0));
    }

    #[test]
    fn empty_prompt_lists_consumed_columns() {
        let commands = render_empty_prompt(400.0);
        let listed = commands.iter().any(|c| {
            matches!(c, RenderCommand::DrawText { text, .. }
                if text == "arrow, code, shelf, module, level")
        });
        assert!(listed);
    }
}
