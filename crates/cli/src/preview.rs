//! Terminal label browser.

use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use shelfmark_core::model::CodeKind;
use shelfmark_core::symbology;
use shelfmark_core::views::{self, symbol_lines};
use shelfmark_core::{FrameSurface, Studio};
use shelfmark_protocol::{RenderCommand, ThemeToken};

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Ink => Color::Black,
        ThemeToken::Paper => Color::White,
        ThemeToken::CardBackground => Color::Reset,
        ThemeToken::CardBorder => Color::DarkGray,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextSecondary => Color::Gray,
        ThemeToken::TextMuted => Color::DarkGray,
        ThemeToken::TextError => Color::LightRed,
        ThemeToken::Background => Color::Reset,
    }
}

/// Text a label card prints above and below its code surface.
fn card_text(commands: &[RenderCommand]) -> (Vec<(String, ThemeToken)>, Vec<(String, ThemeToken)>) {
    let mut above = Vec::new();
    let mut below = Vec::new();
    let mut depth = 0usize;
    let mut surface_depth = None;
    let mut past_surface = false;

    for cmd in commands {
        match cmd {
            RenderCommand::BeginGroup { id, .. } => {
                depth += 1;
                if id.starts_with("surface-") {
                    surface_depth = Some(depth);
                }
            }
            RenderCommand::EndGroup => {
                if surface_depth == Some(depth) {
                    surface_depth = None;
                    past_surface = true;
                }
                depth = depth.saturating_sub(1);
            }
            RenderCommand::DrawText { text, color, .. } if surface_depth.is_none() => {
                let line = (text.clone(), *color);
                if past_surface {
                    below.push(line);
                } else {
                    above.push(line);
                }
            }
            _ => {}
        }
    }
    (above, below)
}

struct Browser {
    studio: Studio<FrameSurface>,
    list: ListState,
    title: String,
}

impl Browser {
    fn selected(&self) -> usize {
        self.list.selected().unwrap_or(0)
    }

    fn select_kind(&mut self, kind: CodeKind) {
        if kind != self.studio.kind() {
            self.studio.select_kind(kind);
        }
    }

    fn step(&mut self, delta: isize) {
        let len = self.studio.records().len();
        if len == 0 {
            return;
        }
        let next = self.selected().saturating_add_signed(delta).min(len - 1);
        self.list.select(Some(next));
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [header, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
        let [left, right] =
            Layout::horizontal([Constraint::Length(28), Constraint::Min(0)]).areas(body);

        let header_text = format!(
            " shelfmark | {} | {} labels | {} | ↑↓ select  tab/b/r kind  q quit ",
            self.title,
            self.studio.records().len(),
            self.studio.kind().title(),
        );
        frame.render_widget(
            Paragraph::new(header_text).style(Style::default().fg(Color::White).bg(Color::DarkGray)),
            header,
        );

        let items: Vec<ListItem> = self
            .studio
            .records()
            .iter()
            .map(|record| ListItem::new(format!("{:>4} {}", record.row, record.code)))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::RIGHT))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, left, &mut self.list);

        self.draw_label(frame, right);
    }

    fn draw_label(&self, frame: &mut Frame, area: Rect) {
        let index = self.selected();
        let Some(record) = self.studio.records().get(index) else {
            return;
        };
        let style = self.studio.style();
        let card = views::render_label(
            index,
            record,
            &shelfmark_core::studio::frame_for(record, self.studio.kind(), style),
            style,
        );
        let (above, below) = card_text(&card.commands);
        let styled = |(text, token): (String, ThemeToken)| {
            Line::from(Span::styled(text, Style::default().fg(theme_to_color(token))))
        };

        let mut lines: Vec<Line> = above.into_iter().map(styled).collect();
        lines.push(Line::default());
        match symbology::encode(&record.code, self.studio.kind()) {
            Ok(symbol) => {
                let ink = Style::default()
                    .fg(theme_to_color(ThemeToken::Ink))
                    .bg(theme_to_color(ThemeToken::Paper));
                lines.extend(
                    symbol_lines(&symbol)
                        .into_iter()
                        .map(|row| Line::from(Span::styled(format!("  {row}  "), ink))),
                );
            }
            Err(e) => lines.push(styled((
                format!("cannot encode '{}': {e}", record.code),
                ThemeToken::TextError,
            ))),
        }
        lines.push(Line::default());
        lines.extend(below.into_iter().map(styled));

        let block = Block::default()
            .borders(Borders::NONE)
            .title(format!(" row {} ", record.row));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

pub fn run(studio: Studio<FrameSurface>, title: &str) -> Result<()> {
    let mut browser = Browser {
        studio,
        list: ListState::default().with_selected(Some(0)),
        title: title.to_string(),
    };

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut browser);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    browser: &mut Browser,
) -> Result<()> {
    loop {
        terminal.draw(|frame| browser.draw(frame))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Up | KeyCode::Char('k') => browser.step(-1),
                KeyCode::Down | KeyCode::Char('j') => browser.step(1),
                KeyCode::Tab => browser.select_kind(browser.studio.kind().toggled()),
                KeyCode::Char('b') => browser.select_kind(CodeKind::Barcode),
                KeyCode::Char('r') => browser.select_kind(CodeKind::QrCode),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfmark_core::model::Record;
    use shelfmark_core::{Ingested, LabelStyle};

    fn browser(codes: &[&str]) -> Browser {
        let mut studio = Studio::default();
        let ticket = studio.begin_load();
        studio.apply_load(
            ticket,
            Ingested {
                sheet_name: "Sheet1".into(),
                records: codes.iter().map(|c| Record::new(*c)).collect(),
                issues: Vec::new(),
            },
            None,
        );
        Browser {
            studio,
            list: ListState::default().with_selected(Some(0)),
            title: "test".into(),
        }
    }

    #[test]
    fn card_text_splits_around_the_surface() {
        let record = Record {
            arrow: "→".into(),
            shelf: "E-01".into(),
            level: "3".into(),
            ..Record::new("ABC123")
        };
        let style = LabelStyle::default();
        let frame = shelfmark_core::studio::frame_for(&record, CodeKind::Barcode, &style);
        let card = views::render_label(0, &record, &frame, &style);

        let (above, below) = card_text(&card.commands);
        let above: Vec<_> = above.into_iter().map(|(t, _)| t).collect();
        let below: Vec<_> = below.into_iter().map(|(t, _)| t).collect();
        assert_eq!(above, vec!["→"]);
        // The human-readable code under the bars belongs to the surface.
        assert_eq!(below, vec!["E-01", "3"]);
    }

    #[test]
    fn selection_stays_in_range() {
        let mut browser = browser(&["A", "B"]);
        browser.step(-1);
        assert_eq!(browser.selected(), 0);
        browser.step(5);
        assert_eq!(browser.selected(), 1);
    }

    #[test]
    fn kind_keys_switch_the_studio() {
        let mut browser = browser(&["A"]);
        browser.select_kind(browser.studio.kind().toggled());
        assert_eq!(browser.studio.kind(), CodeKind::QrCode);
        browser.select_kind(CodeKind::Barcode);
        assert_eq!(browser.studio.kind(), CodeKind::Barcode);
    }
}
