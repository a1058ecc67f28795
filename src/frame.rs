use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::theme::to_ratatui;

/// Body on top, one status row at the bottom.
#[must_use]
pub fn split_main_area(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

pub fn render_border_block<'a>(title: impl Into<Line<'a>>, area: Rect, f: &mut Frame) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::new(2, 2, 1, 1));
    f.render_widget(block, area);
    Rect {
        x: area.x.saturating_add(1 + 2),
        y: area.y.saturating_add(1 + 1),
        width: area.width.saturating_sub(2 + 2 * 2),
        height: area.height.saturating_sub(2 + 2),
    }
}

/// Right-aligned, like the terminal's right status area.
pub fn render_status_bar(line: Line, area: Rect, f: &mut Frame) {
    let status_para = Paragraph::new(line).alignment(Alignment::Right);
    f.render_widget(Clear, area);
    f.render_widget(status_para, area);
}

#[must_use]
pub fn to_ratatui_line(line: &termrc_sdk::render::Line) -> Line<'static> {
    let spans: Vec<Span<'static>> = line
        .0
        .iter()
        .map(|s| match s.color {
            Some(c) => Span::styled(s.text.clone(), Style::default().fg(to_ratatui(c))),
            None => Span::raw(s.text.clone()),
        })
        .collect();
    Line::from(spans)
}
