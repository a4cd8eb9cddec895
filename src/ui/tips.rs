use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::suggestions::PRODUCTIVITY_TIPS;

/// Tips view: the six tips in a 2 x 3 grid
pub fn render(f: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    for (row_idx, row) in rows.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 2); 2])
            .split(*row);

        for (col_idx, cell) in cells.iter().enumerate() {
            let Some(tip) = PRODUCTIVITY_TIPS.get(row_idx * 2 + col_idx) else {
                continue;
            };

            let block = Block::default()
                .title(Line::from(vec![
                    Span::raw(format!(" {} ", tip.icon)),
                    Span::styled(
                        format!("{} ", tip.title),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                ]))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray));

            let body = Paragraph::new(tip.description)
                .block(block)
                .wrap(Wrap { trim: true });
            f.render_widget(body, *cell);
        }
    }
}
