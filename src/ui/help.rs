use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::dialogs::centered_fixed;

type Section = (&'static str, &'static [(&'static str, &'static str)]);

const LEFT: [Section; 2] = [
    (
        "Views",
        &[
            ("1 2 3 4", "Today / Weekly / Goals / Tips"),
            ("Tab", "next view"),
            ("?", "this help"),
            ("q", "quit"),
        ],
    ),
    (
        "Navigation",
        &[
            ("j, ↓", "next item"),
            ("k, ↑", "previous item"),
            ("←, →", "previous / next day (Weekly)"),
            ("h, l", "previous / next week (Weekly)"),
            ("t", "back to this week"),
        ],
    ),
];

const RIGHT: [Section; 3] = [
    (
        "Tasks",
        &[
            ("a", "add task (title, then category)"),
            ("space", "toggle done"),
            ("e", "edit title"),
            ("d", "delete (asks first)"),
        ],
    ),
    (
        "Goals",
        &[
            ("g", "add goal"),
            ("+ / -", "progress up / down by 5"),
            ("e, d", "edit title, delete"),
        ],
    ),
    (
        "Dialogs",
        &[
            ("Enter", "confirm"),
            ("Esc", "cancel"),
            ("1-5", "pick a category directly"),
            ("y / n", "answer a confirmation"),
        ],
    ),
];

fn section_lines(sections: &[Section]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (heading, entries) in sections {
        lines.push(Line::from(Span::styled(
            *heading,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        for (keys, what) in entries.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<10}", keys), Style::default().fg(Color::Cyan)),
                Span::raw(*what),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines
}

/// 渲染帮助面板
pub fn render(f: &mut Frame, area: Rect) {
    let popup_area = centered_fixed(90, 24, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keyboard shortcuts (Esc or ? to close) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    // 分成两列
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let left = Paragraph::new(section_lines(&LEFT))
        .block(Block::default().borders(Borders::RIGHT))
        .wrap(Wrap { trim: false });
    let right = Paragraph::new(section_lines(&RIGHT)).wrap(Wrap { trim: false });

    f.render_widget(left, columns[0]);
    f.render_widget(right, columns[1]);
}
