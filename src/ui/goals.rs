use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::Goal;

/// 每个目标卡片的高度
const CARD_HEIGHT: u16 = 4;

/// Goals view: one gauge card per goal, scrolled to keep the selection visible
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let goals = app.store.goals();

    let outer = Block::default()
        .title(" Goals  (g add, +/- progress, e edit, d delete) ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    if goals.is_empty() {
        f.render_widget(
            Paragraph::new("No goals yet. Press g to add one.")
                .style(Style::default().fg(Color::Gray)),
            inner,
        );
        return;
    }

    let visible = (inner.height / CARD_HEIGHT).max(1) as usize;
    let first = app.selection.goal.saturating_sub(visible - 1);

    let constraints: Vec<Constraint> = (0..visible)
        .map(|_| Constraint::Length(CARD_HEIGHT))
        .collect();
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (slot, (idx, goal)) in slots.iter().zip(goals.iter().enumerate().skip(first)) {
        render_goal(f, *slot, goal, idx == app.selection.goal, app.today());
    }
}

fn render_goal(f: &mut Frame, area: Rect, goal: &Goal, selected: bool, today: chrono::NaiveDate) {
    let border_style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let target = match goal.target_date {
        Some(date) if date < today && !goal.is_complete() => format!("overdue since {}", date),
        Some(date) => format!("target {}", date),
        None => "no target date".to_string(),
    };

    let gauge_color = if goal.is_complete() {
        Color::Green
    } else {
        Color::Rgb(136, 192, 208)
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(format!(" {} ", goal.title))
                .title_bottom(format!(" {} ", target))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style),
        )
        .gauge_style(Style::default().fg(gauge_color).bg(Color::Rgb(59, 66, 82)))
        .percent(goal.progress as u16)
        .label(format!("{}%", goal.progress));

    f.render_widget(gauge, area);
}
