use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::components::task_cell;
use crate::app::App;
use crate::projection::{DaySlot, DAYS_PER_WEEK};

/// Weekly view: seven day columns, Sunday first
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let grid = app.store.week_grid(app.week_anchor);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    if let (Some(first), Some(last)) = (grid.first(), grid.last()) {
        let title = format!(
            " Week of {} to {}   (h/l week, ←/→ day, t this week)",
            first.date.format("%b %-d"),
            last.date.format("%b %-d, %Y")
        );
        f.render_widget(
            Paragraph::new(title).style(Style::default().fg(Color::Cyan)),
            rows[0],
        );
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, DAYS_PER_WEEK as u32); DAYS_PER_WEEK])
        .split(rows[1]);

    for (idx, slot) in grid.iter().enumerate() {
        let focused = idx == app.selection.week_day;
        render_day(f, columns[idx], slot, focused, app.selection.week_task);
    }
}

fn render_day(f: &mut Frame, area: Rect, slot: &DaySlot<'_>, focused: bool, selected: usize) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else if slot.is_today {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut title = slot.date.format(" %a %-d ").to_string();
    if slot.is_today {
        title.push_str("• today ");
    }

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);

    let items: Vec<ListItem> = slot.tasks.iter().map(|t| ListItem::new(task_cell(t))).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(59, 66, 82)).add_modifier(Modifier::BOLD));

    let mut state = ListState::default();
    // 只有聚焦的列显示选中项
    if focused && !slot.tasks.is_empty() {
        state.select(Some(selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}
