use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::components::{category_color, priority_color, task_line};
use crate::app::App;
use crate::models::Task;

/// Today view: progress gauge, task list and the selected task's details
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let tasks = app.store.tasks_for_today();
    let done = tasks.iter().filter(|t| t.completed).count();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(format!(" {} ", app.today().format("%A, %B %-d")))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
        .percent(app.store.daily_progress() as u16)
        .label(format!(
            "{}/{} done ({}%)",
            done,
            tasks.len(),
            app.store.daily_progress()
        ));
    f.render_widget(gauge, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    render_task_list(f, columns[0], &tasks, app.selection.today);
    render_task_detail(f, columns[1], tasks.get(app.selection.today).copied());
}

fn render_task_list(f: &mut Frame, area: Rect, tasks: &[&Task], selected: usize) {
    let block = Block::default()
        .title(" Today's tasks ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    if tasks.is_empty() {
        let empty = Paragraph::new("Nothing planned for today. Press a to add a task.")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = tasks.iter().map(|t| ListItem::new(task_line(t))).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(59, 66, 82)).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

/// 选中任务的详情和建议
fn render_task_detail(f: &mut Frame, area: Rect, task: Option<&Task>) {
    let block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    let Some(task) = task else {
        f.render_widget(block, area);
        return;
    };

    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled(
            task.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Priority  ", label),
            Span::styled(
                task.priority.to_string(),
                Style::default().fg(priority_color(task.priority)),
            ),
        ]),
        Line::from(vec![
            Span::styled("Category  ", label),
            Span::styled(
                task.category.to_string(),
                Style::default().fg(category_color(task.category)),
            ),
        ]),
    ];
    if !task.estimated_time.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Estimate  ", label),
            Span::raw(task.estimated_time.clone()),
        ]));
    }
    if !task.description.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(task.description.clone()));
    }
    if !task.ai_suggestions.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Suggestions",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        for tip in &task.ai_suggestions {
            lines.push(Line::from(format!("• {}", tip)));
        }
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
