// 各视图共用的小部件

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::models::{Category, Priority, Task};

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Blue,
    }
}

pub fn category_color(category: Category) -> Color {
    match category {
        Category::Work => Color::Rgb(129, 161, 193),
        Category::Personal => Color::Rgb(180, 142, 173),
        Category::Health => Color::Rgb(163, 190, 140),
        Category::Learning => Color::Rgb(235, 203, 139),
        Category::Other => Color::Gray,
    }
}

/// One list row: checkbox, priority dot, title and category
pub fn task_line(task: &Task) -> Line<'static> {
    let (checkbox, title_style) = if task.completed {
        (
            Span::styled("[x] ", Style::default().fg(Color::Green)),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        (Span::raw("[ ] "), Style::default().fg(Color::White))
    };

    Line::from(vec![
        checkbox,
        Span::styled("● ", Style::default().fg(priority_color(task.priority))),
        Span::styled(task.title.clone(), title_style),
        Span::styled(
            format!("  {}", task.category),
            Style::default().fg(category_color(task.category)),
        ),
    ])
}

/// Compact row for the narrow weekly columns
pub fn task_cell(task: &Task) -> Line<'static> {
    let mark = if task.completed { "✓ " } else { "• " };
    let style = if task.completed {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(priority_color(task.priority))
    };
    Line::from(vec![
        Span::styled(mark, style),
        Span::raw(task.title.clone()),
    ])
}
