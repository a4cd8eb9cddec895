use crate::app::{App, Mode, NotificationLevel};
use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// 渲染状态栏：模式、时间、今日进度和通知
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mode_text = match app.mode {
        Mode::Normal => ("NORMAL", Color::Green),
        Mode::Dialog => ("DIALOG", Color::Magenta),
        Mode::Help => ("HELP", Color::Blue),
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", mode_text.0),
            Style::default()
                .fg(Color::Black)
                .bg(mode_text.1)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {} ", Local::now().format("%H:%M:%S"))),
        Span::styled(
            format!("| today {}% ", app.store.daily_progress()),
            Style::default().fg(Color::Gray),
        ),
    ];

    // 通知消息
    if let Some(notification) = &app.notification {
        let (color, prefix) = match notification.level {
            NotificationLevel::Info => (Color::Blue, "ℹ"),
            NotificationLevel::Success => (Color::Green, "✓"),
            NotificationLevel::Warning => (Color::Yellow, "⚠"),
            NotificationLevel::Error => (Color::Red, "✗"),
        };
        spans.push(Span::raw("| "));
        spans.push(Span::styled(
            format!("{} {}", prefix, notification.message),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled(
            "| ? for help",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));

    f.render_widget(paragraph, area);
}
