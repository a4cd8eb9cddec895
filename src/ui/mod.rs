mod components;
pub mod dialogs;
mod goals;
mod help;
mod statusbar;
pub mod text_input;
mod tips;
mod today;
mod weekly;

use crate::app::{App, Mode, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

/// 主渲染函数
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // 视图标签
            Constraint::Min(0),    // 主内容区域
            Constraint::Length(1), // 状态栏
        ])
        .split(f.area());

    render_tabs(f, chunks[0], app.view);

    match app.view {
        View::Today => today::render(f, chunks[1], app),
        View::Weekly => weekly::render(f, chunks[1], app),
        View::Goals => goals::render(f, chunks[1], app),
        View::Tips => tips::render(f, chunks[1]),
    }

    statusbar::render(f, chunks[2], app);

    // 渲染对话框（如果有）
    if let Some(dialog) = &app.dialog {
        dialogs::render_dialog(f, dialog);
    }

    // 渲染帮助面板（如果处于帮助模式）
    if app.mode == Mode::Help {
        help::render(f, f.area());
    }
}

fn render_tabs(f: &mut Frame, area: Rect, current: View) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, v)| Line::from(format!(" {} {} ", i + 1, v.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM).title(" SmartTimeTable "))
        .select(current.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .divider("│");

    f.render_widget(tabs, area);
}
