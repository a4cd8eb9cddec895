use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::text_input::TextInput;
use crate::models::Category;

/// 输入对话框的用途
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPurpose {
    NewTaskTitle { date: NaiveDate },
    EditTaskTitle { id: String },
    NewGoalTitle,
    EditGoalTitle { id: String },
}

/// 选择对话框的用途
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectPurpose {
    NewTaskCategory { title: String, date: NaiveDate },
}

/// 确认操作类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask { id: String },
    DeleteGoal { id: String },
}

/// 对话框类型
pub enum DialogType {
    /// 输入对话框（用于创建任务、目标等）
    Input {
        title: String,
        prompt: String,
        input: TextInput,
        purpose: InputPurpose,
    },
    /// 选择对话框
    Select {
        title: String,
        items: Vec<String>,
        selected: usize,
        purpose: SelectPurpose,
    },
    /// 确认对话框
    Confirm {
        title: String,
        message: String,
        yes_selected: bool,
        action: ConfirmAction,
    },
}

impl DialogType {
    pub fn input(title: &str, prompt: &str, initial: &str, purpose: InputPurpose) -> Self {
        DialogType::Input {
            title: title.to_string(),
            prompt: prompt.to_string(),
            input: TextInput::new(initial),
            purpose,
        }
    }

    /// Category picker for a task being created, preselecting `default`
    pub fn category_select(title: String, date: NaiveDate, default: Category) -> Self {
        DialogType::Select {
            title: "Category".to_string(),
            items: Category::ALL.iter().map(|c| c.to_string()).collect(),
            selected: Category::ALL.iter().position(|c| *c == default).unwrap_or(0),
            purpose: SelectPurpose::NewTaskCategory { title, date },
        }
    }

    pub fn confirm(title: &str, message: String, action: ConfirmAction) -> Self {
        DialogType::Confirm {
            title: title.to_string(),
            message,
            yes_selected: false,
            action,
        }
    }
}

/// 渲染居中的对话框
pub fn render_dialog(f: &mut Frame, dialog: &DialogType) {
    let area = match dialog {
        DialogType::Input { .. } => centered_fixed(60, 8, f.area()),
        DialogType::Select { items, .. } => centered_fixed(40, items.len() as u16 + 5, f.area()),
        DialogType::Confirm { .. } => centered_fixed(50, 9, f.area()),
    };

    // 清空对话框区域
    f.render_widget(Clear, area);

    match dialog {
        DialogType::Input {
            title,
            prompt,
            input,
            ..
        } => render_input_dialog(f, area, title, prompt, input),
        DialogType::Select {
            title,
            items,
            selected,
            ..
        } => render_select_dialog(f, area, title, items, *selected),
        DialogType::Confirm {
            title,
            message,
            yes_selected,
            ..
        } => render_confirm_dialog(f, area, title, message, *yes_selected),
    }
}

fn dialog_block(title: &str, border: Color) -> Block<'static> {
    Block::default()
        .title(format!("  {}  ", title))
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(Color::Rgb(46, 52, 64))) // Nord background
}

/// 渲染输入对话框
fn render_input_dialog(f: &mut Frame, area: Rect, title: &str, prompt: &str, input: &TextInput) {
    let block = dialog_block(title, Color::Rgb(76, 86, 106));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // 提示文本
            Constraint::Length(3), // 输入框
            Constraint::Length(1), // 帮助
        ])
        .split(inner);

    let prompt_text = Paragraph::new(prompt).style(Style::default().fg(Color::Rgb(129, 161, 193)));
    f.render_widget(prompt_text, chunks[0]);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(136, 192, 208)))
        .border_type(BorderType::Rounded);
    let input_inner = input_block.inner(chunks[1]);
    f.render_widget(input_block, chunks[1]);
    input.render(f, input_inner);

    let help = Paragraph::new("Enter confirm  Esc cancel")
        .style(Style::default().fg(Color::Rgb(129, 161, 193)))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);
}

/// 渲染选择对话框
fn render_select_dialog(f: &mut Frame, area: Rect, title: &str, items: &[String], selected: usize) {
    let block = dialog_block(title, Color::Rgb(76, 86, 106));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // 列表
            Constraint::Length(1), // 帮助
        ])
        .split(inner);

    let list_items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {} ", idx + 1),
                    Style::default().fg(Color::Rgb(129, 161, 193)),
                ),
                Span::raw(" "),
                Span::raw(item.as_str()),
            ]))
        })
        .collect();

    let list = List::new(list_items).highlight_style(
        Style::default()
            .bg(Color::Rgb(59, 66, 82)) // Nord 深蓝背景
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let mut list_state = ListState::default();
    list_state.select(Some(selected));
    f.render_stateful_widget(list, chunks[0], &mut list_state);

    let help = Paragraph::new("↑↓ move  1-5 pick  Enter confirm  Esc cancel")
        .style(Style::default().fg(Color::Rgb(129, 161, 193)))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[1]);
}

/// 渲染确认对话框
fn render_confirm_dialog(
    f: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    yes_selected: bool,
) {
    let block = dialog_block(title, Color::Rgb(235, 203, 139)); // Nord yellow for warnings
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // 消息
            Constraint::Length(1), // 按钮
        ])
        .split(inner);

    let message_text = Paragraph::new(message)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Rgb(216, 222, 233)));
    f.render_widget(message_text, chunks[0]);

    let button_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(chunks[1]);

    // 否按钮 (n) - 放在左侧
    let no_style = if !yes_selected {
        Style::default()
            .bg(Color::Rgb(191, 97, 106))
            .fg(Color::Rgb(46, 52, 64))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Rgb(191, 97, 106))
            .add_modifier(Modifier::DIM)
    };
    f.render_widget(
        Paragraph::new("[ n ] No").style(no_style).alignment(Alignment::Center),
        button_chunks[1],
    );

    let yes_style = if yes_selected {
        Style::default()
            .bg(Color::Rgb(163, 190, 140))
            .fg(Color::Rgb(46, 52, 64))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Rgb(163, 190, 140))
            .add_modifier(Modifier::DIM)
    };
    f.render_widget(
        Paragraph::new("[ y ] Yes").style(yes_style).alignment(Alignment::Center),
        button_chunks[2],
    );
}

/// 创建一个固定大小、居中的矩形区域（超出时收缩）
pub fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
