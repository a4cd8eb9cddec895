use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    Frame,
};
use tui_textarea::{CursorMove, TextArea};

/// 输入动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// 继续编辑
    Continue,
    /// 提交内容
    Submit,
    /// 取消对话框
    Cancel,
}

/// Single-line text field used by the title dialogs
pub struct TextInput {
    textarea: TextArea<'static>,
}

impl TextInput {
    pub fn new(initial_value: &str) -> Self {
        let mut textarea = TextArea::from([initial_value.replace('\n', " ")]);
        textarea.move_cursor(CursorMove::End);

        // Nord 主题
        textarea.set_style(
            Style::default()
                .fg(Color::Rgb(236, 239, 244))
                .bg(Color::Rgb(46, 52, 64)),
        );
        textarea.set_cursor_style(
            Style::default()
                .bg(Color::Rgb(136, 192, 208))
                .fg(Color::Rgb(46, 52, 64)),
        );
        textarea.set_cursor_line_style(Style::default());

        Self { textarea }
    }

    /// 获取内容
    pub fn value(&self) -> String {
        self.textarea.lines().join(" ")
    }

    /// 处理按键事件
    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => InputAction::Cancel,
            KeyCode::Enter => InputAction::Submit,
            KeyCode::Char('u') if ctrl => {
                self.textarea.move_cursor(CursorMove::Head);
                self.textarea.delete_line_by_end();
                InputAction::Continue
            }
            KeyCode::Char('a') if ctrl => {
                self.textarea.move_cursor(CursorMove::Head);
                InputAction::Continue
            }
            KeyCode::Char('e') if ctrl => {
                self.textarea.move_cursor(CursorMove::End);
                InputAction::Continue
            }
            KeyCode::Char(c) => {
                self.textarea.insert_char(c);
                InputAction::Continue
            }
            KeyCode::Backspace => {
                self.textarea.delete_char();
                InputAction::Continue
            }
            KeyCode::Delete => {
                self.textarea.delete_next_char();
                InputAction::Continue
            }
            KeyCode::Left => {
                self.textarea.move_cursor(CursorMove::Back);
                InputAction::Continue
            }
            KeyCode::Right => {
                self.textarea.move_cursor(CursorMove::Forward);
                InputAction::Continue
            }
            KeyCode::Home => {
                self.textarea.move_cursor(CursorMove::Head);
                InputAction::Continue
            }
            KeyCode::End => {
                self.textarea.move_cursor(CursorMove::End);
                InputAction::Continue
            }
            _ => InputAction::Continue,
        }
    }

    /// 渲染文本区域
    pub fn render(&self, f: &mut Frame, area: Rect) {
        f.render_widget(&self.textarea, area);
    }
}
