use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;

use crate::app::{App, Mode, NotificationLevel, View};
use crate::input::Command;
use crate::models::{require_title, Category, GoalPatch, NewGoal, NewTask, TaskPatch};
use crate::ui::dialogs::{ConfirmAction, DialogType, InputPurpose, SelectPurpose};
use crate::ui::text_input::InputAction;

/// 目标进度每次调整的步长
const PROGRESS_STEP: i64 = 5;

/// 处理键盘输入
/// 返回 false 表示应该退出应用
pub fn handle_key_input(app: &mut App, key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return true;
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Dialog => handle_dialog_mode(app, key),
        Mode::Help => handle_help_mode(app, key),
    }
}

/// 按键到命令的映射
pub fn match_key(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char('?') => Some(Command::ShowHelp),

        KeyCode::Char('1') => Some(Command::SwitchView(View::Today)),
        KeyCode::Char('2') => Some(Command::SwitchView(View::Weekly)),
        KeyCode::Char('3') => Some(Command::SwitchView(View::Goals)),
        KeyCode::Char('4') => Some(Command::SwitchView(View::Tips)),
        KeyCode::Tab => Some(Command::NextView),

        KeyCode::Char('j') | KeyCode::Down => Some(Command::SelectDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Command::SelectUp),
        KeyCode::Left => Some(Command::DayLeft),
        KeyCode::Right => Some(Command::DayRight),
        KeyCode::Char('h') => Some(Command::PrevWeek),
        KeyCode::Char('l') => Some(Command::NextWeek),
        KeyCode::Char('t') => Some(Command::ThisWeek),

        KeyCode::Char(' ') | KeyCode::Char('x') => Some(Command::ToggleTask),
        KeyCode::Char('a') => Some(Command::NewTask),
        KeyCode::Char('g') => Some(Command::NewGoal),
        KeyCode::Char('e') => Some(Command::EditSelected),
        KeyCode::Char('d') => Some(Command::DeleteSelected),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::ProgressUp),
        KeyCode::Char('-') => Some(Command::ProgressDown),

        _ => None,
    }
}

/// 处理正常模式的按键
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> bool {
    let Some(cmd) = match_key(key) else {
        return true;
    };

    if cmd == Command::Quit {
        return false;
    }

    debug!("event=tui_command command={:?} view={}", cmd, app.view);
    execute_command(app, cmd);
    true
}

/// 执行命令
fn execute_command(app: &mut App, cmd: Command) {
    let in_task_view = matches!(app.view, View::Today | View::Weekly);

    match cmd {
        Command::Quit => {}
        Command::SwitchView(view) => app.switch_view(view),
        Command::NextView => app.switch_view(app.view.next()),
        Command::ShowHelp => app.mode = Mode::Help,

        Command::SelectUp => app.move_selection(-1),
        Command::SelectDown => app.move_selection(1),
        Command::DayLeft if app.view == View::Weekly => app.move_day(-1),
        Command::DayRight if app.view == View::Weekly => app.move_day(1),
        Command::PrevWeek if app.view == View::Weekly => app.shift_week(-1),
        Command::NextWeek if app.view == View::Weekly => app.shift_week(1),
        Command::ThisWeek if app.view == View::Weekly => app.reset_week(),
        Command::DayLeft | Command::DayRight => {}
        Command::PrevWeek | Command::NextWeek | Command::ThisWeek => {}

        Command::ToggleTask => {
            if let Some(id) = app.selected_task_id() {
                app.store.toggle_task_completion(&id);
                app.check_persist_error();
            }
        }
        Command::NewTask if app.view == View::Goals => start_new_goal(app),
        Command::NewTask => {
            let date = app.target_date();
            let prompt = format!("Title for a task on {}", date.format("%a %b %-d"));
            open_dialog(
                app,
                DialogType::input("New task", &prompt, "", InputPurpose::NewTaskTitle { date }),
            );
        }
        Command::NewGoal => start_new_goal(app),
        Command::EditSelected => {
            if in_task_view {
                if let Some(task) = app.selected_task() {
                    let dialog = DialogType::input(
                        "Edit task",
                        "New title",
                        &task.title,
                        InputPurpose::EditTaskTitle { id: task.id.clone() },
                    );
                    open_dialog(app, dialog);
                }
            } else if app.view == View::Goals {
                if let Some(goal) = app.store.goals().get(app.selection.goal) {
                    let dialog = DialogType::input(
                        "Edit goal",
                        "New title",
                        &goal.title,
                        InputPurpose::EditGoalTitle { id: goal.id.clone() },
                    );
                    open_dialog(app, dialog);
                }
            }
        }
        Command::DeleteSelected => {
            if in_task_view {
                if let Some(task) = app.selected_task() {
                    let dialog = DialogType::confirm(
                        "Delete task",
                        format!("Delete \"{}\"?", task.title),
                        ConfirmAction::DeleteTask { id: task.id.clone() },
                    );
                    open_dialog(app, dialog);
                }
            } else if app.view == View::Goals {
                if let Some(goal) = app.store.goals().get(app.selection.goal) {
                    let dialog = DialogType::confirm(
                        "Delete goal",
                        format!("Delete \"{}\"?", goal.title),
                        ConfirmAction::DeleteGoal { id: goal.id.clone() },
                    );
                    open_dialog(app, dialog);
                }
            }
        }
        Command::ProgressUp | Command::ProgressDown if app.view == View::Goals => {
            let delta = if cmd == Command::ProgressUp {
                PROGRESS_STEP
            } else {
                -PROGRESS_STEP
            };
            if let Some(id) = app.selected_goal_id() {
                app.store.adjust_goal_progress(&id, delta);
                app.check_persist_error();
            }
        }
        Command::ProgressUp | Command::ProgressDown => {}
    }
}

fn start_new_goal(app: &mut App) {
    open_dialog(
        app,
        DialogType::input(
            "New goal",
            "What do you want to achieve?",
            "",
            InputPurpose::NewGoalTitle,
        ),
    );
}

fn open_dialog(app: &mut App, dialog: DialogType) {
    app.dialog = Some(dialog);
    app.mode = Mode::Dialog;
}

enum DialogOutcome {
    Keep,
    Close,
    Submit,
}

/// 处理对话框模式的按键
fn handle_dialog_mode(app: &mut App, key: KeyEvent) -> bool {
    let Some(mut dialog) = app.dialog.take() else {
        app.mode = Mode::Normal;
        return true;
    };

    let outcome = match &mut dialog {
        DialogType::Input { input, .. } => match input.handle_key(key) {
            InputAction::Continue => DialogOutcome::Keep,
            InputAction::Submit => DialogOutcome::Submit,
            InputAction::Cancel => DialogOutcome::Close,
        },
        DialogType::Select {
            items, selected, ..
        } => match key.code {
            KeyCode::Esc => DialogOutcome::Close,
            KeyCode::Enter => DialogOutcome::Submit,
            KeyCode::Up | KeyCode::Char('k') => {
                *selected = selected.saturating_sub(1);
                DialogOutcome::Keep
            }
            KeyCode::Down | KeyCode::Char('j') => {
                *selected = (*selected + 1).min(items.len().saturating_sub(1));
                DialogOutcome::Keep
            }
            // 数字键直接选择
            KeyCode::Char(c) => match c.to_digit(10) {
                Some(n) if n >= 1 && (n as usize) <= items.len() => {
                    *selected = n as usize - 1;
                    DialogOutcome::Submit
                }
                _ => DialogOutcome::Keep,
            },
            _ => DialogOutcome::Keep,
        },
        DialogType::Confirm { yes_selected, .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                *yes_selected = true;
                DialogOutcome::Submit
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => DialogOutcome::Close,
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Tab
            | KeyCode::Char('h')
            | KeyCode::Char('l') => {
                *yes_selected = !*yes_selected;
                DialogOutcome::Keep
            }
            KeyCode::Enter if *yes_selected => DialogOutcome::Submit,
            KeyCode::Enter => DialogOutcome::Close,
            _ => DialogOutcome::Keep,
        },
    };

    match outcome {
        DialogOutcome::Keep => app.dialog = Some(dialog),
        DialogOutcome::Close => app.mode = Mode::Normal,
        DialogOutcome::Submit => {
            app.mode = Mode::Normal;
            handle_dialog_submit(app, dialog);
        }
    }
    true
}

/// 处理对话框提交
fn handle_dialog_submit(app: &mut App, dialog: DialogType) {
    match dialog {
        DialogType::Input { input, purpose, .. } => submit_input(app, purpose, input.value()),
        DialogType::Select {
            selected, purpose, ..
        } => match purpose {
            SelectPurpose::NewTaskCategory { title, date } => {
                let category = Category::ALL.get(selected).copied().unwrap_or_default();
                let input = NewTask {
                    category: Some(category),
                    priority: Some(app.config.default_priority),
                    date: Some(date),
                    ..NewTask::new(title)
                };
                match app.store.create_task(input) {
                    Ok(task) => {
                        focus_task(app, &task.id);
                        app.show_notification(
                            format!(
                                "Added \"{}\" with {} suggestions",
                                task.title,
                                task.ai_suggestions.len()
                            ),
                            NotificationLevel::Success,
                        );
                    }
                    Err(e) => app.show_notification(e.to_string(), NotificationLevel::Warning),
                }
            }
        },
        DialogType::Confirm { action, .. } => match action {
            ConfirmAction::DeleteTask { id } => {
                if app.store.delete_task(&id) {
                    app.show_notification("Task deleted".to_string(), NotificationLevel::Success);
                }
            }
            ConfirmAction::DeleteGoal { id } => {
                if app.store.delete_goal(&id) {
                    app.show_notification("Goal deleted".to_string(), NotificationLevel::Success);
                }
            }
        },
    }

    app.clamp_selection();
    app.check_persist_error();
}

fn submit_input(app: &mut App, purpose: InputPurpose, value: String) {
    match purpose {
        InputPurpose::NewTaskTitle { date } => match require_title("task", &value) {
            Ok(title) => {
                let default = app.config.default_category;
                open_dialog(app, DialogType::category_select(title, date, default));
            }
            Err(e) => app.show_notification(e.to_string(), NotificationLevel::Warning),
        },
        InputPurpose::EditTaskTitle { id } => {
            let patch = TaskPatch {
                title: Some(value),
                ..TaskPatch::default()
            };
            match app.store.update_task(&id, patch) {
                Ok(Some(_)) => {
                    app.show_notification("Task renamed".to_string(), NotificationLevel::Success)
                }
                Ok(None) => app.show_notification(
                    "Task no longer exists".to_string(),
                    NotificationLevel::Warning,
                ),
                Err(e) => app.show_notification(e.to_string(), NotificationLevel::Warning),
            }
        }
        InputPurpose::NewGoalTitle => match app.store.create_goal(NewGoal::new(value)) {
            Ok(goal) => {
                app.selection.goal = app.store.goals().len().saturating_sub(1);
                app.show_notification(
                    format!("Added goal \"{}\"", goal.title),
                    NotificationLevel::Success,
                );
            }
            Err(e) => app.show_notification(e.to_string(), NotificationLevel::Warning),
        },
        InputPurpose::EditGoalTitle { id } => {
            let patch = GoalPatch {
                title: Some(value),
                ..GoalPatch::default()
            };
            match app.store.update_goal(&id, patch) {
                Ok(Some(_)) => {
                    app.show_notification("Goal renamed".to_string(), NotificationLevel::Success)
                }
                Ok(None) => app.show_notification(
                    "Goal no longer exists".to_string(),
                    NotificationLevel::Warning,
                ),
                Err(e) => app.show_notification(e.to_string(), NotificationLevel::Warning),
            }
        }
    }
}

/// Put the cursor on `id` if it is in the current list.
fn focus_task(app: &mut App, id: &str) {
    let Some(pos) = app.visible_tasks().iter().position(|t| t.id == id) else {
        return;
    };
    match app.view {
        View::Weekly => app.selection.week_task = pos,
        _ => app.selection.today = pos,
    }
}

/// 处理帮助模式的按键
fn handle_help_mode(app: &mut App, key: KeyEvent) -> bool {
    if matches!(
        key.code,
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter
    ) {
        app.mode = Mode::Normal;
    }
    true
}
