use chrono::{Datelike, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::clock::Clock;
use crate::config::Config;
use crate::models::Task;
use crate::projection::{self, DAYS_PER_WEEK};
use crate::storage::KeyValueStore;
use crate::store::{EntityStore, LoadSource};
use crate::ui::dialogs::DialogType;

/// 通知显示时长（秒）
const NOTIFICATION_SECS: u64 = 3;

/// Store type the interactive app runs on
pub type AppStore = EntityStore<Box<dyn KeyValueStore>, Box<dyn Clock>>;

/// 顶层视图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Today,
    Weekly,
    Goals,
    Tips,
}

impl View {
    pub const ALL: [View; 4] = [View::Today, View::Weekly, View::Goals, View::Tips];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Today => "today",
            View::Weekly => "weekly",
            View::Goals => "goals",
            View::Tips => "tips",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Today => "Today",
            View::Weekly => "Weekly",
            View::Goals => "Goals",
            View::Tips => "Tips",
        }
    }

    pub fn index(&self) -> usize {
        View::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn next(&self) -> View {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown view '{}' (expected today, weekly, goals or tips)", s))
    }
}

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// 通知消息
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
}

impl Notification {
    /// Errors stay until replaced; everything else fades after a few seconds.
    pub fn is_expired(&self) -> bool {
        self.level != NotificationLevel::Error
            && self.created_at.elapsed().as_secs() >= NOTIFICATION_SECS
    }
}

/// 应用模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 正常模式 - 导航和查看
    Normal,
    /// 对话框模式
    Dialog,
    /// 帮助模式 - 显示快捷键
    Help,
}

/// 各视图的选中位置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub today: usize,
    pub goal: usize,
    /// 0 = Sunday
    pub week_day: usize,
    pub week_task: usize,
}

/// 应用状态
pub struct App {
    pub store: AppStore,
    pub config: Config,
    pub view: View,
    pub mode: Mode,
    pub selection: Selection,
    /// Any date inside the week the Weekly view shows
    pub week_anchor: NaiveDate,
    /// 当前显示的对话框
    pub dialog: Option<DialogType>,
    pub notification: Option<Notification>,
}

impl App {
    pub fn new(store: AppStore, config: Config, loaded: LoadSource) -> Self {
        let today = store.today();
        let mut app = Self {
            view: config.default_view,
            config,
            mode: Mode::Normal,
            selection: Selection {
                week_day: today.weekday().num_days_from_sunday() as usize,
                ..Selection::default()
            },
            week_anchor: today,
            dialog: None,
            notification: None,
            store,
        };

        match loaded {
            LoadSource::Stored => {}
            LoadSource::SeededUnreadable => {
                app.show_notification(loaded.describe().to_string(), NotificationLevel::Error)
            }
            _ => app.show_notification(loaded.describe().to_string(), NotificationLevel::Info),
        }
        app.check_persist_error();

        app
    }

    /// 处理键盘输入
    /// 返回 false 表示应该退出应用
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        crate::input::handle_key_input(self, key)
    }

    pub fn today(&self) -> NaiveDate {
        self.store.today()
    }

    /// Tasks in the list the cursor is currently on
    pub fn visible_tasks(&self) -> Vec<&Task> {
        match self.view {
            View::Today => self.store.tasks_for_today(),
            View::Weekly => self.store.tasks_by_date(self.selected_day()),
            View::Goals | View::Tips => Vec::new(),
        }
    }

    /// Date of the highlighted column in the Weekly view
    pub fn selected_day(&self) -> NaiveDate {
        let week = projection::week_dates(self.week_anchor);
        week[self.selection.week_day.min(DAYS_PER_WEEK - 1)]
    }

    /// Date new tasks get: today, or the highlighted day in the Weekly view
    pub fn target_date(&self) -> NaiveDate {
        match self.view {
            View::Weekly => self.selected_day(),
            _ => self.today(),
        }
    }

    fn task_cursor(&self) -> usize {
        match self.view {
            View::Weekly => self.selection.week_task,
            _ => self.selection.today,
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.task_cursor()).copied()
    }

    pub fn selected_task_id(&self) -> Option<String> {
        self.selected_task().map(|t| t.id.clone())
    }

    pub fn selected_goal_id(&self) -> Option<String> {
        self.store
            .goals()
            .get(self.selection.goal)
            .map(|g| g.id.clone())
    }

    /// Move the cursor of the current list by `delta`, staying in range.
    pub fn move_selection(&mut self, delta: isize) {
        let len = match self.view {
            View::Today | View::Weekly => self.visible_tasks().len(),
            View::Goals => self.store.goals().len(),
            View::Tips => 0,
        };
        let cursor = match self.view {
            View::Today => &mut self.selection.today,
            View::Weekly => &mut self.selection.week_task,
            View::Goals => &mut self.selection.goal,
            View::Tips => return,
        };
        *cursor = step(*cursor, delta, len);
    }

    /// Move the highlighted day, rolling into the neighbouring week at the edges.
    pub fn move_day(&mut self, delta: isize) {
        let day = self.selection.week_day as isize + delta;
        if day < 0 {
            self.shift_week(-1);
            self.selection.week_day = DAYS_PER_WEEK - 1;
        } else if day as usize >= DAYS_PER_WEEK {
            self.shift_week(1);
            self.selection.week_day = 0;
        } else {
            self.selection.week_day = day as usize;
        }
        self.selection.week_task = 0;
    }

    pub fn shift_week(&mut self, weeks: i64) {
        self.week_anchor = projection::shift_week(self.week_anchor, weeks);
        self.selection.week_task = 0;
    }

    /// Back to the current week with today highlighted
    pub fn reset_week(&mut self) {
        let today = self.today();
        self.week_anchor = today;
        self.selection.week_day = today.weekday().num_days_from_sunday() as usize;
        self.selection.week_task = 0;
    }

    pub fn switch_view(&mut self, view: View) {
        self.view = view;
        self.clamp_selection();
    }

    /// Keep every cursor inside its list after items were removed.
    pub fn clamp_selection(&mut self) {
        let today_len = self.store.tasks_for_today().len();
        let week_len = self.store.tasks_by_date(self.selected_day()).len();
        let goal_len = self.store.goals().len();

        self.selection.today = self.selection.today.min(today_len.saturating_sub(1));
        self.selection.week_task = self.selection.week_task.min(week_len.saturating_sub(1));
        self.selection.goal = self.selection.goal.min(goal_len.saturating_sub(1));
    }

    /// Surface a failed write from the last store mutation.
    pub fn check_persist_error(&mut self) {
        if let Some(err) = self.store.take_persist_error() {
            warn!("event=tui_persist_failed error={}", err);
            self.show_notification(format!("Could not save: {}", err), NotificationLevel::Error);
        }
    }

    /// 显示通知消息
    pub fn show_notification(&mut self, message: String, level: NotificationLevel) {
        self.notification = Some(Notification {
            message,
            level,
            created_at: Instant::now(),
        });
    }

    /// 清除已过期的通知
    pub fn clear_expired_notification(&mut self) {
        if self.notification.as_ref().is_some_and(|n| n.is_expired()) {
            self.notification = None;
        }
    }
}

fn step(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    cursor.saturating_add_signed(delta).min(len - 1)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStore;

    /// Seeded app frozen on Wednesday 2025-09-10
    pub(crate) fn test_app() -> App {
        let storage: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        let clock: Box<dyn Clock> = Box::new(FixedClock::on("2025-09-10"));
        let (store, loaded) = EntityStore::open(storage, clock);
        App::new(store, Config::default(), loaded)
    }

    #[test]
    fn test_view_cycle_and_parse() {
        assert_eq!(View::Today.next(), View::Weekly);
        assert_eq!(View::Tips.next(), View::Today);
        assert_eq!("Goals".parse::<View>(), Ok(View::Goals));
        assert!("calendar".parse::<View>().is_err());
    }

    #[test]
    fn test_new_app_starts_on_configured_view_and_today() {
        let app = test_app();
        assert_eq!(app.view, View::Today);
        assert_eq!(app.selection.week_day, 3);
        assert_eq!(app.selected_day(), app.today());
        // 首次加载示例数据会提示
        assert_eq!(
            app.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Info)
        );
    }

    #[test]
    fn test_move_selection_stays_in_range() {
        let mut app = test_app();
        assert_eq!(app.visible_tasks().len(), 2);

        app.move_selection(5);
        assert_eq!(app.selection.today, 1);
        app.move_selection(-5);
        assert_eq!(app.selection.today, 0);
    }

    #[test]
    fn test_move_day_rolls_over_week() {
        let mut app = test_app();
        app.switch_view(View::Weekly);

        app.move_day(1);
        assert_eq!(app.selected_day().to_string(), "2025-09-11");
        assert_eq!(app.visible_tasks().len(), 1);

        for _ in 0..3 {
            app.move_day(1);
        }
        assert_eq!(app.selected_day().to_string(), "2025-09-14");

        app.reset_week();
        assert_eq!(app.selected_day(), app.today());
    }

    #[test]
    fn test_target_date_follows_weekly_cursor() {
        let mut app = test_app();
        assert_eq!(app.target_date(), app.today());

        app.switch_view(View::Weekly);
        app.shift_week(1);
        assert_eq!(app.target_date().to_string(), "2025-09-17");
    }

    #[test]
    fn test_step() {
        assert_eq!(step(0, -1, 3), 0);
        assert_eq!(step(2, 1, 3), 2);
        assert_eq!(step(1, 1, 0), 0);
    }
}
