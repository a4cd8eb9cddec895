//! Read-only views derived from the task list.
//!
//! Everything here is a pure function of its arguments; "today" is always
//! passed in so callers read the clock once per render.

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::Task;

pub const DAYS_PER_WEEK: usize = 7;

/// Tasks scheduled on `today`, in collection order
pub fn tasks_for_today(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    tasks_by_date(tasks, today)
}

/// Tasks scheduled exactly on `date`, in collection order
pub fn tasks_by_date(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| t.date == date).collect()
}

/// Completed share of `tasks` as a whole percentage, rounded half up
///
/// 0 for an empty list.
pub fn daily_progress<T: AsRef<Task>>(tasks: &[T]) -> u8 {
    let total = tasks.len() as u64;
    if total == 0 {
        return 0;
    }
    let completed = tasks.iter().filter(|t| t.as_ref().completed).count() as u64;
    // round(100c/t) == floor((200c + t) / 2t)
    ((200 * completed + total) / (2 * total)) as u8
}

/// The Sunday-to-Saturday week containing `anchor`
pub fn week_dates(anchor: NaiveDate) -> [NaiveDate; DAYS_PER_WEEK] {
    let start = week_start(anchor);
    std::array::from_fn(|i| start + Duration::days(i as i64))
}

/// Sunday on or before `anchor`
pub fn week_start(anchor: NaiveDate) -> NaiveDate {
    anchor - Duration::days(anchor.weekday().num_days_from_sunday() as i64)
}

/// Move `anchor` by whole weeks; saturates at the calendar limits.
pub fn shift_week(anchor: NaiveDate, weeks: i64) -> NaiveDate {
    Duration::try_weeks(weeks)
        .and_then(|delta| anchor.checked_add_signed(delta))
        .unwrap_or(anchor)
}

pub fn is_today(date: NaiveDate, today: NaiveDate) -> bool {
    date == today
}

/// One column of the weekly grid
#[derive(Debug, Clone, PartialEq)]
pub struct DaySlot<'a> {
    pub date: NaiveDate,
    pub is_today: bool,
    pub tasks: Vec<&'a Task>,
}

/// The weekly grid for the week containing `anchor`
pub fn week_grid(tasks: &[Task], anchor: NaiveDate, today: NaiveDate) -> Vec<DaySlot<'_>> {
    week_dates(anchor)
        .into_iter()
        .map(|date| DaySlot {
            date,
            is_today: is_today(date, today),
            tasks: tasks_by_date(tasks, date),
        })
        .collect()
}
