use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::{Category, Priority};

/// A schedulable, completable unit of work bound to one calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default)]
    pub completed: bool,
    pub date: NaiveDate,
    /// Epoch milliseconds
    #[serde(default)]
    pub created_at: i64,
    /// Frozen at creation, never recomputed on edit
    #[serde(default)]
    pub ai_suggestions: Vec<String>,
}

impl Task {
    pub fn new(id: String, title: String, date: NaiveDate, created_at: i64) -> Self {
        Self {
            id,
            title,
            description: String::new(),
            priority: Priority::default(),
            category: Category::default(),
            estimated_time: String::new(),
            completed: false,
            date,
            created_at,
            ai_suggestions: Vec::new(),
        }
    }
}

impl AsRef<Task> for Task {
    fn as_ref(&self) -> &Task {
        self
    }
}

/// Input for `EntityStore::create_task`
///
/// Only `title` is required; every other field falls back to the task default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub estimated_time: Option<String>,
    pub date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial field set merged over an existing task
///
/// `id`, `created_at` and `ai_suggestions` are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub estimated_time: Option<String>,
    pub date: Option<NaiveDate>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(estimated_time) = self.estimated_time {
            task.estimated_time = estimated_time;
        }
        if let Some(date) = self.date {
            task.date = date;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}
