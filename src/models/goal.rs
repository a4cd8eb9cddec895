use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

pub const MAX_PROGRESS: u8 = 100;

/// A longer-horizon objective tracked by a manually set percentage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Always within 0..=100
    #[serde(default, deserialize_with = "deserialize_progress")]
    pub progress: u8,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: i64,
    /// Ids of tasks that contribute to this goal
    #[serde(default)]
    pub related_tasks: Vec<String>,
}

impl Goal {
    pub fn new(id: String, title: String, created_at: i64) -> Self {
        Self {
            id,
            title,
            description: String::new(),
            progress: 0,
            target_date: None,
            created_at,
            related_tasks: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= MAX_PROGRESS
    }
}

/// Input for `EntityStore::create_goal`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGoal {
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<NaiveDate>,
    /// Clamped into 0..=100; defaults to 0
    pub progress: Option<i64>,
    pub related_tasks: Vec<String>,
}

impl NewGoal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial field set merged over an existing goal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the target date
    pub target_date: Option<Option<NaiveDate>>,
    pub progress: Option<i64>,
    pub related_tasks: Option<Vec<String>>,
}

impl GoalPatch {
    pub fn is_empty(&self) -> bool {
        *self == GoalPatch::default()
    }

    pub(crate) fn apply(self, goal: &mut Goal) {
        if let Some(title) = self.title {
            goal.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            goal.description = description;
        }
        if let Some(target_date) = self.target_date {
            goal.target_date = target_date;
        }
        if let Some(progress) = self.progress {
            goal.progress = clamp_progress(progress);
        }
        if let Some(related_tasks) = self.related_tasks {
            goal.related_tasks = related_tasks;
        }
    }
}

/// Clamp an arbitrary percentage into 0..=100
pub fn clamp_progress(value: i64) -> u8 {
    value.clamp(0, MAX_PROGRESS as i64) as u8
}

fn deserialize_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.is_nan() {
        return Ok(0);
    }
    Ok(clamp_progress(raw.round() as i64))
}

// 旧数据中未设置的目标日期存为空字符串
fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
