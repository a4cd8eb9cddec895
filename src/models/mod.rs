pub mod category;
pub mod goal;
pub mod task;

pub use category::{Category, Priority};
pub use goal::{clamp_progress, Goal, GoalPatch, NewGoal};
pub use task::{NewTask, Task, TaskPatch};

use thiserror::Error;

/// Rejected input on create/update
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{entity} title must not be empty")]
    EmptyTitle { entity: &'static str },
}

/// Trimmed title, or `EmptyTitle` when nothing is left
pub(crate) fn require_title(entity: &'static str, title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle { entity });
    }
    Ok(trimmed.to_string())
}
