//! Canned per-category advice and the fixed productivity tips.
//!
//! Nothing here adapts: the same category always yields the same list.

use crate::models::Category;

/// Number of suggestions frozen onto a new task
pub const SUGGESTIONS_PER_TASK: usize = 4;
/// Entries taken from the task's own category
const PRIMARY_TAKE: usize = 3;
/// Entries taken from the general (`Other`) list
const GENERAL_TAKE: usize = 2;

const WORK: &[&str] = &[
    "Time-block your calendar to focus on deep work",
    "Use the Eisenhower Matrix to prioritize urgent vs important tasks",
    "Batch similar tasks together to minimize context switching",
    "Set specific deadlines even for non-urgent tasks",
    "Take regular breaks every 50-90 minutes to maintain focus",
];

const PERSONAL: &[&str] = &[
    "Link the task to an existing habit (habit stacking)",
    "Use implementation intentions: 'When X happens, I will do Y'",
    "Set up environmental cues to remind you of the task",
    "Start with the smallest possible version of the task",
    "Reward yourself after completing the task",
];

const HEALTH: &[&str] = &[
    "Schedule health tasks at the same time each day",
    "Track your progress to stay motivated",
    "Start small and gradually increase intensity",
    "Find an accountability partner or join a group",
    "Prepare everything you need the day before",
];

const LEARNING: &[&str] = &[
    "Use the Feynman Technique: explain concepts in simple terms",
    "Practice active recall instead of passive re-reading",
    "Space out your learning sessions over multiple days",
    "Connect new information to what you already know",
    "Test yourself regularly with quizzes or practice problems",
];

const OTHER: &[&str] = &[
    "Break large tasks into smaller, manageable steps",
    "Set a specific time and place for the task",
    "Use a timer to create urgency and focus",
    "Remove barriers that might prevent you from starting",
    "Track your progress to maintain momentum",
];

/// The full advice list for a category
pub fn category_list(category: Category) -> &'static [&'static str] {
    match category {
        Category::Work => WORK,
        Category::Personal => PERSONAL,
        Category::Health => HEALTH,
        Category::Learning => LEARNING,
        Category::Other => OTHER,
    }
}

/// The advice list for a free-form category name; unknown names get `Other`'s list.
pub fn list_for_name(name: &str) -> &'static [&'static str] {
    category_list(Category::parse_lenient(name))
}

/// Suggestions frozen onto a task at creation
///
/// First three of the category's list, then the first two general entries,
/// truncated to four. No shuffling and no de-duplication, so `Other` yields
/// its first three entries followed by its first entry again.
pub fn suggestions_for(category: Category) -> Vec<String> {
    compose(category_list(category))
}

pub fn suggestions_for_name(name: &str) -> Vec<String> {
    compose(list_for_name(name))
}

fn compose(primary: &[&str]) -> Vec<String> {
    primary
        .iter()
        .take(PRIMARY_TAKE)
        .chain(OTHER.iter().take(GENERAL_TAKE))
        .take(SUGGESTIONS_PER_TASK)
        .map(|s| s.to_string())
        .collect()
}

/// One card of the Tips view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tip {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const PRODUCTIVITY_TIPS: [Tip; 6] = [
    Tip {
        icon: "🧠",
        title: "The 2-Minute Rule",
        description: "If a task takes less than 2 minutes, do it immediately instead of adding it to your list.",
    },
    Tip {
        icon: "⚡",
        title: "Energy Management",
        description: "Schedule your most important tasks during your peak energy hours, not just available time slots.",
    },
    Tip {
        icon: "🎯",
        title: "Single-Tasking Focus",
        description: "Focus on one task at a time. Multitasking reduces both quality and speed of work completion.",
    },
    Tip {
        icon: "🏗️",
        title: "Environment Design",
        description: "Set up your physical and digital environment to support your goals and minimize friction.",
    },
    Tip {
        icon: "📈",
        title: "Progress Over Perfection",
        description: "Aim for consistent progress rather than perfect execution. Done is better than perfect.",
    },
    Tip {
        icon: "🔄",
        title: "Review and Adjust",
        description: "Regularly review your productivity system and adjust based on what's working and what isn't.",
    },
];
