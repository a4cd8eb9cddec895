use chrono::NaiveDate;

use super::Snapshot;
use crate::models::{Category, Goal, Priority, Task};

const DAY_MS: i64 = 86_400_000;

fn fixed_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Built-in dataset used when nothing usable is stored yet
pub fn sample_snapshot(now_millis: i64) -> Snapshot {
    let tasks = vec![
        Task {
            id: "task_1".to_string(),
            title: "Complete project proposal".to_string(),
            description: "Finish writing the quarterly project proposal for the client meeting"
                .to_string(),
            priority: Priority::High,
            category: Category::Work,
            estimated_time: "2 hours".to_string(),
            completed: false,
            date: fixed_date(2025, 9, 10),
            created_at: now_millis,
            ai_suggestions: strings(&[
                "Break the proposal into sections: executive summary, objectives, timeline, and budget",
                "Use the 25-minute Pomodoro technique with 5-minute breaks",
                "Start with an outline to organize your thoughts before writing",
                "Schedule this during your most productive hours, typically morning",
            ]),
        },
        Task {
            id: "task_2".to_string(),
            title: "Morning workout".to_string(),
            description: "30-minute cardio and strength training session".to_string(),
            priority: Priority::Medium,
            category: Category::Health,
            estimated_time: "30 minutes".to_string(),
            completed: true,
            date: fixed_date(2025, 9, 10),
            created_at: now_millis - DAY_MS,
            ai_suggestions: strings(&[
                "Prepare your workout clothes the night before",
                "Start with a 5-minute warm-up to prevent injuries",
                "Track your progress in a fitness app or journal",
                "Listen to energizing music or podcasts during cardio",
            ]),
        },
        Task {
            id: "task_3".to_string(),
            title: "Learn JavaScript fundamentals".to_string(),
            description: "Study JavaScript basics: variables, functions, and loops".to_string(),
            priority: Priority::Medium,
            category: Category::Learning,
            estimated_time: "1 hour".to_string(),
            completed: false,
            date: fixed_date(2025, 9, 11),
            created_at: now_millis - DAY_MS / 2,
            ai_suggestions: strings(&[
                "Use active learning: code along with tutorials instead of just watching",
                "Practice with small projects immediately after learning concepts",
                "Join coding communities like Stack Overflow for help and discussion",
                "Set up a development environment to practice coding",
            ]),
        },
    ];

    let goals = vec![Goal {
        id: "goal_1".to_string(),
        title: "Launch Personal Website".to_string(),
        description:
            "Create and deploy a personal portfolio website to showcase my projects and skills"
                .to_string(),
        progress: 35,
        target_date: Some(fixed_date(2025, 9, 30)),
        created_at: now_millis,
        related_tasks: vec!["task_3".to_string()],
    }];

    Snapshot { tasks, goals }
}
