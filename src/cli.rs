use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::warn;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use crate::clock::Clock;
use crate::config::Config;
use crate::models::{Category, Goal, GoalPatch, NewGoal, NewTask, Priority, Task, TaskPatch};
use crate::storage::KeyValueStore;
use crate::store::EntityStore;
use crate::suggestions;

/// Plan the day, track the week and keep an eye on long-term goals.
///
/// Run without a subcommand to open the interactive view.
#[derive(Debug, Parser)]
#[command(name = "stt", version, about)]
pub struct Cli {
    /// Directory holding smartTimeTable.json and logs (overrides config)
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Today's tasks and completion percentage
    Today,
    /// Seven-day grid for the week containing a date
    Week {
        /// Any date inside the week (default: today)
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
        /// Shift by whole weeks (negative for earlier weeks)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
    },
    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),
    /// Manage goals
    #[command(subcommand)]
    Goal(GoalCommand),
    /// Show the productivity tips
    Tips,
    /// Preview the suggestions a new task in this category would get
    Suggest { category: String },
    /// Show or change configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Args, Default)]
pub struct TaskFields {
    #[arg(long)]
    pub description: Option<String>,
    /// Low, Medium or High
    #[arg(long, value_parser = Priority::from_str)]
    pub priority: Option<Priority>,
    /// Work, Personal, Health, Learning or Other (unknown names mean Other)
    #[arg(long)]
    pub category: Option<String>,
    /// Free-form estimate, e.g. "30 minutes"
    #[arg(long)]
    pub estimate: Option<String>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Create a task
    Add {
        title: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// List tasks (all, or those on one date)
    List {
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
    },
    /// Show every field of a task
    Show { id: String },
    /// Change fields of a task
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Flip a task between done and not done
    Toggle { id: String },
    /// Delete a task
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum GoalCommand {
    /// Create a goal
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        target: Option<NaiveDate>,
        /// Starting progress, clamped to 0-100
        #[arg(long, allow_negative_numbers = true)]
        progress: Option<i64>,
    },
    /// List goals
    List,
    /// Change fields of a goal
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// New target date, or "none" to clear it
        #[arg(long, value_name = "YYYY-MM-DD|none")]
        target: Option<String>,
        /// New progress, clamped to 0-100
        #[arg(long, allow_negative_numbers = true)]
        progress: Option<i64>,
    },
    /// Delete a goal
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the current configuration
    Show,
    /// Set one configuration key
    Set { key: String, value: String },
}

/// 处理配置命令（不需要加载数据）
pub fn run_config(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => crate::config::show_config(),
        ConfigCommand::Set { key, value } => crate::config::set_value(&key, &value),
    }
}

/// 处理数据相关的 CLI 命令
pub fn run<S, C, W>(
    command: Commands,
    store: &mut EntityStore<S, C>,
    config: &Config,
    out: &mut W,
) -> Result<()>
where
    S: KeyValueStore,
    C: Clock,
    W: Write,
{
    // 加载阶段的写入失败不算本命令的错误
    if let Some(err) = store.take_persist_error() {
        warn!("event=cli_load_persist_failed error={}", err);
    }

    match command {
        Commands::Today => print_today(store, out)?,
        Commands::Week { date, offset } => {
            let anchor = date.unwrap_or_else(|| store.today());
            let anchor = crate::projection::shift_week(anchor, offset);
            print_week(store, anchor, out)?;
        }
        Commands::Task(cmd) => run_task(cmd, store, config, out)?,
        Commands::Goal(cmd) => run_goal(cmd, store, out)?,
        Commands::Tips => print_tips(out)?,
        Commands::Suggest { category } => {
            let list = suggestions::suggestions_for_name(&category);
            writeln!(out, "Suggestions for {} tasks:", Category::parse_lenient(&category))?;
            for (i, tip) in list.iter().enumerate() {
                writeln!(out, "  {}. {}", i + 1, tip)?;
            }
        }
        Commands::Config(cmd) => run_config(cmd)?,
    }

    if let Some(err) = store.take_persist_error() {
        bail!("changes were applied but could not be saved: {}", err);
    }

    Ok(())
}

// ============================================================================
// Task Commands
// ============================================================================

fn run_task<S: KeyValueStore, C: Clock, W: Write>(
    command: TaskCommand,
    store: &mut EntityStore<S, C>,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    match command {
        TaskCommand::Add { title, fields } => {
            let input = NewTask {
                title,
                description: fields.description,
                priority: Some(fields.priority.unwrap_or(config.default_priority)),
                category: Some(
                    fields
                        .category
                        .as_deref()
                        .map(Category::parse_lenient)
                        .unwrap_or(config.default_category),
                ),
                estimated_time: fields.estimate,
                date: fields.date,
            };
            let task = store.create_task(input)?;
            writeln!(out, "Created task {} on {}", short_id(&task.id), task.date)?;
            print_suggestions(&task, out)?;
        }
        TaskCommand::List { date } => {
            let tasks: Vec<&Task> = match date {
                Some(date) => store.tasks_by_date(date),
                None => store.tasks().iter().collect(),
            };
            print_task_table(&tasks, out)?;
        }
        TaskCommand::Show { id } => {
            let id = store.resolve_task_id(&id)?;
            let task = store
                .task(&id)
                .ok_or_else(|| anyhow!("task '{}' not found", id))?;
            print_task_detail(task, out)?;
        }
        TaskCommand::Update { id, title, fields } => {
            let id = store.resolve_task_id(&id)?;
            let patch = TaskPatch {
                title,
                description: fields.description,
                priority: fields.priority,
                category: fields.category.as_deref().map(Category::parse_lenient),
                estimated_time: fields.estimate,
                date: fields.date,
                completed: None,
            };
            if patch.is_empty() {
                bail!("nothing to update, pass at least one field flag");
            }
            let task = store
                .update_task(&id, patch)?
                .ok_or_else(|| anyhow!("task '{}' not found", id))?;
            writeln!(out, "Updated task {}", short_id(&task.id))?;
        }
        TaskCommand::Toggle { id } => {
            let id = store.resolve_task_id(&id)?;
            let completed = store
                .toggle_task_completion(&id)
                .ok_or_else(|| anyhow!("task '{}' not found", id))?;
            let state = if completed { "done" } else { "not done" };
            writeln!(out, "Task {} marked {}", short_id(&id), state)?;
        }
        TaskCommand::Delete { id } => {
            let id = store.resolve_task_id(&id)?;
            store.delete_task(&id);
            writeln!(out, "Deleted task {}", short_id(&id))?;
        }
    }
    Ok(())
}

fn print_today<S: KeyValueStore, C: Clock, W: Write>(
    store: &EntityStore<S, C>,
    out: &mut W,
) -> Result<()> {
    let today = store.today();
    let tasks = store.tasks_for_today();
    let done = tasks.iter().filter(|t| t.completed).count();

    writeln!(out, "Today: {}", today.format("%A, %B %-d, %Y"))?;
    writeln!(out)?;

    if tasks.is_empty() {
        writeln!(out, "No tasks for today.")?;
    } else {
        print_task_table(&tasks, out)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Progress: {}/{} tasks ({}%)",
        done,
        tasks.len(),
        store.daily_progress()
    )?;
    Ok(())
}

fn print_week<S: KeyValueStore, C: Clock, W: Write>(
    store: &EntityStore<S, C>,
    anchor: NaiveDate,
    out: &mut W,
) -> Result<()> {
    let grid = store.week_grid(anchor);
    if let (Some(first), Some(last)) = (grid.first(), grid.last()) {
        writeln!(out, "Week of {} to {}", first.date, last.date)?;
    }

    for slot in grid {
        let marker = if slot.is_today { "  (today)" } else { "" };
        writeln!(out)?;
        writeln!(out, "{}{}", slot.date.format("%a %Y-%m-%d"), marker)?;
        if slot.tasks.is_empty() {
            writeln!(out, "  -")?;
        }
        for task in slot.tasks {
            writeln!(
                out,
                "  {} {:<8}  {}",
                checkbox(task.completed),
                short_id(&task.id),
                task.title
            )?;
        }
    }
    Ok(())
}

fn print_task_table<W: Write>(tasks: &[&Task], out: &mut W) -> Result<()> {
    if tasks.is_empty() {
        writeln!(out, "No tasks found.")?;
        return Ok(());
    }

    writeln!(out, "ID        DONE  DATE        PRIORITY  CATEGORY  TITLE")?;
    writeln!(out, "--------  ----  ----------  --------  --------  ------------------------------")?;

    for task in tasks {
        writeln!(
            out,
            "{:<8}  {:<4}  {}  {:<8}  {:<8}  {}",
            short_id(&task.id),
            checkbox(task.completed),
            task.date,
            task.priority,
            task.category,
            truncate(&task.title, 40)
        )?;
    }
    Ok(())
}

fn print_task_detail<W: Write>(task: &Task, out: &mut W) -> Result<()> {
    writeln!(out, "Task {}", task.id)?;
    writeln!(out, "Title: {}", task.title)?;
    writeln!(out, "Done: {}", if task.completed { "yes" } else { "no" })?;
    writeln!(out, "Date: {}", task.date)?;
    writeln!(out, "Priority: {}", task.priority)?;
    writeln!(out, "Category: {}", task.category)?;
    writeln!(out, "Estimate: {}", dash_if_empty(&task.estimated_time))?;
    writeln!(out, "Description: {}", dash_if_empty(&task.description))?;
    print_suggestions(task, out)
}

fn print_suggestions<W: Write>(task: &Task, out: &mut W) -> Result<()> {
    if task.ai_suggestions.is_empty() {
        return Ok(());
    }
    writeln!(out, "\nSuggestions:")?;
    for (i, tip) in task.ai_suggestions.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, tip)?;
    }
    Ok(())
}

// ============================================================================
// Goal Commands
// ============================================================================

fn run_goal<S: KeyValueStore, C: Clock, W: Write>(
    command: GoalCommand,
    store: &mut EntityStore<S, C>,
    out: &mut W,
) -> Result<()> {
    match command {
        GoalCommand::Add {
            title,
            description,
            target,
            progress,
        } => {
            let goal = store.create_goal(NewGoal {
                title,
                description,
                target_date: target,
                progress,
                related_tasks: Vec::new(),
            })?;
            writeln!(
                out,
                "Created goal {} at {}%",
                short_id(&goal.id),
                goal.progress
            )?;
        }
        GoalCommand::List => print_goal_table(store.goals(), out)?,
        GoalCommand::Update {
            id,
            title,
            description,
            target,
            progress,
        } => {
            let id = store.resolve_goal_id(&id)?;
            let patch = GoalPatch {
                title,
                description,
                target_date: target.as_deref().map(parse_target).transpose()?,
                progress,
                related_tasks: None,
            };
            if patch.is_empty() {
                bail!("nothing to update, pass at least one field flag");
            }
            let goal = store
                .update_goal(&id, patch)?
                .ok_or_else(|| anyhow!("goal '{}' not found", id))?;
            writeln!(
                out,
                "Updated goal {} ({}%)",
                short_id(&goal.id),
                goal.progress
            )?;
        }
        GoalCommand::Delete { id } => {
            let id = store.resolve_goal_id(&id)?;
            store.delete_goal(&id);
            writeln!(out, "Deleted goal {}", short_id(&id))?;
        }
    }
    Ok(())
}

/// `none` (or empty) clears the target date
fn parse_target(value: &str) -> Result<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|e| anyhow!("invalid target date '{}': {}", value, e))
}

fn print_goal_table<W: Write>(goals: &[Goal], out: &mut W) -> Result<()> {
    if goals.is_empty() {
        writeln!(out, "No goals yet.")?;
        return Ok(());
    }

    writeln!(out, "ID        PROGRESS          TARGET      TITLE")?;
    writeln!(out, "--------  ----------------  ----------  ------------------------------")?;

    for goal in goals {
        let target = goal
            .target_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{:<8}  {} {:>4}%  {:<10}  {}",
            short_id(&goal.id),
            progress_bar(goal.progress, 10),
            goal.progress,
            target,
            truncate(&goal.title, 40)
        )?;
    }
    Ok(())
}

fn print_tips<W: Write>(out: &mut W) -> Result<()> {
    for tip in suggestions::PRODUCTIVITY_TIPS.iter() {
        writeln!(out, "{} {}", tip.icon, tip.title)?;
        writeln!(out, "   {}", tip.description)?;
        writeln!(out)?;
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

fn dash_if_empty(s: &str) -> &str {
    if s.trim().is_empty() { "-" } else { s }
}

fn progress_bar(progress: u8, width: usize) -> String {
    let filled = (progress as usize * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled.min(width)))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStore;

    fn seeded() -> EntityStore<MemoryStore, FixedClock> {
        EntityStore::open(MemoryStore::new(), FixedClock::on("2025-09-10")).0
    }

    fn run_ok(store: &mut EntityStore<MemoryStore, FixedClock>, args: &[&str]) -> String {
        run_with(store, &Config::default(), args)
    }

    fn run_with(
        store: &mut EntityStore<MemoryStore, FixedClock>,
        config: &Config,
        args: &[&str],
    ) -> String {
        let cli = Cli::try_parse_from(std::iter::once("stt").chain(args.iter().copied())).unwrap();
        let mut out = Vec::new();
        run(cli.command.unwrap(), store, config, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_no_subcommand_parses_to_none() {
        let cli = Cli::try_parse_from(["stt"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.ephemeral);

        let cli = Cli::try_parse_from(["stt", "--ephemeral", "today"]).unwrap();
        assert!(cli.ephemeral);
    }

    #[test]
    fn test_bad_date_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["stt", "week", "--date", "2025-02-30"]).is_err());
        assert!(Cli::try_parse_from(["stt", "task", "add", "x", "--priority", "urgent"]).is_err());
    }

    #[test]
    fn test_priority_flag_is_strict_but_case_insensitive() {
        let cli = Cli::try_parse_from(["stt", "task", "add", "x", "--priority", "high"]).unwrap();
        match cli.command {
            Some(Commands::Task(TaskCommand::Add { fields, .. })) => {
                assert_eq!(fields.priority, Some(Priority::High));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["stt", "task", "update", "t", "--priority", "asap"]).is_err());
    }

    #[test]
    fn test_failed_seed_write_only_fails_mutating_commands() {
        use crate::storage::FileStore;

        // 数据目录是一个普通文件，写入必然失败
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let (mut store, _) =
            EntityStore::open(FileStore::new(&blocker), FixedClock::on("2025-09-10"));
        assert!(store.last_persist_error().is_some());

        let mut out = Vec::new();
        let today = Cli::try_parse_from(["stt", "today"]).unwrap();
        run(today.command.unwrap(), &mut store, &Config::default(), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Progress: 1/2 tasks (50%)"));

        let mut out = Vec::new();
        let toggle = Cli::try_parse_from(["stt", "task", "toggle", "task_1"]).unwrap();
        let err = run(toggle.command.unwrap(), &mut store, &Config::default(), &mut out)
            .unwrap_err();
        assert!(err.to_string().contains("could not be saved"));
    }

    #[test]
    fn test_today_lists_tasks_and_progress() {
        let mut store = seeded();
        let output = run_ok(&mut store, &["today"]);

        assert!(output.contains("Wednesday, September 10, 2025"));
        assert!(output.contains("Complete project proposal"));
        assert!(output.contains("Morning workout"));
        assert!(!output.contains("Learn JavaScript"));
        assert!(output.contains("Progress: 1/2 tasks (50%)"));
    }

    #[test]
    fn test_task_add_uses_config_defaults_and_prints_suggestions() {
        let mut store = seeded();
        let config = Config {
            default_category: Category::Health,
            default_priority: Priority::High,
            ..Config::default()
        };
        let output = run_with(&mut store, &config, &["task", "add", "Stretch"]);

        let task = store.tasks().last().unwrap();
        assert_eq!(task.title, "Stretch");
        assert_eq!(task.category, Category::Health);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.date, "2025-09-10".parse::<NaiveDate>().unwrap());
        assert!(output.contains("Suggestions:"));
        assert!(output.contains(&task.ai_suggestions[0]));
    }

    #[test]
    fn test_task_add_with_unknown_category_falls_back() {
        let mut store = seeded();
        run_ok(
            &mut store,
            &["task", "add", "Misc", "--category", "gardening", "--date", "2025-09-12"],
        );
        let task = store.tasks().last().unwrap();
        assert_eq!(task.category, Category::Other);
        assert_eq!(task.ai_suggestions, suggestions::suggestions_for(Category::Other));
    }

    #[test]
    fn test_task_add_blank_title_fails() {
        let mut store = seeded();
        let cli = Cli::try_parse_from(["stt", "task", "add", "  "]).unwrap();
        let mut out = Vec::new();
        let result = run(cli.command.unwrap(), &mut store, &Config::default(), &mut out);
        assert!(result.is_err());
        assert_eq!(store.tasks().len(), 3);
    }

    #[test]
    fn test_toggle_and_update_by_id() {
        let mut store = seeded();
        run_ok(&mut store, &["task", "toggle", "task_1"]);
        assert!(store.task("task_1").unwrap().completed);

        run_ok(&mut store, &["task", "update", "task_1", "--title", "Ship proposal"]);
        assert_eq!(store.task("task_1").unwrap().title, "Ship proposal");
    }

    #[test]
    fn test_update_without_fields_is_an_error() {
        let mut store = seeded();
        let cli = Cli::try_parse_from(["stt", "task", "update", "task_1"]).unwrap();
        let mut out = Vec::new();
        assert!(run(cli.command.unwrap(), &mut store, &Config::default(), &mut out).is_err());
    }

    #[test]
    fn test_ambiguous_prefix_is_an_error() {
        let mut store = seeded();
        let cli = Cli::try_parse_from(["stt", "task", "delete", "task_"]).unwrap();
        let mut out = Vec::new();
        let err = run(cli.command.unwrap(), &mut store, &Config::default(), &mut out).unwrap_err();
        assert!(err.to_string().contains("use a longer prefix"));
        assert_eq!(store.tasks().len(), 3);
    }

    #[test]
    fn test_week_grid_output() {
        let mut store = seeded();
        let output = run_ok(&mut store, &["week"]);
        assert!(output.contains("Week of 2025-09-07 to 2025-09-13"));
        assert!(output.contains("Wed 2025-09-10  (today)"));
        assert!(output.contains("Learn JavaScript fundamentals"));

        let next = run_ok(&mut store, &["week", "--offset", "1"]);
        assert!(next.contains("Week of 2025-09-14 to 2025-09-20"));
        assert!(!next.contains("(today)"));
    }

    #[test]
    fn test_goal_commands() {
        let mut store = seeded();
        run_ok(&mut store, &["goal", "update", "goal_1", "--progress", "150"]);
        assert_eq!(store.goal("goal_1").unwrap().progress, 100);

        run_ok(&mut store, &["goal", "update", "goal_1", "--target", "none"]);
        assert!(store.goal("goal_1").unwrap().target_date.is_none());

        run_ok(&mut store, &["goal", "add", "Read 12 books", "--progress", "-5"]);
        let goal = store.goals().last().unwrap();
        assert_eq!(goal.progress, 0);

        let listing = run_ok(&mut store, &["goal", "list"]);
        assert!(listing.contains("Read 12 books"));
        assert!(listing.contains("[##########]  100%"));
    }

    #[test]
    fn test_suggest_and_tips() {
        let mut store = seeded();
        let output = run_ok(&mut store, &["suggest", "work"]);
        assert!(output.starts_with("Suggestions for Work tasks:"));
        assert!(output.contains("  4. "));

        let tips = run_ok(&mut store, &["tips"]);
        assert!(tips.contains("The 2-Minute Rule"));
    }

    #[test]
    fn test_helpers() {
        assert_eq!(short_id("0123456789"), "01234567");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(progress_bar(35, 10), "[####------]");
        assert_eq!(progress_bar(0, 10), "[----------]");
        assert_eq!(truncate("abcdefgh", 5), "ab...");
        assert!(parse_target("none").unwrap().is_none());
        assert!(parse_target("2025-13-01").is_err());
    }
}
