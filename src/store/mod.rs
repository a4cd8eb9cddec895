//! Owner of the task and goal collections.
//!
//! Every mutation updates memory first and then writes the full
//! `{tasks, goals}` blob through the storage adapter. A failed write is
//! logged and remembered but never rolls the in-memory change back.

pub mod sample;

use chrono::NaiveDate;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::models::{
    clamp_progress, require_title, Goal, GoalPatch, NewGoal, NewTask, Task, TaskPatch,
    ValidationError,
};
use crate::projection::{self, DaySlot};
use crate::storage::KeyValueStore;
use crate::suggestions;

/// Key of the single persisted blob
pub const STORAGE_KEY: &str = "smartTimeTable";

/// The persisted shape: `{ "tasks": [...], "goals": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    tasks: &'a [Task],
    goals: &'a [Goal],
}

/// Where the collections came from on `load`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Decoded from the stored blob
    Stored,
    /// Nothing stored yet; sample data seeded and written
    SeededEmpty,
    /// Stored blob could not be decoded; sample data seeded and written
    SeededCorrupt,
    /// Storage read failed; sample data seeded in memory only
    SeededUnreadable,
}

impl LoadSource {
    pub fn is_seeded(&self) -> bool {
        *self != LoadSource::Stored
    }

    pub fn describe(&self) -> &'static str {
        match self {
            LoadSource::Stored => "loaded saved data",
            LoadSource::SeededEmpty => "no saved data yet, loaded sample data",
            LoadSource::SeededCorrupt => "saved data was unreadable, replaced with sample data",
            LoadSource::SeededUnreadable => {
                "could not read saved data, showing sample data (not saved)"
            }
        }
    }
}

/// Failure to resolve a user-typed id or id prefix
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdLookupError {
    #[error("no {entity} matches '{prefix}'")]
    NotFound { entity: &'static str, prefix: String },

    #[error("'{prefix}' matches {count} {entity}s, use a longer prefix")]
    Ambiguous {
        entity: &'static str,
        prefix: String,
        count: usize,
    },
}

pub struct EntityStore<S, C = SystemClock> {
    storage: S,
    clock: C,
    tasks: Vec<Task>,
    goals: Vec<Goal>,
    last_persist_error: Option<String>,
    /// Set when the stored blob could not be read; writes are refused
    read_only: bool,
}

impl<S: KeyValueStore, C: Clock> EntityStore<S, C> {
    /// Empty store; call `load` to read persisted state.
    pub fn new(storage: S, clock: C) -> Self {
        Self {
            storage,
            clock,
            tasks: Vec::new(),
            goals: Vec::new(),
            last_persist_error: None,
            read_only: false,
        }
    }

    /// Construct and `load` in one step.
    pub fn open(storage: S, clock: C) -> (Self, LoadSource) {
        let mut store = Self::new(storage, clock);
        let source = store.load();
        (store, source)
    }

    /// Replace the in-memory collections with the persisted state
    ///
    /// Absent or undecodable data seeds the sample dataset and writes it
    /// straight back. A failed read also seeds, but leaves storage untouched.
    pub fn load(&mut self) -> LoadSource {
        self.read_only = false;
        match self.storage.get(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Snapshot>(&raw) {
                Ok(snapshot) => {
                    info!(
                        "event=store_load status=ok tasks={} goals={}",
                        snapshot.tasks.len(),
                        snapshot.goals.len()
                    );
                    self.tasks = snapshot.tasks;
                    self.goals = snapshot.goals;
                    LoadSource::Stored
                }
                Err(err) => {
                    warn!("event=store_load status=corrupt error={}", err);
                    self.seed();
                    self.save();
                    LoadSource::SeededCorrupt
                }
            },
            Ok(None) => {
                info!("event=store_load status=empty");
                self.seed();
                self.save();
                LoadSource::SeededEmpty
            }
            Err(err) => {
                error!("event=store_load status=read_failed error={}", err);
                self.seed();
                self.read_only = true;
                LoadSource::SeededUnreadable
            }
        }
    }

    fn seed(&mut self) {
        let sample = sample::sample_snapshot(self.clock.now_millis());
        self.tasks = sample.tasks;
        self.goals = sample.goals;
    }

    /// Write the full state; returns whether the write succeeded.
    ///
    /// Never panics or propagates: failures are logged and kept in
    /// `last_persist_error` until the next successful write. After an
    /// unreadable load nothing is written, so the stored blob survives.
    pub fn save(&mut self) -> bool {
        if self.read_only {
            warn!("event=store_save status=refused reason=unreadable_storage");
            self.last_persist_error = Some(
                "saved data could not be read, so it is left untouched (changes stay in memory)"
                    .to_string(),
            );
            return false;
        }

        let blob = SnapshotRef {
            tasks: &self.tasks,
            goals: &self.goals,
        };

        let result = serde_json::to_string(&blob)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.storage
                    .set(STORAGE_KEY, &json)
                    .map_err(|e| e.to_string())
            });

        match result {
            Ok(()) => {
                debug!(
                    "event=store_save status=ok tasks={} goals={}",
                    self.tasks.len(),
                    self.goals.len()
                );
                self.last_persist_error = None;
                true
            }
            Err(err) => {
                error!("event=store_save status=failed error={}", err);
                self.last_persist_error = Some(err);
                false
            }
        }
    }

    /// Whether writes are refused because the stored data could not be read
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    pub fn take_persist_error(&mut self) -> Option<String> {
        self.last_persist_error.take()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tasks: self.tasks.clone(),
            goals: self.goals.clone(),
        }
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ===== Tasks =====

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Create a task, freezing its suggestions from the category.
    pub fn create_task(&mut self, input: NewTask) -> Result<Task, ValidationError> {
        let title = require_title("task", &input.title)?;
        let id = fresh_id(|id| self.tasks.iter().any(|t| t.id == id));
        let date = input.date.unwrap_or_else(|| self.clock.today());

        let mut task = Task::new(id, title, date, self.clock.now_millis());
        task.description = input.description.unwrap_or_default();
        task.priority = input.priority.unwrap_or_default();
        task.category = input.category.unwrap_or_default();
        task.estimated_time = input.estimated_time.unwrap_or_default();
        task.ai_suggestions = suggestions::suggestions_for(task.category);

        info!(
            "event=task_create id={} category={} date={}",
            task.id, task.category, task.date
        );
        self.tasks.push(task.clone());
        self.save();

        Ok(task)
    }

    /// Merge `patch` over the task with `id`
    ///
    /// `Ok(None)` when no such task exists. `id`, `created_at` and the
    /// frozen suggestions are never touched, even when the category changes.
    pub fn update_task(
        &mut self,
        id: &str,
        patch: TaskPatch,
    ) -> Result<Option<Task>, ValidationError> {
        if let Some(title) = &patch.title {
            require_title("task", title)?;
        }

        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!("event=task_update status=not_found id={}", id);
            return Ok(None);
        };

        patch.apply(task);
        let updated = task.clone();
        info!("event=task_update status=ok id={}", id);
        self.save();

        Ok(Some(updated))
    }

    /// Remove the task with `id` (if any) and unlink it from goals.
    ///
    /// Returns whether a task was removed.
    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;

        for goal in &mut self.goals {
            goal.related_tasks.retain(|t| t != id);
        }

        info!("event=task_delete id={} removed={}", id, removed);
        self.save();
        removed
    }

    /// Flip `completed`; returns the new value, or `None` if absent.
    pub fn toggle_task_completion(&mut self, id: &str) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        let completed = task.completed;

        info!("event=task_toggle id={} completed={}", id, completed);
        self.save();
        Some(completed)
    }

    pub fn resolve_task_id(&self, prefix: &str) -> Result<String, IdLookupError> {
        resolve_prefix("task", self.tasks.iter().map(|t| t.id.as_str()), prefix)
    }

    // ===== Goals =====

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn create_goal(&mut self, input: NewGoal) -> Result<Goal, ValidationError> {
        let title = require_title("goal", &input.title)?;
        let id = fresh_id(|id| self.goals.iter().any(|g| g.id == id));

        let mut goal = Goal::new(id, title, self.clock.now_millis());
        goal.description = input.description.unwrap_or_default();
        goal.target_date = input.target_date;
        goal.progress = clamp_progress(input.progress.unwrap_or(0));
        goal.related_tasks = input.related_tasks;

        info!("event=goal_create id={}", goal.id);
        self.goals.push(goal.clone());
        self.save();

        Ok(goal)
    }

    /// Merge `patch` over the goal with `id`; progress is clamped to 0..=100.
    pub fn update_goal(
        &mut self,
        id: &str,
        patch: GoalPatch,
    ) -> Result<Option<Goal>, ValidationError> {
        if let Some(title) = &patch.title {
            require_title("goal", title)?;
        }

        let Some(goal) = self.goals.iter_mut().find(|g| g.id == id) else {
            debug!("event=goal_update status=not_found id={}", id);
            return Ok(None);
        };

        patch.apply(goal);
        let updated = goal.clone();
        info!(
            "event=goal_update status=ok id={} progress={}",
            id, updated.progress
        );
        self.save();

        Ok(Some(updated))
    }

    pub fn delete_goal(&mut self, id: &str) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        let removed = self.goals.len() != before;

        info!("event=goal_delete id={} removed={}", id, removed);
        self.save();
        removed
    }

    pub fn set_goal_progress(&mut self, id: &str, progress: i64) -> Option<Goal> {
        let patch = GoalPatch {
            progress: Some(progress),
            ..GoalPatch::default()
        };
        // 没有标题字段，不会触发校验错误
        self.update_goal(id, patch).unwrap_or(None)
    }

    pub fn adjust_goal_progress(&mut self, id: &str, delta: i64) -> Option<Goal> {
        let current = self.goal(id)?.progress as i64;
        self.set_goal_progress(id, current + delta)
    }

    pub fn resolve_goal_id(&self, prefix: &str) -> Result<String, IdLookupError> {
        resolve_prefix("goal", self.goals.iter().map(|g| g.id.as_str()), prefix)
    }

    // ===== Projections =====

    pub fn tasks_for_today(&self) -> Vec<&Task> {
        projection::tasks_for_today(&self.tasks, self.clock.today())
    }

    pub fn tasks_by_date(&self, date: NaiveDate) -> Vec<&Task> {
        projection::tasks_by_date(&self.tasks, date)
    }

    pub fn is_today(&self, date: NaiveDate) -> bool {
        projection::is_today(date, self.clock.today())
    }

    /// Completion percentage of today's tasks
    pub fn daily_progress(&self) -> u8 {
        projection::daily_progress(&self.tasks_for_today())
    }

    pub fn week_grid(&self, anchor: NaiveDate) -> Vec<DaySlot<'_>> {
        projection::week_grid(&self.tasks, anchor, self.clock.today())
    }
}

/// A UUID v4 string not already `taken`
fn fresh_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !taken(&id) {
            return id;
        }
    }
}

/// Exact id wins; otherwise the prefix must match exactly one id.
fn resolve_prefix<'a>(
    entity: &'static str,
    ids: impl Iterator<Item = &'a str>,
    prefix: &str,
) -> Result<String, IdLookupError> {
    let prefix = prefix.trim();
    let mut matches = Vec::new();

    for id in ids {
        if id == prefix {
            return Ok(id.to_string());
        }
        if !prefix.is_empty() && id.starts_with(prefix) {
            matches.push(id);
        }
    }

    match matches.as_slice() {
        [only] => Ok(only.to_string()),
        [] => Err(IdLookupError::NotFound {
            entity,
            prefix: prefix.to_string(),
        }),
        many => Err(IdLookupError::Ambiguous {
            entity,
            prefix: prefix.to_string(),
            count: many.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{Category, Priority};
    use crate::storage::{MemoryStore, StorageError, StorageResult};
    use std::collections::HashSet;

    const TODAY: &str = "2025-09-10";

    fn empty_store() -> EntityStore<MemoryStore, FixedClock> {
        EntityStore::new(MemoryStore::new(), FixedClock::on(TODAY))
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn stored_snapshot(store: &EntityStore<MemoryStore, FixedClock>) -> Option<Snapshot> {
        store
            .storage()
            .get(STORAGE_KEY)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    /// Storage whose reads and/or writes fail on demand
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_reads: bool,
        fail_writes: bool,
        writes: usize,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            if self.fail_reads {
                return Err(StorageError::Io {
                    path: key.into(),
                    source: std::io::Error::other("read refused"),
                });
            }
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
            self.writes += 1;
            if self.fail_writes {
                return Err(StorageError::Io {
                    path: key.into(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn test_create_task_applies_defaults() {
        let mut store = empty_store();
        let task = store.create_task(NewTask::new("Water plants")).unwrap();

        assert!(!task.id.is_empty());
        assert_eq!(task.title, "Water plants");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.category, Category::Other);
        assert_eq!(task.date, date(TODAY));
        assert!(!task.completed);
        assert_eq!(task.created_at, FixedClock::on(TODAY).now_millis);
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn test_create_work_task_freezes_mixed_suggestions() {
        let mut store = empty_store();
        let task = store
            .create_task(NewTask {
                category: Some(Category::Work),
                ..NewTask::new("Write report")
            })
            .unwrap();

        let work = suggestions::category_list(Category::Work);
        let other = suggestions::category_list(Category::Other);
        assert_eq!(task.ai_suggestions.len(), 4);
        assert_eq!(
            task.ai_suggestions,
            vec![work[0], work[1], work[2], other[0]]
        );
    }

    #[test]
    fn test_create_task_persists_full_state() {
        let mut store = empty_store();
        let task = store.create_task(NewTask::new("Persist me")).unwrap();

        let stored = stored_snapshot(&store).unwrap();
        assert_eq!(stored.tasks, vec![task]);
        assert!(stored.goals.is_empty());
    }

    #[test]
    fn test_create_task_requires_title() {
        let mut store = empty_store();
        let err = store.create_task(NewTask::new("   ")).unwrap_err();

        assert_eq!(err, ValidationError::EmptyTitle { entity: "task" });
        assert!(store.tasks().is_empty());
        assert!(stored_snapshot(&store).is_none());
    }

    #[test]
    fn test_task_ids_are_unique() {
        let mut store = empty_store();
        let mut seen = HashSet::new();
        for i in 0..50 {
            let task = store.create_task(NewTask::new(format!("task {}", i))).unwrap();
            assert!(seen.insert(task.id.clone()));
            if i % 3 == 0 {
                store.delete_task(&task.id);
            }
        }
        let live: HashSet<_> = store.tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(live.len(), store.tasks().len());
    }

    #[test]
    fn test_update_task_merges_and_keeps_identity() {
        let mut store = empty_store();
        let original = store
            .create_task(NewTask {
                category: Some(Category::Health),
                description: Some("keep".into()),
                ..NewTask::new("Run")
            })
            .unwrap();

        let updated = store
            .update_task(
                &original.id,
                TaskPatch {
                    title: Some("Run 5k".into()),
                    category: Some(Category::Work),
                    date: Some(date("2025-09-12")),
                    ..TaskPatch::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.ai_suggestions, original.ai_suggestions);
        assert_eq!(updated.title, "Run 5k");
        assert_eq!(updated.category, Category::Work);
        assert_eq!(updated.description, "keep");
        assert_eq!(store.task(&original.id), Some(&updated));
        assert_eq!(stored_snapshot(&store).unwrap().tasks, vec![updated]);
    }

    #[test]
    fn test_update_missing_task_is_none_without_write() {
        let mut store = EntityStore::new(FlakyStore::default(), FixedClock::on(TODAY));
        let result = store.update_task("nope", TaskPatch {
            completed: Some(true),
            ..TaskPatch::default()
        });

        assert_eq!(result, Ok(None));
        assert_eq!(store.storage().writes, 0);
    }

    #[test]
    fn test_update_task_rejects_blank_title() {
        let mut store = empty_store();
        let task = store.create_task(NewTask::new("Keep")).unwrap();

        let result = store.update_task(&task.id, TaskPatch {
            title: Some(" ".into()),
            ..TaskPatch::default()
        });

        assert!(result.is_err());
        assert_eq!(store.task(&task.id).unwrap().title, "Keep");
    }

    #[test]
    fn test_toggle_is_self_inverse() {
        let mut store = empty_store();
        let task = store.create_task(NewTask::new("Flip")).unwrap();

        assert_eq!(store.toggle_task_completion(&task.id), Some(true));
        assert!(store.task(&task.id).unwrap().completed);
        assert_eq!(store.toggle_task_completion(&task.id), Some(false));
        assert_eq!(store.task(&task.id), Some(&task));
    }

    #[test]
    fn test_toggle_missing_is_noop_without_write() {
        let mut store = EntityStore::new(FlakyStore::default(), FixedClock::on(TODAY));
        assert_eq!(store.toggle_task_completion("ghost"), None);
        assert_eq!(store.storage().writes, 0);
    }

    #[test]
    fn test_delete_missing_task_leaves_collection() {
        let mut store = empty_store();
        store.create_task(NewTask::new("Stay")).unwrap();
        let before = store.snapshot();

        assert!(!store.delete_task("not-there"));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_delete_task_unlinks_goals() {
        let mut store = empty_store();
        let task = store.create_task(NewTask::new("Linked")).unwrap();
        let goal = store
            .create_goal(NewGoal {
                related_tasks: vec![task.id.clone(), "other".into()],
                ..NewGoal::new("Ship")
            })
            .unwrap();

        assert!(store.delete_task(&task.id));
        assert!(store.task(&task.id).is_none());
        assert_eq!(store.goal(&goal.id).unwrap().related_tasks, vec!["other"]);
    }

    #[test]
    fn test_create_goal_defaults() {
        let mut store = empty_store();
        let goal = store.create_goal(NewGoal::new("Launch site")).unwrap();

        assert_eq!(goal.progress, 0);
        assert!(!goal.id.is_empty());
        assert_eq!(store.goals(), &[goal.clone()]);
        assert_eq!(stored_snapshot(&store).unwrap().goals, vec![goal]);
    }

    #[test]
    fn test_goal_progress_is_clamped() {
        let mut store = empty_store();
        let goal = store
            .create_goal(NewGoal {
                progress: Some(180),
                ..NewGoal::new("Too eager")
            })
            .unwrap();
        assert_eq!(goal.progress, 100);

        let updated = store
            .update_goal(&goal.id, GoalPatch {
                progress: Some(-20),
                ..GoalPatch::default()
            })
            .unwrap()
            .unwrap();
        assert_eq!(updated.progress, 0);
        assert_eq!(updated.id, goal.id);
        assert_eq!(updated.created_at, goal.created_at);
    }

    #[test]
    fn test_adjust_goal_progress() {
        let mut store = empty_store();
        let goal = store.create_goal(NewGoal::new("Read books")).unwrap();

        assert_eq!(store.adjust_goal_progress(&goal.id, 5).unwrap().progress, 5);
        assert_eq!(store.adjust_goal_progress(&goal.id, -10).unwrap().progress, 0);
        assert_eq!(store.set_goal_progress(&goal.id, 95).unwrap().progress, 95);
        assert_eq!(store.adjust_goal_progress(&goal.id, 10).unwrap().progress, 100);
        assert!(store.adjust_goal_progress("missing", 5).is_none());
    }

    #[test]
    fn test_update_and_delete_missing_goal() {
        let mut store = empty_store();
        assert_eq!(store.update_goal("nope", GoalPatch::default()), Ok(None));
        assert!(!store.delete_goal("nope"));
    }

    #[test]
    fn test_load_empty_storage_seeds_and_persists() {
        let (store, source) = EntityStore::open(MemoryStore::new(), FixedClock::on(TODAY));

        assert_eq!(source, LoadSource::SeededEmpty);
        assert_eq!(store.tasks().len(), 3);
        assert_eq!(store.goals().len(), 1);
        assert_eq!(stored_snapshot(&store).unwrap(), store.snapshot());
    }

    #[test]
    fn test_load_corrupt_blob_seeds_and_persists() {
        let mut storage = MemoryStore::new();
        storage.set(STORAGE_KEY, "{not json").unwrap();

        let (store, source) = EntityStore::open(storage, FixedClock::on(TODAY));

        assert_eq!(source, LoadSource::SeededCorrupt);
        assert!(source.is_seeded());
        assert_eq!(stored_snapshot(&store).unwrap(), store.snapshot());
    }

    #[test]
    fn test_load_read_failure_seeds_without_writing() {
        let storage = FlakyStore {
            fail_reads: true,
            ..FlakyStore::default()
        };
        let (store, source) = EntityStore::open(storage, FixedClock::on(TODAY));

        assert_eq!(source, LoadSource::SeededUnreadable);
        assert_eq!(store.tasks().len(), 3);
        assert_eq!(store.storage().writes, 0);
    }

    #[test]
    fn test_unreadable_storage_refuses_later_writes() {
        let storage = FlakyStore {
            fail_reads: true,
            ..FlakyStore::default()
        };
        let (mut store, _) = EntityStore::open(storage, FixedClock::on(TODAY));
        assert!(store.is_read_only());

        let task = store.create_task(NewTask::new("Kept in memory")).unwrap();
        assert!(store.task(&task.id).is_some());
        assert!(!store.save());
        assert_eq!(store.storage().writes, 0);
        assert!(store.last_persist_error().is_some());
    }

    #[test]
    fn test_unreadable_file_survives_mutation_and_exit_save() {
        use crate::storage::FileStore;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(format!("{}.json", STORAGE_KEY));
        let original: &[u8] = b"{\"tasks\":[{\"title\":\"mine \xff\"}]}";
        std::fs::write(&path, original).unwrap();

        let (mut store, source) =
            EntityStore::open(FileStore::new(dir.path()), FixedClock::on(TODAY));
        assert_eq!(source, LoadSource::SeededUnreadable);

        store.toggle_task_completion("task_1");
        store.save();

        assert_eq!(std::fs::read(&path).unwrap(), original);
    }

    #[test]
    fn test_load_defaults_missing_lists() {
        let mut storage = MemoryStore::new();
        storage
            .set(
                STORAGE_KEY,
                r#"{"tasks":[{"id":"a","title":"Only","date":"2025-09-10"}]}"#,
            )
            .unwrap();

        let (store, source) = EntityStore::open(storage, FixedClock::on(TODAY));

        assert_eq!(source, LoadSource::Stored);
        assert_eq!(store.tasks().len(), 1);
        assert!(store.goals().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let mut store = empty_store();
        let mut task = store
            .create_task(NewTask {
                priority: Some(Priority::High),
                category: Some(Category::Learning),
                estimated_time: Some("45 min".into()),
                date: Some(date("2025-09-12")),
                ..NewTask::new("Study")
            })
            .unwrap();
        task = store
            .update_task(&task.id, TaskPatch {
                completed: Some(true),
                ..TaskPatch::default()
            })
            .unwrap()
            .unwrap();
        store
            .create_goal(NewGoal {
                target_date: Some(date("2025-12-31")),
                related_tasks: vec![task.id.clone()],
                ..NewGoal::new("Finish course")
            })
            .unwrap();
        assert!(store.save());
        let expected = store.snapshot();

        let storage = store.storage().clone();
        let (fresh, source) = EntityStore::open(storage, FixedClock::on("2030-01-01"));

        assert_eq!(source, LoadSource::Stored);
        assert_eq!(fresh.snapshot(), expected);
    }

    #[test]
    fn test_failed_write_keeps_memory_and_reports() {
        let storage = FlakyStore {
            fail_writes: true,
            ..FlakyStore::default()
        };
        let mut store = EntityStore::new(storage, FixedClock::on(TODAY));

        let task = store.create_task(NewTask::new("Unsaved")).unwrap();
        assert_eq!(store.task(&task.id), Some(&task));
        assert!(store.last_persist_error().unwrap().contains("disk full"));

        store.storage.fail_writes = false;
        assert!(store.save());
        assert!(store.last_persist_error().is_none());
    }

    #[test]
    fn test_take_persist_error_clears_it() {
        let storage = FlakyStore {
            fail_writes: true,
            ..FlakyStore::default()
        };
        let mut store = EntityStore::new(storage, FixedClock::on(TODAY));
        assert!(!store.save());
        assert!(store.take_persist_error().is_some());
        assert!(store.take_persist_error().is_none());
    }

    #[test]
    fn test_today_projections_use_clock() {
        let mut store = empty_store();
        let a = store.create_task(NewTask::new("Today one")).unwrap();
        store
            .create_task(NewTask {
                date: Some(date("2025-09-11")),
                ..NewTask::new("Tomorrow")
            })
            .unwrap();
        store.create_task(NewTask::new("Today two")).unwrap();
        store.toggle_task_completion(&a.id);

        let today: Vec<_> = store.tasks_for_today().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(today, vec!["Today one", "Today two"]);
        assert_eq!(store.daily_progress(), 50);
        assert!(store.is_today(date(TODAY)));
        assert_eq!(store.tasks_by_date(date("2025-09-11")).len(), 1);

        let grid = store.week_grid(date(TODAY));
        assert_eq!(grid[3].tasks.len(), 2);
        assert!(grid[3].is_today);
    }

    #[test]
    fn test_resolve_prefix() {
        let ids = ["abc-1", "abd-2", "xyz"];
        assert_eq!(resolve_prefix("task", ids.into_iter(), "abc"), Ok("abc-1".into()));
        assert_eq!(resolve_prefix("task", ids.into_iter(), "xyz"), Ok("xyz".into()));
        assert!(matches!(
            resolve_prefix("task", ids.into_iter(), "ab"),
            Err(IdLookupError::Ambiguous { count: 2, .. })
        ));
        assert!(matches!(
            resolve_prefix("task", ids.into_iter(), "q"),
            Err(IdLookupError::NotFound { .. })
        ));
        assert!(resolve_prefix("task", ids.into_iter(), "").is_err());
    }

    #[test]
    fn test_resolve_ids_on_seeded_store() {
        let (store, _) = EntityStore::open(MemoryStore::new(), FixedClock::on(TODAY));
        assert_eq!(store.resolve_task_id("task_2"), Ok("task_2".into()));
        assert!(store.resolve_task_id("task_").is_err());
        assert_eq!(store.resolve_goal_id("goal"), Ok("goal_1".into()));
    }
}
