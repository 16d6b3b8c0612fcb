// Task collection with persistent state in a key-value store

use crate::clock::{Clock, IdGenerator, SystemClock, UuidIds};
use crate::filter::{Filter, TaskCounts};
use crate::models::{Category, Task, Theme};
use crate::storage::{KeyValueStore, TASKS_KEY, THEME_KEY};
use eyre::{Context, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Result of an edit request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The task was changed and persisted
    Updated(Task),
    /// Text was empty after trimming; nothing changed
    Rejected,
    /// No task has the requested id
    NotFound,
}

/// Owns the ordered task collection and keeps it persisted
///
/// Newest tasks sit at the front. Every mutation writes the full collection
/// back to storage under [`TASKS_KEY`] before returning. If that write fails
/// the in-memory change is kept and the error is returned to the caller.
pub struct TaskStore<S, C = SystemClock, G = UuidIds> {
    storage: S,
    clock: C,
    ids: G,
    default_category: Category,
    tasks: Vec<Task>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Open a store on `storage` using wall-clock time and UUIDv7 ids
    pub fn new(storage: S) -> Self {
        Self::open(storage, SystemClock, UuidIds)
    }
}

impl<S, C, G> TaskStore<S, C, G>
where
    S: KeyValueStore,
    C: Clock,
    G: IdGenerator,
{
    /// Open a store and seed it from whatever `storage` already holds
    pub fn open(storage: S, clock: C, ids: G) -> Self {
        let mut store = Self {
            storage,
            clock,
            ids,
            default_category: Category::default(),
            tasks: Vec::new(),
        };
        store.tasks = store.load();
        store
    }

    /// Set the category `add_default` uses
    pub fn with_default_category(mut self, category: Category) -> Self {
        self.default_category = category;
        self
    }

    pub fn default_category(&self) -> Category {
        self.default_category
    }

    /// All tasks, newest first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give back the storage, e.g. to reopen it later
    pub fn into_storage(self) -> S {
        self.storage
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add a task at the front of the collection
    ///
    /// Returns `Ok(None)` without touching anything when `text` is blank.
    pub fn add(&mut self, text: &str, category: Category) -> Result<Option<Task>> {
        let text = text.trim();
        if text.is_empty() {
            debug!("add: rejected empty text");
            return Ok(None);
        }

        let task = Task::new(self.ids.next_id(), text.to_string(), category, self.clock.now());
        debug!(id = %task.id, %category, "add: inserting task");

        self.tasks.insert(0, task.clone());
        self.persist()?;

        Ok(Some(task))
    }

    /// Add a task in the configured default category
    pub fn add_default(&mut self, text: &str) -> Result<Option<Task>> {
        self.add(text, self.default_category)
    }

    /// Replace a task's text and category
    pub fn edit(&mut self, id: &str, text: &str, category: Category) -> Result<EditOutcome> {
        let text = text.trim();
        if text.is_empty() {
            debug!(id, "edit: rejected empty text");
            return Ok(EditOutcome::Rejected);
        }

        let now = self.clock.now();
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(id, "edit: task not found");
            return Ok(EditOutcome::NotFound);
        };

        task.text = text.to_string();
        task.category = category;
        task.updated_at = Some(now);
        let updated = task.clone();

        self.persist()?;
        Ok(EditOutcome::Updated(updated))
    }

    /// Flip a task's completion flag
    ///
    /// Returns `Ok(None)` when no task has `id`.
    pub fn toggle_completion(&mut self, id: &str) -> Result<Option<Task>> {
        let now = self.clock.now();
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(id, "toggle_completion: task not found");
            return Ok(None);
        };

        task.completed = !task.completed;
        task.completed_at = task.completed.then_some(now);
        debug!(id, completed = task.completed, "toggle_completion: flipped");
        let toggled = task.clone();

        self.persist()?;
        Ok(Some(toggled))
    }

    /// Remove a task by id, returning whether one was removed
    ///
    /// The collection is persisted even when nothing matched.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = self.tasks.len() != before;
        debug!(id, removed, "delete");

        self.persist()?;
        Ok(removed)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Tasks selected by `filter`, in collection order
    pub fn filter(&self, filter: Filter) -> Vec<&Task> {
        self.tasks.iter().filter(|task| filter.matches(task)).collect()
    }

    pub fn count(&self, filter: Filter) -> TaskCounts {
        TaskCounts::from_tasks(self.tasks.iter().filter(|task| filter.matches(task)))
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Read the persisted collection
    ///
    /// Missing, unreadable or corrupt data yields an empty collection.
    pub fn load(&self) -> Vec<Task> {
        let raw = match self.storage.get(TASKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No persisted tasks, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = ?e, "Failed to read persisted tasks, starting empty");
                return Vec::new();
            }
        };

        let records: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(error = ?e, "Failed to parse persisted tasks, starting empty");
                return Vec::new();
            }
        };

        let mut tasks = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Task>(record) {
                Ok(task) => tasks.push(task),
                Err(e) => {
                    warn!(index, error = ?e, "Failed to parse task, skipping");
                }
            }
        }

        let tasks = sanitize(tasks);
        info!(count = tasks.len(), "Loaded tasks");
        tasks
    }

    /// Write the full collection to storage
    pub fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.tasks).context("Failed to serialize tasks")?;
        self.storage
            .set(TASKS_KEY, &json)
            .context("Failed to persist tasks")?;

        debug!(count = self.tasks.len(), "Persisted tasks");
        Ok(())
    }

    // ========================================================================
    // Theme
    // ========================================================================

    /// Stored theme preference, `Light` when unset or unrecognized
    pub fn theme(&self) -> Theme {
        match self.storage.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                warn!(error = ?e, "Ignoring stored theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!(error = ?e, "Failed to read theme");
                Theme::default()
            }
        }
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.storage
            .set(THEME_KEY, theme.as_str())
            .context("Failed to persist theme")
    }

    /// Switch between light and dark, returning the new theme
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }
}

/// Restore collection invariants on freshly loaded records
///
/// Blank and duplicate tasks are dropped. `completed` and `completedAt` are
/// made to agree; a completed task with no completion time becomes pending.
fn sanitize(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let mut clean = Vec::with_capacity(tasks.len());

    for mut task in tasks {
        if task.text.trim().is_empty() {
            warn!(id = %task.id, "Dropping task with empty text");
            continue;
        }
        if !seen.insert(task.id.clone()) {
            warn!(id = %task.id, "Dropping task with duplicate id");
            continue;
        }
        if !task.completed && task.completed_at.is_some() {
            warn!(id = %task.id, "Clearing completedAt on pending task");
            task.completed_at = None;
        }
        if task.completed && task.completed_at.is_none() {
            warn!(id = %task.id, "Marking task without completedAt as pending");
            task.completed = false;
        }
        clean.push(task);
    }

    clean
}
