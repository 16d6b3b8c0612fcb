// Command interface for presentation layers

use crate::clock::{Clock, IdGenerator};
use crate::models::{Category, Task, Theme};
use crate::storage::KeyValueStore;
use crate::store::{EditOutcome, TaskStore};
use eyre::Result;

/// A user intent the presentation layer forwards to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add { text: String, category: Category },
    Edit { id: String, text: String, category: Category },
    Toggle { id: String },
    Delete { id: String },
    ToggleTheme,
}

/// What happened in response to an [`Action`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(Task),
    Updated(Task),
    Toggled(Task),
    Deleted(String),
    /// Text was empty after trimming
    Rejected,
    NotFound(String),
    Theme(Theme),
}

impl Outcome {
    /// Whether the store's state changed
    pub fn is_change(&self) -> bool {
        !matches!(self, Outcome::Rejected | Outcome::NotFound(_))
    }
}

impl<S, C, G> TaskStore<S, C, G>
where
    S: KeyValueStore,
    C: Clock,
    G: IdGenerator,
{
    /// Apply `action` and report the outcome
    ///
    /// Errors only come from storage; rejections and unknown ids are outcomes.
    pub fn dispatch(&mut self, action: Action) -> Result<Outcome> {
        let outcome = match action {
            Action::Add { text, category } => match self.add(&text, category)? {
                Some(task) => Outcome::Added(task),
                None => Outcome::Rejected,
            },
            Action::Edit { id, text, category } => match self.edit(&id, &text, category)? {
                EditOutcome::Updated(task) => Outcome::Updated(task),
                EditOutcome::Rejected => Outcome::Rejected,
                EditOutcome::NotFound => Outcome::NotFound(id),
            },
            Action::Toggle { id } => match self.toggle_completion(&id)? {
                Some(task) => Outcome::Toggled(task),
                None => Outcome::NotFound(id),
            },
            Action::Delete { id } => {
                if self.delete(&id)? {
                    Outcome::Deleted(id)
                } else {
                    Outcome::NotFound(id)
                }
            }
            Action::ToggleTheme => Outcome::Theme(self.toggle_theme()?),
        };

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedClock, SequentialIds};
    use crate::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};

    fn add(text: &str, category: Category) -> Action {
        Action::Add {
            text: text.to_string(),
            category,
        }
    }

    #[test]
    fn test_dispatch_add_and_reject() {
        let clock = FixedClock::new(Utc.timestamp_opt(1_000, 0).unwrap());
        let mut store = TaskStore::open(MemoryStorage::new(), &clock, SequentialIds::new());

        let outcome = store.dispatch(add("Buy milk", Category::Personal)).unwrap();
        let Outcome::Added(task) = &outcome else {
            panic!("expected Added, got {:?}", outcome);
        };
        assert_eq!(task.id, "task-1");
        assert!(outcome.is_change());

        let outcome = store.dispatch(add("  ", Category::Personal)).unwrap();
        assert_eq!(outcome, Outcome::Rejected);
        assert!(!outcome.is_change());
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn test_dispatch_edit_toggle_delete() {
        let clock = FixedClock::new(Utc.timestamp_opt(1_000, 0).unwrap());
        let mut store = TaskStore::open(MemoryStorage::new(), &clock, SequentialIds::new());
        store.dispatch(add("Report", Category::Work)).unwrap();

        let outcome = store
            .dispatch(Action::Edit {
                id: "task-1".to_string(),
                text: "Quarterly report".to_string(),
                category: Category::Work,
            })
            .unwrap();
        assert!(matches!(outcome, Outcome::Updated(ref t) if t.text == "Quarterly report"));

        let outcome = store
            .dispatch(Action::Toggle {
                id: "task-1".to_string(),
            })
            .unwrap();
        assert!(matches!(outcome, Outcome::Toggled(ref t) if t.completed));

        let outcome = store
            .dispatch(Action::Delete {
                id: "task-1".to_string(),
            })
            .unwrap();
        assert_eq!(outcome, Outcome::Deleted("task-1".to_string()));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_dispatch_unknown_ids() {
        let mut store = TaskStore::new(MemoryStorage::new());

        for action in [
            Action::Edit {
                id: "nope".to_string(),
                text: "x".to_string(),
                category: Category::Other,
            },
            Action::Toggle { id: "nope".to_string() },
            Action::Delete { id: "nope".to_string() },
        ] {
            assert_eq!(store.dispatch(action).unwrap(), Outcome::NotFound("nope".to_string()));
        }
    }

    #[test]
    fn test_dispatch_toggle_theme() {
        let mut store = TaskStore::new(MemoryStorage::new());

        assert_eq!(store.dispatch(Action::ToggleTheme).unwrap(), Outcome::Theme(Theme::Dark));
        assert_eq!(store.dispatch(Action::ToggleTheme).unwrap(), Outcome::Theme(Theme::Light));
    }
}
