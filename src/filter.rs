// Category filtering and task counts

use crate::models::{Category, Task};
use eyre::Result;
use std::fmt;
use std::str::FromStr;

/// Selects either every task or the tasks of one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Category(Category),
}

impl Filter {
    /// Whether `task` belongs to this filter's view
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Category(category) => task.category == category,
        }
    }
}

impl From<Category> for Filter {
    fn from(category: Category) -> Self {
        Filter::Category(category)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("all"),
            Filter::Category(category) => write!(f, "{}", category),
        }
    }
}

impl FromStr for Filter {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Filter::All);
        }
        Ok(Filter::Category(s.parse()?))
    }
}

/// Totals for a filtered view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskCounts {
    pub fn from_tasks<'a, I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut total = 0;
        let mut completed = 0;
        for task in tasks {
            total += 1;
            if task.completed {
                completed += 1;
            }
        }

        Self {
            total,
            completed,
            pending: total - completed,
        }
    }

    /// Status line text, e.g. `"3 tasks (1 completed, 2 pending)"` or `"1 work task"`
    pub fn label(&self, filter: Filter) -> String {
        let plural = if self.total == 1 { "" } else { "s" };
        let mut label = match filter {
            Filter::All => format!("{} task{}", self.total, plural),
            Filter::Category(category) => format!("{} {} task{}", self.total, category, plural),
        };

        if self.completed > 0 {
            label.push_str(&format!(" ({} completed, {} pending)", self.completed, self.pending));
        }

        label
    }
}
