// tasklist - Local task list manager with persistent state

pub mod clock;
pub mod command;
pub mod config;
pub mod filter;
pub mod models;
pub mod storage;
pub mod store;

// Re-export main types for convenience
pub use clock::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidIds};
pub use command::{Action, Outcome};
pub use config::Config;
pub use filter::{Filter, TaskCounts};
pub use models::{Category, Task, Theme};
pub use storage::{KeyValueStore, MemoryStorage, SqliteStorage};
pub use store::{EditOutcome, TaskStore};
