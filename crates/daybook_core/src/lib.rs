//! Data layer for Daybook: task tracking, journaling, and derived views.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{EntryId, JournalEntry, Mood, NewEntry};
pub use model::task::{NewTask, Priority, Task, TaskId};
pub use persist::{PersistError, Tier};
pub use store::{
    open_stores, CategoryGroup, EntryFilter, EntrySortKey, EntryStats, JournalStore, TaskFilter,
    TaskSortKey, TaskStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
