//! State stores owning the task and journal collections.
//!
//! # Responsibility
//! - Expose CRUD, view-parameter setters, and derived-view projections.
//! - Construct both stores once at startup from configuration.
//!
//! # Invariants
//! - Collections are mutated only through store operations.
//! - In-memory state is updated before the persistence attempt; a failed
//!   write never rolls back an in-memory mutation.
//! - Derived views never mutate the underlying collection.

use log::warn;

use crate::config::CoreConfig;
use crate::db::open_db;
use crate::model::entry::JournalEntry;
use crate::model::task::Task;
use crate::persist::{
    FallbackChain, LocalCollection, LocalStore, RecordStore, SqliteEntryRepository,
    SqliteTaskRepository, ENTRIES_KEY, TASKS_KEY,
};

pub mod journal_store;
pub mod task_store;

pub use journal_store::{EntryFilter, EntrySortKey, EntryStats, JournalStore};
pub use task_store::{CategoryGroup, TaskFilter, TaskSortKey, TaskStore};

/// Builds both stores from configuration and hydrates them.
///
/// The SQLite tier is attached only when `remote_db` is configured and
/// opens cleanly; otherwise both chains run local-only with a warning.
/// Hydration failures are recorded on the store error flag, never
/// returned; startup is non-fatal.
pub fn open_stores(config: &CoreConfig) -> (TaskStore, JournalStore) {
    let local = LocalStore::new(config.data_dir.clone());

    let (task_remote, entry_remote) = match &config.remote_db {
        Some(path) => match (open_db(path), open_db(path)) {
            (Ok(task_conn), Ok(entry_conn)) => {
                let tasks: Box<dyn RecordStore<Task>> =
                    Box::new(SqliteTaskRepository::new(task_conn));
                let entries: Box<dyn RecordStore<JournalEntry>> =
                    Box::new(SqliteEntryRepository::new(entry_conn));
                (Some(tasks), Some(entries))
            }
            (first, second) => {
                let err = first.err().or(second.err());
                warn!(
                    "event=remote_open module=store status=error path={} error={}",
                    path.display(),
                    err.map(|e| e.to_string()).unwrap_or_default()
                );
                (None, None)
            }
        },
        None => (None, None),
    };

    let task_chain = FallbackChain::new(
        TASKS_KEY,
        task_remote,
        LocalCollection::new(local.clone(), TASKS_KEY),
    );
    let entry_chain = FallbackChain::new(
        ENTRIES_KEY,
        entry_remote,
        LocalCollection::new(local.clone(), ENTRIES_KEY),
    );

    let mut task_store = TaskStore::new(task_chain, local);
    let mut journal_store = JournalStore::new(entry_chain);
    task_store.load();
    journal_store.load();

    (task_store, journal_store)
}
