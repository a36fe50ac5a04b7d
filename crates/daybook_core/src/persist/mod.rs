//! Two-tier persistence for record collections.
//!
//! # Responsibility
//! - Define the tier-agnostic `RecordStore` contract.
//! - Expose the remote SQLite tier, the local JSON fallback tier, and the
//!   fallback chain composing them.
//!
//! # Invariants
//! - Tiers never retain record copies; stores own all in-memory state.
//! - The local tier always writes the whole collection under one key.

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

use crate::db::DbError;

pub mod chain;
pub mod local;
pub mod remote;

pub use chain::FallbackChain;
pub use local::{LocalCollection, LocalStore, CATEGORIES_KEY, ENTRIES_KEY, TASKS_KEY};
pub use remote::{SqliteEntryRepository, SqliteTaskRepository};

pub type PersistResult<T> = Result<T, PersistError>;

/// Persistence tier identity, used for precedence and the last-writer marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Remote,
    Local,
}

impl Display for Tier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// One mutating operation against a collection.
///
/// The remote tier applies these as fine-grained row operations; the local
/// tier ignores the op and overwrites the whole collection from the
/// caller's snapshot.
#[derive(Debug)]
pub enum WriteOp<'a, T> {
    Insert(&'a T),
    Update(&'a T),
    Delete(Uuid),
}

// Manual impls: the derive would demand `T: Copy`, but every variant
// holds only a shared reference or a `Uuid`, so the op is copyable for
// any record type. The chain relies on this to retry a failed remote
// write against the local tier.
impl<T> Clone for WriteOp<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for WriteOp<'_, T> {}

impl<T> WriteOp<'_, T> {
    /// Stable op name for log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Insert(_) => "insert",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }
}

/// Durability contract implemented by each tier for one collection.
pub trait RecordStore<T> {
    /// Loads every record of the collection. A missing backing file or
    /// empty table yields an empty list.
    fn load(&self) -> PersistResult<Vec<T>>;

    /// Applies one mutating operation. `snapshot` is the full in-memory
    /// collection after the mutation.
    fn apply(&self, op: WriteOp<'_, T>, snapshot: &[T]) -> PersistResult<()>;
}

/// Generic persistence error shared by both tiers.
#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Db(DbError),
    Sqlite(rusqlite::Error),
    InvalidData(String),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<DbError> for PersistError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
