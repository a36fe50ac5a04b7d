//! Local key-value fallback tier backed by JSON files.
//!
//! # Responsibility
//! - Persist one serialized array per fixed collection key.
//! - Keep writes atomic (temp file + rename) so readers never observe a
//!   partial collection.
//!
//! # Invariants
//! - Every successful save overwrites the entire collection file.
//! - A missing file reads back as an empty collection, never an error.

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::marker::PhantomData;
use std::path::PathBuf;

use super::{PersistResult, RecordStore, WriteOp};

/// Fixed key for the task collection file.
pub const TASKS_KEY: &str = "tasks";
/// Fixed key for the journal entry collection file.
pub const ENTRIES_KEY: &str = "journal_entries";
/// Fixed key for the category registry file (task store only).
pub const CATEGORIES_KEY: &str = "categories";

/// Directory of per-collection JSON files.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of the file holding `key`.
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Reads the whole array stored under `key`. Missing file means empty.
    pub fn read_key<T: DeserializeOwned>(&self, key: &str) -> PersistResult<Vec<T>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path)?;
        let records = serde_json::from_str(&contents)?;
        Ok(records)
    }

    /// Overwrites the whole array stored under `key`.
    ///
    /// Writes to a temp file first and renames into place, so a crash
    /// mid-write leaves the previous contents intact.
    pub fn write_key<T: Serialize>(&self, key: &str, records: &[T]) -> PersistResult<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.key_path(key);
        let temp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(records)?;

        let mut file = File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        debug!(
            "event=local_write module=persist status=ok key={key} records={}",
            records.len()
        );
        Ok(())
    }
}

/// One collection bound to a fixed key in a [`LocalStore`].
#[derive(Debug, Clone)]
pub struct LocalCollection<T> {
    store: LocalStore,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> LocalCollection<T> {
    pub fn new(store: LocalStore, key: &'static str) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }
}

impl<T> RecordStore<T> for LocalCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> PersistResult<Vec<T>> {
        self.store.read_key(self.key)
    }

    fn apply(&self, _op: WriteOp<'_, T>, snapshot: &[T]) -> PersistResult<()> {
        // Local tier has no row granularity: every op is a whole-collection
        // overwrite from the caller's snapshot.
        self.store.write_key(self.key, snapshot)
    }
}
