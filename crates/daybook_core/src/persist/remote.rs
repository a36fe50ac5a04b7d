//! Remote structured tier backed by SQLite row collections.
//!
//! # Responsibility
//! - Apply fine-grained row operations for tasks and journal entries.
//! - Own the bidirectional field mapping between in-memory camelCase
//!   records and snake_case columns (`is_favorite`, `created_at`,
//!   `updated_at`, `due_date`).
//!
//! # Invariants
//! - Enum values are stored as their lowercase wire names.
//! - Entry `tags` are stored as one JSON array column; the schema stays
//!   one row collection per entity.
//! - Updating or deleting a missing row is a silent no-op; existence is
//!   guaranteed by the owning store.

use log::debug;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::model::entry::{JournalEntry, Mood};
use crate::model::task::{Priority, Task};

use super::{PersistError, PersistResult, RecordStore, WriteOp};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    category,
    priority,
    due_date,
    completed,
    created_at
FROM tasks";

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    mood,
    tags,
    is_favorite,
    created_at,
    updated_at
FROM journal_entries";

/// SQLite-backed task collection.
pub struct SqliteTaskRepository {
    conn: Connection,
}

impl SqliteTaskRepository {
    /// Wraps a migrated connection (see [`crate::db::open_db`]).
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl RecordStore<Task> for SqliteTaskRepository {
    fn load(&self) -> PersistResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn apply(&self, op: WriteOp<'_, Task>, _snapshot: &[Task]) -> PersistResult<()> {
        match op {
            WriteOp::Insert(task) => {
                self.conn.execute(
                    "INSERT INTO tasks (
                        id, title, description, category, priority,
                        due_date, completed, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                    params![
                        task.id.to_string(),
                        task.title.as_str(),
                        task.description.as_deref(),
                        task.category.as_str(),
                        priority_to_db(task.priority),
                        task.due_date,
                        task.completed,
                        task.created_at,
                    ],
                )?;
            }
            WriteOp::Update(task) => {
                let changed = self.conn.execute(
                    "UPDATE tasks
                     SET
                        title = ?2,
                        description = ?3,
                        category = ?4,
                        priority = ?5,
                        due_date = ?6,
                        completed = ?7
                     WHERE id = ?1;",
                    params![
                        task.id.to_string(),
                        task.title.as_str(),
                        task.description.as_deref(),
                        task.category.as_str(),
                        priority_to_db(task.priority),
                        task.due_date,
                        task.completed,
                    ],
                )?;
                log_row_miss("tasks", "update", task.id, changed);
            }
            WriteOp::Delete(id) => {
                let changed = self
                    .conn
                    .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
                log_row_miss("tasks", "delete", id, changed);
            }
        }
        Ok(())
    }
}

/// SQLite-backed journal entry collection.
pub struct SqliteEntryRepository {
    conn: Connection,
}

impl SqliteEntryRepository {
    /// Wraps a migrated connection (see [`crate::db::open_db`]).
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl RecordStore<JournalEntry> for SqliteEntryRepository {
    fn load(&self) -> PersistResult<Vec<JournalEntry>> {
        // Newest first, matching the store's prepend-on-add ordering.
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL} ORDER BY created_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }

    fn apply(&self, op: WriteOp<'_, JournalEntry>, _snapshot: &[JournalEntry]) -> PersistResult<()> {
        match op {
            WriteOp::Insert(entry) => {
                self.conn.execute(
                    "INSERT INTO journal_entries (
                        id, title, content, mood, tags,
                        is_favorite, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                    params![
                        entry.id.to_string(),
                        entry.title.as_deref(),
                        entry.content.as_str(),
                        entry.mood.map(mood_to_db),
                        serde_json::to_string(&entry.tags)?,
                        entry.is_favorite,
                        entry.created_at,
                        entry.updated_at,
                    ],
                )?;
            }
            WriteOp::Update(entry) => {
                let changed = self.conn.execute(
                    "UPDATE journal_entries
                     SET
                        title = ?2,
                        content = ?3,
                        mood = ?4,
                        tags = ?5,
                        is_favorite = ?6,
                        updated_at = ?7
                     WHERE id = ?1;",
                    params![
                        entry.id.to_string(),
                        entry.title.as_deref(),
                        entry.content.as_str(),
                        entry.mood.map(mood_to_db),
                        serde_json::to_string(&entry.tags)?,
                        entry.is_favorite,
                        entry.updated_at,
                    ],
                )?;
                log_row_miss("journal_entries", "update", entry.id, changed);
            }
            WriteOp::Delete(id) => {
                let changed = self.conn.execute(
                    "DELETE FROM journal_entries WHERE id = ?1;",
                    [id.to_string()],
                )?;
                log_row_miss("journal_entries", "delete", id, changed);
            }
        }
        Ok(())
    }
}

fn log_row_miss(table: &str, op: &str, id: Uuid, changed: usize) {
    if changed == 0 {
        debug!("event=row_miss module=persist status=noop table={table} op={op} id={id}");
    }
}

fn parse_task_row(row: &Row<'_>) -> PersistResult<Task> {
    let id_text: String = row.get("id")?;
    let priority_text: String = row.get("priority")?;
    Ok(Task {
        id: parse_uuid(&id_text, "tasks.id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        category: row.get("category")?,
        priority: parse_priority(&priority_text)?,
        due_date: row.get("due_date")?,
        completed: row.get("completed")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_entry_row(row: &Row<'_>) -> PersistResult<JournalEntry> {
    let id_text: String = row.get("id")?;
    let tags_text: String = row.get("tags")?;
    let tags = serde_json::from_str(&tags_text).map_err(|_| {
        PersistError::InvalidData(format!(
            "invalid tags value `{tags_text}` in journal_entries.tags"
        ))
    })?;
    let mood = match row.get::<_, Option<String>>("mood")? {
        Some(value) => Some(parse_mood(&value)?),
        None => None,
    };
    Ok(JournalEntry {
        id: parse_uuid(&id_text, "journal_entries.id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        mood,
        tags,
        is_favorite: row.get("is_favorite")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_uuid(value: &str, column: &str) -> PersistResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| PersistError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn priority_to_db(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
    }
}

fn parse_priority(value: &str) -> PersistResult<Priority> {
    match value {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        other => Err(PersistError::InvalidData(format!(
            "invalid priority value `{other}` in tasks.priority"
        ))),
    }
}

fn mood_to_db(mood: Mood) -> &'static str {
    match mood {
        Mood::Happy => "happy",
        Mood::Excited => "excited",
        Mood::Calm => "calm",
        Mood::Focused => "focused",
        Mood::Stressed => "stressed",
        Mood::Neutral => "neutral",
    }
}

fn parse_mood(value: &str) -> PersistResult<Mood> {
    match value {
        "happy" => Ok(Mood::Happy),
        "excited" => Ok(Mood::Excited),
        "calm" => Ok(Mood::Calm),
        "focused" => Ok(Mood::Focused),
        "stressed" => Ok(Mood::Stressed),
        "neutral" => Ok(Mood::Neutral),
        other => Err(PersistError::InvalidData(format!(
            "invalid mood value `{other}` in journal_entries.mood"
        ))),
    }
}
