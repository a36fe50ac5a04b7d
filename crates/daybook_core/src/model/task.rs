//! Task domain model and category registry constants.
//!
//! # Responsibility
//! - Define the `Task` record and its `Priority` scale.
//! - Seed the category registry and default unset categories.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `category` is never empty; an omitted category defaults to
//!   [`DEFAULT_CATEGORY`].
//! - `created_at` is set once at creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Categories every fresh registry starts with.
pub const SEED_CATEGORIES: [&str; 5] = ["Work", "Personal", "Health", "Education", "Shopping"];

/// Category assigned when task input omits one.
pub const DEFAULT_CATEGORY: &str = "Personal";

/// Task urgency scale. Sorting ranks `High` before `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Numeric rank used by priority sorting (higher sorts first).
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

/// A user-created to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable id assigned at creation.
    pub id: TaskId,
    /// Non-empty display title. Emptiness is a caller precondition.
    pub title: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Always non-empty; unseen values grow the category registry.
    pub category: String,
    pub priority: Priority,
    /// Absent means "no deadline".
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Caller input for creating a task. Identity and lifecycle fields are
/// assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    /// `None` or blank falls back to [`DEFAULT_CATEGORY`].
    pub category: Option<String>,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Task {
    /// Builds a task from caller input at `now`.
    ///
    /// # Contract
    /// - Assigns a fresh id and `created_at = now`.
    /// - `completed` starts `false`.
    /// - Blank or missing category becomes [`DEFAULT_CATEGORY`].
    pub fn from_input(input: NewTask, now: DateTime<Utc>) -> Self {
        let category = match input.category {
            Some(value) if !value.trim().is_empty() => value,
            _ => DEFAULT_CATEGORY.to_string(),
        };
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            category,
            priority: input.priority,
            due_date: input.due_date,
            completed: false,
            created_at: now,
        }
    }

    /// Whether the task is past its deadline and still open at `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }
}
