//! Journal entry domain model and tag normalization.
//!
//! # Responsibility
//! - Define the `JournalEntry` record and its `Mood` scale.
//! - Normalize caller input: trimmed content, absent-over-empty title,
//!   lowercase deduplicated tags.
//!
//! # Invariants
//! - `content` is never empty after normalization (caller precondition).
//! - `tags` holds lowercase values with no duplicates, in first-appearance
//!   order.
//! - `created_at` is immutable; `updated_at` is refreshed on every mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a journal entry.
pub type EntryId = Uuid;

/// Fixed mood vocabulary for journal entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Excited,
    Calm,
    Focused,
    Stressed,
    Neutral,
}

/// A user-created free-text note with optional mood, tags, and favorite flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: EntryId,
    /// Absent rather than empty: blank input titles are normalized away.
    #[serde(default)]
    pub title: Option<String>,
    /// Non-empty trimmed text. Emptiness is a caller precondition.
    pub content: String,
    #[serde(default)]
    pub mood: Option<Mood>,
    /// Lowercase, deduplicated, first-appearance order.
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller input for creating a journal entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntry {
    pub title: Option<String>,
    pub content: String,
    pub mood: Option<Mood>,
    pub tags: Vec<String>,
}

impl JournalEntry {
    /// Builds an entry from caller input at `now`.
    ///
    /// # Contract
    /// - Assigns a fresh id and `created_at = updated_at = now`.
    /// - Trims `content`, normalizes a blank title to `None`.
    /// - Tags are lowercased and deduplicated, keeping input order.
    /// - `is_favorite` starts `false`.
    pub fn from_input(input: NewEntry, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: normalize_title(input.title),
            content: input.content.trim().to_string(),
            mood: input.mood,
            tags: normalize_tags(&input.tags),
            is_favorite: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Title used for lexicographic sorting: the entry title, or the first
    /// 50 characters of content when no title is set.
    pub fn sort_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => self.content.chars().take(50).collect(),
        }
    }
}

/// Normalizes a possibly-blank title to `None`.
pub fn normalize_title(title: Option<String>) -> Option<String> {
    title.filter(|value| !value.trim().is_empty())
}

/// Normalizes one tag value: trimmed and lowercased, `None` when blank.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates tags, preserving first-appearance order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for tag in tags {
        if let Some(value) = normalize_tag(tag) {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::{normalize_tags, normalize_title, JournalEntry, Mood, NewEntry};
    use chrono::Utc;

    #[test]
    fn from_input_trims_content_and_drops_blank_title() {
        let now = Utc::now();
        let entry = JournalEntry::from_input(
            NewEntry {
                title: Some("  ".to_string()),
                content: "  hello  ".to_string(),
                ..NewEntry::default()
            },
            now,
        );

        assert_eq!(entry.title, None);
        assert_eq!(entry.content, "hello");
        assert!(!entry.is_favorite);
        assert_eq!(entry.created_at, entry.updated_at);
    }

    #[test]
    fn tags_are_lowercased_and_deduplicated_in_input_order() {
        let tags = vec![
            "Work".to_string(),
            "IDEAS".to_string(),
            "work".to_string(),
            "  ".to_string(),
        ];
        assert_eq!(
            normalize_tags(&tags),
            vec!["work".to_string(), "ideas".to_string()]
        );
    }

    #[test]
    fn normalize_title_keeps_non_blank_values() {
        assert_eq!(
            normalize_title(Some("Morning".to_string())),
            Some("Morning".to_string())
        );
        assert_eq!(normalize_title(Some(String::new())), None);
        assert_eq!(normalize_title(None), None);
    }

    #[test]
    fn sort_title_falls_back_to_content_prefix() {
        let now = Utc::now();
        let long_content = "x".repeat(80);
        let entry = JournalEntry::from_input(
            NewEntry {
                content: long_content,
                ..NewEntry::default()
            },
            now,
        );
        assert_eq!(entry.sort_title().chars().count(), 50);

        let titled = JournalEntry::from_input(
            NewEntry {
                title: Some("Named".to_string()),
                content: "body".to_string(),
                ..NewEntry::default()
            },
            now,
        );
        assert_eq!(titled.sort_title(), "Named");
    }

    #[test]
    fn serialization_uses_camel_case_wire_fields() {
        let entry = JournalEntry::from_input(
            NewEntry {
                content: "wire".to_string(),
                mood: Some(Mood::Calm),
                tags: vec!["Work".to_string()],
                ..NewEntry::default()
            },
            Utc::now(),
        );

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["mood"], "calm");
        assert_eq!(json["isFavorite"], false);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());

        let decoded: JournalEntry = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, entry);
    }
}
