//! Journal store: collection ownership, CRUD, derived views, statistics.
//!
//! # Responsibility
//! - Own the journal entry collection (newest entries kept first).
//! - Apply the search -> filter -> sort pipeline as pure projections.
//! - Aggregate entry statistics on demand.
//!
//! # Invariants
//! - `updated_at` is refreshed on every mutation; `created_at` never is.
//! - Tags stay lowercase and deduplicated through updates.
//! - Unknown ids on update/delete/toggle are silent no-ops.

use chrono::Utc;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::model::entry::{
    normalize_tags, normalize_title, EntryId, JournalEntry, Mood, NewEntry,
};
use crate::persist::{FallbackChain, Tier, WriteOp};

/// Categorical filter over the entry collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryFilter {
    #[default]
    All,
    Favorites,
    /// Entries that carry a mood.
    #[serde(rename = "mood")]
    WithMood,
    /// Entries with at least one tag.
    Tagged,
}

/// Active sort key for [`JournalStore::filtered_entries`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySortKey {
    /// Newest `created_at` first (default).
    #[default]
    Recent,
    Oldest,
    /// Newest `updated_at` first.
    Updated,
    /// Lexicographic by title, falling back to a content prefix.
    Title,
}

/// Aggregate statistics over the whole entry collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryStats {
    pub total: usize,
    pub favorites: usize,
    pub tagged: usize,
    pub with_mood: usize,
    /// Distinct tags in first-appearance order.
    pub tags: Vec<String>,
    pub mood_distribution: BTreeMap<Mood, usize>,
}

/// Owner of the journal entry collection.
pub struct JournalStore {
    entries: Vec<JournalEntry>,
    filter: EntryFilter,
    sort_by: EntrySortKey,
    search_query: String,
    loading: bool,
    last_error: Option<String>,
    chain: FallbackChain<JournalEntry>,
}

impl JournalStore {
    pub fn new(chain: FallbackChain<JournalEntry>) -> Self {
        Self {
            entries: Vec::new(),
            filter: EntryFilter::default(),
            sort_by: EntrySortKey::default(),
            search_query: String::new(),
            loading: false,
            last_error: None,
            chain,
        }
    }

    /// Hydrates the collection from persistence. Failure to reach even the
    /// local tier sets the store error flag; it never propagates.
    pub fn load(&mut self) {
        self.loading = true;
        self.last_error = None;

        match self.chain.load() {
            Ok(entries) => {
                info!(
                    "event=store_load module=journal_store status=ok records={}",
                    entries.len()
                );
                self.entries = entries;
            }
            Err(err) => {
                error!("event=store_load module=journal_store status=error error={err}");
                self.last_error = Some("failed to load entries".to_string());
            }
        }

        self.loading = false;
    }

    // -- mutations ---------------------------------------------------------

    /// Adds an entry from caller input. Non-empty trimmed `content` is a
    /// caller precondition enforced at the UI boundary.
    pub fn add_entry(&mut self, input: NewEntry) {
        let entry = JournalEntry::from_input(input, Utc::now());
        self.entries.insert(0, entry.clone());
        self.chain.persist(WriteOp::Insert(&entry), &self.entries);
    }

    /// Replaces the stored entry, renormalizing text fields and refreshing
    /// `updated_at`. Silent no-op when the id is unknown.
    pub fn update_entry(&mut self, entry: JournalEntry) {
        let Some(position) = self.entries.iter().position(|e| e.id == entry.id) else {
            return;
        };
        let updated = JournalEntry {
            title: normalize_title(entry.title),
            content: entry.content.trim().to_string(),
            tags: normalize_tags(&entry.tags),
            updated_at: Utc::now(),
            ..entry
        };
        self.entries[position] = updated.clone();
        self.chain.persist(WriteOp::Update(&updated), &self.entries);
    }

    /// Removes the matching entry. Silent no-op when the id is unknown.
    pub fn delete_entry(&mut self, id: EntryId) {
        let Some(position) = self.entries.iter().position(|e| e.id == id) else {
            return;
        };
        self.entries.remove(position);
        self.chain.persist(WriteOp::Delete(id), &self.entries);
    }

    /// Flips the favorite flag via [`Self::update_entry`]. Silent no-op
    /// when the id is unknown.
    pub fn toggle_favorite(&mut self, id: EntryId) {
        let Some(entry) = self.entries.iter().find(|e| e.id == id) else {
            return;
        };
        let mut toggled = entry.clone();
        toggled.is_favorite = !toggled.is_favorite;
        self.update_entry(toggled);
    }

    pub fn set_filter(&mut self, filter: EntryFilter) {
        self.filter = filter;
    }

    pub fn set_sort(&mut self, sort_by: EntrySortKey) {
        self.sort_by = sort_by;
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    // -- derived views -----------------------------------------------------

    /// Search -> filter -> sort projection of the collection.
    pub fn filtered_entries(&self) -> Vec<JournalEntry> {
        project_entries(&self.entries, &self.search_query, self.filter, self.sort_by)
    }

    /// Aggregates over the whole collection, recomputed on every call.
    pub fn entry_stats(&self) -> EntryStats {
        let mut stats = EntryStats {
            total: self.entries.len(),
            ..EntryStats::default()
        };

        for entry in &self.entries {
            if entry.is_favorite {
                stats.favorites += 1;
            }
            if !entry.tags.is_empty() {
                stats.tagged += 1;
            }
            if let Some(mood) = entry.mood {
                stats.with_mood += 1;
                *stats.mood_distribution.entry(mood).or_insert(0) += 1;
            }
            for tag in &entry.tags {
                if !stats.tags.contains(tag) {
                    stats.tags.push(tag.clone());
                }
            }
        }

        stats
    }

    // -- exposed state -----------------------------------------------------

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn filter(&self) -> EntryFilter {
        self.filter
    }

    pub fn sort_by(&self) -> EntrySortKey {
        self.sort_by
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Non-fatal hydration failure message for inline display.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Tier that last persisted the entry collection this session.
    pub fn last_writer(&self) -> Option<Tier> {
        self.chain.last_writer()
    }
}

/// Pure projection pipeline shared by [`JournalStore::filtered_entries`].
fn project_entries(
    entries: &[JournalEntry],
    search_query: &str,
    filter: EntryFilter,
    sort_by: EntrySortKey,
) -> Vec<JournalEntry> {
    let query = search_query.trim().to_lowercase();
    let mut projected: Vec<JournalEntry> = entries
        .iter()
        .filter(|entry| query.is_empty() || matches_search(entry, &query))
        .filter(|entry| matches_filter(entry, filter))
        .cloned()
        .collect();

    projected.sort_by(|a, b| compare_entries(a, b, sort_by));
    projected
}

fn matches_search(entry: &JournalEntry, query_lower: &str) -> bool {
    entry
        .title
        .as_deref()
        .is_some_and(|t| t.to_lowercase().contains(query_lower))
        || entry.content.to_lowercase().contains(query_lower)
        || entry.tags.iter().any(|tag| tag.contains(query_lower))
}

fn matches_filter(entry: &JournalEntry, filter: EntryFilter) -> bool {
    match filter {
        EntryFilter::All => true,
        EntryFilter::Favorites => entry.is_favorite,
        EntryFilter::WithMood => entry.mood.is_some(),
        EntryFilter::Tagged => !entry.tags.is_empty(),
    }
}

fn compare_entries(a: &JournalEntry, b: &JournalEntry, sort_by: EntrySortKey) -> Ordering {
    match sort_by {
        EntrySortKey::Recent => b.created_at.cmp(&a.created_at),
        EntrySortKey::Oldest => a.created_at.cmp(&b.created_at),
        EntrySortKey::Updated => b.updated_at.cmp(&a.updated_at),
        EntrySortKey::Title => a.sort_title().cmp(&b.sort_title()),
    }
}
