use daybook_core::persist::{FallbackChain, LocalCollection, LocalStore, ENTRIES_KEY};
use daybook_core::{EntryFilter, EntrySortKey, JournalStore, Mood, NewEntry};
use std::path::Path;

fn store_in(dir: &Path) -> JournalStore {
    let local = LocalStore::new(dir.to_path_buf());
    let chain =
        FallbackChain::local_only(ENTRIES_KEY, LocalCollection::new(local, ENTRIES_KEY));
    let mut store = JournalStore::new(chain);
    store.load();
    store
}

fn input(content: &str) -> NewEntry {
    NewEntry {
        content: content.to_string(),
        ..NewEntry::default()
    }
}

#[test]
fn add_entry_normalizes_tags_and_content() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(dir.path());

    store.add_entry(NewEntry {
        content: "hello".to_string(),
        tags: vec!["Work".to_string(), "work".to_string()],
        ..NewEntry::default()
    });

    let entry = &store.entries()[0];
    assert_eq!(entry.content, "hello");
    assert_eq!(entry.tags, vec!["work".to_string()]);
    assert!(!entry.is_favorite);
    assert_eq!(entry.created_at, entry.updated_at);
}

#[test]
fn new_entries_are_kept_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(dir.path());

    store.add_entry(input("first"));
    store.add_entry(input("second"));

    assert_eq!(store.entries()[0].content, "second");
    assert_eq!(store.entries()[1].content, "first");
}

#[test]
fn favorites_filter_returns_a_subset_of_all() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(dir.path());

    store.add_entry(input("plain one"));
    store.add_entry(input("starred"));
    let starred_id = store.entries()[0].id;
    store.toggle_favorite(starred_id);

    store.set_filter(EntryFilter::All);
    let all = store.filtered_entries();

    store.set_filter(EntryFilter::Favorites);
    let favorites = store.filtered_entries();

    assert!(favorites.len() <= all.len());
    for entry in &favorites {
        assert!(entry.is_favorite);
        assert!(all.iter().any(|e| e.id == entry.id));
    }
    assert_eq!(favorites.len(), 1);
}

#[test]
fn toggle_favorite_is_inverse_and_refreshes_updated_at() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(dir.path());
    store.add_entry(input("flip"));

    let before = store.entries()[0].clone();
    store.toggle_favorite(before.id);

    let flipped = store.entries()[0].clone();
    assert!(flipped.is_favorite);
    assert_eq!(flipped.created_at, before.created_at);
    assert!(flipped.updated_at >= before.updated_at);

    store.toggle_favorite(before.id);
    assert!(!store.entries()[0].is_favorite);
}

#[test]
fn update_and_delete_unknown_id_are_no_ops() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(dir.path());
    store.add_entry(input("keep me"));

    let stranger = uuid::Uuid::new_v4();
    store.delete_entry(stranger);
    store.toggle_favorite(stranger);

    assert_eq!(store.entries().len(), 1);
    assert_eq!(store.entries()[0].content, "keep me");
}

#[test]
fn entry_stats_counts_moods_and_collects_tags() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(dir.path());

    store.add_entry(NewEntry {
        content: "sunny".to_string(),
        mood: Some(Mood::Happy),
        tags: vec!["Weather".to_string()],
        ..NewEntry::default()
    });
    store.add_entry(NewEntry {
        content: "productive".to_string(),
        mood: Some(Mood::Happy),
        tags: vec!["work".to_string(), "weather".to_string()],
        ..NewEntry::default()
    });
    store.add_entry(NewEntry {
        content: "quiet evening".to_string(),
        mood: Some(Mood::Calm),
        ..NewEntry::default()
    });
    store.add_entry(input("no mood"));

    let stats = store.entry_stats();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.with_mood, 3);
    assert_eq!(stats.tagged, 2);
    assert_eq!(stats.favorites, 0);
    assert_eq!(stats.mood_distribution.get(&Mood::Happy), Some(&2));
    assert_eq!(stats.mood_distribution.get(&Mood::Calm), Some(&1));
    assert_eq!(stats.mood_distribution.get(&Mood::Stressed), None);

    // Entries are stored newest first, so "productive" tags come first.
    assert_eq!(stats.tags, vec!["work".to_string(), "weather".to_string()]);
}

#[test]
fn title_sort_uses_content_prefix_for_untitled_entries() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(dir.path());

    store.add_entry(NewEntry {
        title: Some("Zebra".to_string()),
        content: "aaa".to_string(),
        ..NewEntry::default()
    });
    store.add_entry(input("Antelope diary"));

    store.set_sort(EntrySortKey::Title);
    let sorted = store.filtered_entries();
    assert_eq!(sorted[0].content, "Antelope diary");
    assert_eq!(sorted[1].title.as_deref(), Some("Zebra"));
}

#[test]
fn state_survives_reload_from_local_tier() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut store = store_in(dir.path());
        store.add_entry(NewEntry {
            content: "durable".to_string(),
            mood: Some(Mood::Focused),
            tags: vec!["Log".to_string()],
            ..NewEntry::default()
        });
    }

    let reloaded = store_in(dir.path());
    assert_eq!(reloaded.entries().len(), 1);
    let entry = &reloaded.entries()[0];
    assert_eq!(entry.content, "durable");
    assert_eq!(entry.mood, Some(Mood::Focused));
    assert_eq!(entry.tags, vec!["log".to_string()]);
}

#[test]
fn filtered_entries_is_idempotent_between_mutations() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(dir.path());
    store.add_entry(input("alpha"));
    store.add_entry(input("beta"));
    store.set_search("a");

    assert_eq!(store.filtered_entries(), store.filtered_entries());
}
