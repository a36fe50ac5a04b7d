use chrono::Utc;
use daybook_core::db::open_db;
use daybook_core::persist::{
    FallbackChain, LocalCollection, LocalStore, RecordStore, SqliteEntryRepository,
    SqliteTaskRepository, Tier, WriteOp, TASKS_KEY,
};
use daybook_core::{open_stores, CoreConfig, JournalEntry, Mood, NewEntry, NewTask, Task};
use std::path::Path;

fn task_chain(data_dir: &Path, db_path: &Path) -> FallbackChain<Task> {
    let conn = open_db(db_path).unwrap();
    let remote: Box<dyn RecordStore<Task>> = Box::new(SqliteTaskRepository::new(conn));
    let local = LocalStore::new(data_dir.to_path_buf());
    FallbackChain::new(TASKS_KEY, Some(remote), LocalCollection::new(local, TASKS_KEY))
}

fn sample_task(title: &str) -> Task {
    Task::from_input(
        NewTask {
            title: title.to_string(),
            ..NewTask::default()
        },
        Utc::now(),
    )
}

#[test]
fn remote_tier_is_authoritative_while_healthy() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("daybook.db");
    let mut chain = task_chain(dir.path(), &db_path);

    let task = sample_task("remote first");
    let snapshot = vec![task.clone()];
    chain.persist(WriteOp::Insert(&task), &snapshot);

    assert_eq!(chain.active_tier(), Tier::Remote);
    assert_eq!(chain.last_writer(), Some(Tier::Remote));
    assert_eq!(chain.load().unwrap(), snapshot);

    // The local fallback file is only written once the chain latches.
    assert!(!dir.path().join("tasks.json").exists());
}

#[test]
fn remote_failure_latches_chain_for_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("daybook.db");
    let mut chain = task_chain(dir.path(), &db_path);

    let breaker = rusqlite::Connection::open(&db_path).unwrap();
    breaker.execute_batch("DROP TABLE tasks;").unwrap();

    let task = sample_task("written during outage");
    let snapshot = vec![task.clone()];
    chain.persist(WriteOp::Insert(&task), &snapshot);

    assert_eq!(chain.active_tier(), Tier::Local);
    assert_eq!(chain.last_writer(), Some(Tier::Local));
    assert!(dir.path().join("tasks.json").exists());
    assert_eq!(chain.load().unwrap(), snapshot);

    // The remote tier is not retried even after the table comes back.
    breaker
        .execute_batch(
            "CREATE TABLE tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                category TEXT NOT NULL,
                priority TEXT NOT NULL,
                due_date TEXT,
                completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );",
        )
        .unwrap();
    let second = sample_task("still local");
    let snapshot = vec![task, second.clone()];
    chain.persist(WriteOp::Insert(&second), &snapshot);
    assert_eq!(chain.active_tier(), Tier::Local);
    assert_eq!(chain.load().unwrap(), snapshot);
}

#[test]
fn rows_use_snake_case_columns_and_lowercase_enums() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("daybook.db");

    let task_repo = SqliteTaskRepository::new(open_db(&db_path).unwrap());
    let mut task = sample_task("inspect me");
    task.priority = daybook_core::Priority::High;
    task_repo.apply(WriteOp::Insert(&task), &[task.clone()]).unwrap();

    let entry_repo = SqliteEntryRepository::new(open_db(&db_path).unwrap());
    let mut entry = JournalEntry::from_input(
        NewEntry {
            content: "inspect my columns".to_string(),
            mood: Some(Mood::Happy),
            tags: vec!["Work".to_string()],
            ..NewEntry::default()
        },
        Utc::now(),
    );
    entry.is_favorite = true;
    entry_repo
        .apply(WriteOp::Insert(&entry), &[entry.clone()])
        .unwrap();

    let raw = rusqlite::Connection::open(&db_path).unwrap();
    let priority: String = raw
        .query_row("SELECT priority FROM tasks WHERE id = ?1;", [task.id.to_string()], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(priority, "high");

    let (mood, tags, is_favorite): (String, String, bool) = raw
        .query_row(
            "SELECT mood, tags, is_favorite FROM journal_entries WHERE id = ?1;",
            [entry.id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(mood, "happy");
    assert_eq!(tags, r#"["work"]"#);
    assert!(is_favorite);

    // Round-trip through the repositories preserves the records.
    assert_eq!(task_repo.load().unwrap(), vec![task]);
    assert_eq!(entry_repo.load().unwrap(), vec![entry]);
}

#[test]
fn open_stores_round_trips_through_the_remote_tier() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig {
        data_dir: dir.path().join("data"),
        remote_db: Some(dir.path().join("daybook.db")),
        log_level: None,
    };

    {
        let (mut tasks, mut journal) = open_stores(&config);
        tasks.add_task(NewTask {
            title: "durable task".to_string(),
            ..NewTask::default()
        });
        journal.add_entry(NewEntry {
            content: "durable entry".to_string(),
            ..NewEntry::default()
        });
        assert_eq!(tasks.last_writer(), Some(Tier::Remote));
        assert_eq!(journal.last_writer(), Some(Tier::Remote));
    }

    let (tasks, journal) = open_stores(&config);
    assert_eq!(tasks.tasks().len(), 1);
    assert_eq!(tasks.tasks()[0].title, "durable task");
    assert_eq!(journal.entries().len(), 1);
    assert_eq!(journal.entries()[0].content, "durable entry");
    assert_eq!(tasks.last_error(), None);
    assert_eq!(journal.last_error(), None);
}

#[test]
fn open_stores_with_unopenable_remote_runs_local_only() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig {
        data_dir: dir.path().join("data"),
        // A directory path cannot be opened as a database file.
        remote_db: Some(dir.path().to_path_buf()),
        log_level: None,
    };

    let (mut tasks, journal) = open_stores(&config);
    assert_eq!(tasks.last_error(), None);
    assert_eq!(journal.last_error(), None);

    tasks.add_task(NewTask {
        title: "local fallback".to_string(),
        ..NewTask::default()
    });
    assert_eq!(tasks.last_writer(), Some(Tier::Local));
    assert!(dir.path().join("data").join("tasks.json").exists());
}
