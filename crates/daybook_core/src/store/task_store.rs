//! Task store: collection ownership, CRUD, and derived views.
//!
//! # Responsibility
//! - Own the task collection and the category registry.
//! - Apply the search -> status filter -> sort pipeline as pure
//!   projections over a snapshot.
//!
//! # Invariants
//! - The category registry is seeded, ordered, and only ever grows.
//! - Unknown ids on update/delete/toggle are silent no-ops.
//! - All sorts are stable: ties keep input order.

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::model::task::{NewTask, Task, TaskId, SEED_CATEGORIES};
use crate::persist::{FallbackChain, LocalStore, Tier, WriteOp, CATEGORIES_KEY};

/// Status filter over the task collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
    Overdue,
}

/// Active sort key for [`TaskStore::filtered_tasks`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskSortKey {
    #[default]
    DueDate,
    Priority,
    Title,
    Created,
    Category,
}

/// One category bucket produced by [`TaskStore::tasks_by_category`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub category: String,
    pub tasks: Vec<Task>,
}

/// Owner of the task collection and category registry.
pub struct TaskStore {
    tasks: Vec<Task>,
    categories: Vec<String>,
    filter: TaskFilter,
    sort_by: TaskSortKey,
    search_query: String,
    loading: bool,
    last_error: Option<String>,
    chain: FallbackChain<Task>,
    local: LocalStore,
}

impl TaskStore {
    /// Creates an empty store with the seeded category registry.
    ///
    /// `local` is used for the category registry key, which only exists on
    /// the local tier.
    pub fn new(chain: FallbackChain<Task>, local: LocalStore) -> Self {
        Self {
            tasks: Vec::new(),
            categories: SEED_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            filter: TaskFilter::default(),
            sort_by: TaskSortKey::default(),
            search_query: String::new(),
            loading: false,
            last_error: None,
            chain,
            local,
        }
    }

    /// Hydrates the collection and category registry from persistence.
    ///
    /// A failure to reach even the local tier leaves the collection empty
    /// and sets the store error flag; it never panics or propagates.
    pub fn load(&mut self) {
        self.loading = true;
        self.last_error = None;

        match self.chain.load() {
            Ok(tasks) => {
                info!(
                    "event=store_load module=task_store status=ok records={}",
                    tasks.len()
                );
                self.tasks = tasks;
            }
            Err(err) => {
                error!("event=store_load module=task_store status=error error={err}");
                self.last_error = Some("failed to load tasks".to_string());
            }
        }

        match self.local.read_key::<String>(CATEGORIES_KEY) {
            Ok(saved) => {
                for category in saved {
                    if !self.categories.contains(&category) {
                        self.categories.push(category);
                    }
                }
            }
            Err(err) => {
                warn!("event=store_load module=task_store status=warn key=categories error={err}")
            }
        }

        // Registry must stay a superset of every category in use.
        let in_use: Vec<String> = self
            .tasks
            .iter()
            .map(|task| task.category.clone())
            .collect();
        for category in in_use {
            self.register_category(category);
        }

        self.loading = false;
    }

    // -- mutations ---------------------------------------------------------

    /// Adds a task from caller input. Non-empty `title` is a caller
    /// precondition enforced at the UI boundary.
    pub fn add_task(&mut self, input: NewTask) {
        let task = Task::from_input(input, Utc::now());
        self.register_category(task.category.clone());
        self.tasks.push(task.clone());
        self.chain.persist(WriteOp::Insert(&task), &self.tasks);
    }

    /// Replaces the stored record wholesale. Silent no-op when the id is
    /// unknown.
    pub fn update_task(&mut self, task: Task) {
        let Some(position) = self.tasks.iter().position(|t| t.id == task.id) else {
            return;
        };
        self.register_category(task.category.clone());
        self.tasks[position] = task.clone();
        self.chain.persist(WriteOp::Update(&task), &self.tasks);
    }

    /// Removes the matching task. Silent no-op when the id is unknown.
    pub fn delete_task(&mut self, id: TaskId) {
        let Some(position) = self.tasks.iter().position(|t| t.id == id) else {
            return;
        };
        self.tasks.remove(position);
        self.chain.persist(WriteOp::Delete(id), &self.tasks);
    }

    /// Flips the completion flag via [`Self::update_task`]. Silent no-op
    /// when the id is unknown.
    pub fn toggle_task(&mut self, id: TaskId) {
        let Some(task) = self.tasks.iter().find(|t| t.id == id) else {
            return;
        };
        let mut toggled = task.clone();
        toggled.completed = !toggled.completed;
        self.update_task(toggled);
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    pub fn set_sort(&mut self, sort_by: TaskSortKey) {
        self.sort_by = sort_by;
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    // -- derived views -----------------------------------------------------

    /// Search -> status filter -> sort projection of the collection.
    pub fn filtered_tasks(&self) -> Vec<Task> {
        project_tasks(
            &self.tasks,
            &self.search_query,
            self.filter,
            self.sort_by,
            Utc::now(),
        )
    }

    /// All tasks grouped by category in registry order, empty groups
    /// included, due-date ascending (undated last) within each group.
    /// Search and status filter do not apply here.
    pub fn tasks_by_category(&self) -> Vec<CategoryGroup> {
        group_by_category(&self.tasks, &self.categories)
    }

    // -- exposed state -----------------------------------------------------

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    pub fn sort_by(&self) -> TaskSortKey {
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

    /// Tier that last persisted the task collection this session.
    pub fn last_writer(&self) -> Option<Tier> {
        self.chain.last_writer()
    }

    fn register_category(&mut self, category: String) {
        if self.categories.contains(&category) {
            return;
        }
        self.categories.push(category);
        if let Err(err) = self.local.write_key(CATEGORIES_KEY, &self.categories) {
            warn!("event=category_save module=task_store status=error error={err}");
        }
    }
}

/// Pure projection pipeline shared by [`TaskStore::filtered_tasks`].
fn project_tasks(
    tasks: &[Task],
    search_query: &str,
    filter: TaskFilter,
    sort_by: TaskSortKey,
    now: DateTime<Utc>,
) -> Vec<Task> {
    let query = search_query.trim().to_lowercase();
    let mut projected: Vec<Task> = tasks
        .iter()
        .filter(|task| query.is_empty() || matches_search(task, &query))
        .filter(|task| matches_filter(task, filter, now))
        .cloned()
        .collect();

    projected.sort_by(|a, b| compare_tasks(a, b, sort_by));
    projected
}

fn matches_search(task: &Task, query_lower: &str) -> bool {
    task.title.to_lowercase().contains(query_lower)
        || task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(query_lower))
        || task.category.to_lowercase().contains(query_lower)
}

fn matches_filter(task: &Task, filter: TaskFilter, now: DateTime<Utc>) -> bool {
    match filter {
        TaskFilter::All => true,
        TaskFilter::Pending => !task.completed,
        TaskFilter::Completed => task.completed,
        TaskFilter::Overdue => task.is_overdue(now),
    }
}

fn compare_tasks(a: &Task, b: &Task, sort_by: TaskSortKey) -> Ordering {
    match sort_by {
        TaskSortKey::DueDate => due_date_order(a.due_date, b.due_date),
        TaskSortKey::Priority => b.priority.rank().cmp(&a.priority.rank()),
        TaskSortKey::Title => a.title.cmp(&b.title),
        TaskSortKey::Created => b.created_at.cmp(&a.created_at),
        TaskSortKey::Category => a
            .category
            .cmp(&b.category)
            .then_with(|| due_date_order(a.due_date, b.due_date)),
    }
}

/// Due-date ascending with undated tasks after all dated ones.
fn due_date_order(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => left.cmp(&right),
    }
}

fn group_by_category(tasks: &[Task], categories: &[String]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = categories
        .iter()
        .map(|category| CategoryGroup {
            category: category.clone(),
            tasks: Vec::new(),
        })
        .collect();

    for task in tasks {
        match groups.iter_mut().find(|g| g.category == task.category) {
            Some(group) => group.tasks.push(task.clone()),
            // Registry is normally a superset; keep stray categories
            // visible rather than dropping their tasks.
            None => groups.push(CategoryGroup {
                category: task.category.clone(),
                tasks: vec![task.clone()],
            }),
        }
    }

    for group in &mut groups {
        group
            .tasks
            .sort_by(|a, b| due_date_order(a.due_date, b.due_date));
    }

    groups
}
