//! Client-side task cache keyed by id
//!
//! List and detail reads populate the same map, so a task fetched for the
//! detail view is the same entry the list view shows.

use std::collections::HashMap;
use std::sync::Arc;

use taskdeck_core::{Task, TaskId};
use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::{debug, warn};

use crate::{
    api::paths,
    error::{ClientError, ClientResult},
    http::ApiClient,
};

#[derive(Debug, Default)]
struct StoreState {
    /// Session generation the cached tasks were fetched under
    generation: u64,
    tasks: HashMap<TaskId, Task>,
    order: Vec<TaskId>,
    error: Option<String>,
}

impl StoreState {
    fn upsert(&mut self, task: Task) {
        if !self.tasks.contains_key(&task.id) {
            self.order.push(task.id);
        }
        self.tasks.insert(task.id, task);
    }

    fn replace_all(&mut self, tasks: Vec<Task>) {
        self.order = tasks.iter().map(|t| t.id).collect();
        self.tasks = tasks.into_iter().map(|t| (t.id, t)).collect();
    }

    fn remove(&mut self, id: TaskId) {
        self.tasks.remove(&id);
        self.order.retain(|existing| *existing != id);
    }

    /// Drop everything cached under another session and adopt `generation`
    fn rebind(&mut self, generation: u64) {
        if self.generation != generation {
            *self = StoreState {
                generation,
                ..StoreState::default()
            };
        }
    }
}

/// Task cache scoped to one session.
///
/// Entries are tagged with the session generation they were fetched under.
/// Once the session ends or changes hands the cache reads as empty, and
/// writes carrying an earlier generation are refused.
#[derive(Clone)]
pub struct TaskStore {
    api: ApiClient,
    state: Arc<RwLock<StoreState>>,
}

impl TaskStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(StoreState::default())),
        }
    }

    /// Write lock on the cache, provided `generation` is still the live session.
    ///
    /// The generation is checked while the lock is held. Data written just as
    /// a logout lands keeps the old tag and reads as empty afterwards.
    async fn write_for(&self, generation: u64) -> Option<RwLockWriteGuard<'_, StoreState>> {
        let mut state = self.state.write().await;
        if !self.api.session().is_current(generation).await {
            return None;
        }
        state.rebind(generation);
        Some(state)
    }

    /// Apply `f` to the cache if it belongs to the live session, else to nothing
    async fn read_live<R: Default>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        let state = self.state.read().await;
        if !self.api.session().is_current(state.generation).await {
            return R::default();
        }
        f(&state)
    }

    /// Fetch the full collection and replace the local one.
    ///
    /// On failure the previous collection is kept and the error is recorded
    /// for display. Overlapping calls resolve last-write-wins; a response that
    /// arrives after the session changed is discarded.
    pub async fn load_all(&self) -> ClientResult<Vec<Task>> {
        let generation = self.api.session().generation().await;

        let result = self.api.get_json::<Vec<Task>>(paths::TASKS).await;

        let Some(mut state) = self.write_for(generation).await else {
            debug!("Discarding task list fetched under an earlier session");
            return Err(result.err().unwrap_or(ClientError::SessionChanged));
        };

        match result {
            Ok(tasks) => {
                debug!("Loaded {} tasks", tasks.len());
                state.replace_all(tasks.clone());
                state.error = None;
                Ok(tasks)
            }
            Err(e) => {
                warn!("Failed to load tasks: {}", e);
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetch one task with its subtasks and comments into the shared map
    pub async fn load_one(&self, id: TaskId) -> ClientResult<Task> {
        let generation = self.api.session().generation().await;

        let result = self.api.get_json::<Task>(&paths::task(id)).await;

        let Some(mut state) = self.write_for(generation).await else {
            debug!("Discarding task {} fetched under an earlier session", id);
            return Err(result.err().unwrap_or(ClientError::SessionChanged));
        };

        match result {
            Ok(task) => {
                state.upsert(task.clone());
                state.error = None;
                Ok(task)
            }
            Err(e) => {
                warn!("Failed to load task {}: {}", id, e);
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Cached task, falling back to a fetch when it is not loaded yet
    pub async fn get_or_load(&self, id: TaskId) -> ClientResult<Task> {
        match self.get(id).await {
            Some(task) => Ok(task),
            None => self.load_one(id).await,
        }
    }

    /// Tasks in the order the server last listed them
    pub async fn tasks(&self) -> Vec<Task> {
        self.read_live(|state| {
            state
                .order
                .iter()
                .filter_map(|id| state.tasks.get(id).cloned())
                .collect::<Vec<_>>()
        })
        .await
    }

    pub async fn get(&self, id: TaskId) -> Option<Task> {
        self.read_live(|state| state.tasks.get(&id).cloned()).await
    }

    pub async fn len(&self) -> usize {
        self.read_live(|state| state.order.len()).await
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Message of the most recent failed read, if it has not been superseded
    pub async fn error(&self) -> Option<String> {
        self.read_live(|state| state.error.clone()).await
    }

    /// Record a task the server acknowledged under session `generation`
    pub(crate) async fn insert(&self, generation: u64, task: Task) {
        match self.write_for(generation).await {
            Some(mut state) => state.upsert(task),
            None => debug!("Not caching task {} from an earlier session", task.id),
        }
    }

    pub(crate) async fn remove(&self, generation: u64, id: TaskId) {
        if let Some(mut state) = self.write_for(generation).await {
            state.remove(id);
        }
    }

    pub async fn clear(&self) {
        *self.state.write().await = StoreState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_core::{Priority, TaskStatus};

    fn task(id: TaskId, title: &str) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            due_date: None,
            subtasks: vec![],
            comments: vec![],
        }
    }

    #[test]
    fn test_replace_all_drops_missing_ids() {
        let mut state = StoreState::default();
        state.replace_all(vec![task(1, "a"), task(2, "b")]);
        state.replace_all(vec![task(2, "b2"), task(3, "c")]);

        assert_eq!(state.order, vec![2, 3]);
        assert!(!state.tasks.contains_key(&1));
        assert_eq!(state.tasks[&2].title, "b2");
    }

    #[test]
    fn test_upsert_keeps_position() {
        let mut state = StoreState::default();
        state.replace_all(vec![task(1, "a"), task(2, "b")]);
        state.upsert(task(1, "a2"));
        state.upsert(task(5, "e"));

        assert_eq!(state.order, vec![1, 2, 5]);
        assert_eq!(state.tasks[&1].title, "a2");
    }

    #[test]
    fn test_rebind_to_new_generation_drops_entries() {
        let mut state = StoreState {
            generation: 3,
            ..StoreState::default()
        };
        state.replace_all(vec![task(1, "a")]);
        state.error = Some("boom".to_string());

        state.rebind(3);
        assert_eq!(state.order, vec![1]);

        state.rebind(5);
        assert_eq!(state.generation, 5);
        assert!(state.tasks.is_empty());
        assert!(state.order.is_empty());
        assert!(state.error.is_none());
    }
}
