//! Task mutations and their reconciliation with the task store.
//!
//! Writes are never applied to the store ahead of the server. After a
//! successful write the affected task (or, for board moves, the whole list)
//! is refetched, so the store only ever shows acknowledged state.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use taskdeck_core::{
    validate_comment_text, validate_subtask_title, validate_task_edit, validate_task_input,
    SubtaskId, Task, TaskId, TaskInput, TaskPatch, TaskStatus,
};
use tracing::{debug, info};

use crate::{
    api::{paths, NewComment, NewSubtask, SubtaskUpdate},
    error::{ClientError, ClientResult},
    http::ApiClient,
    store::TaskStore,
    Navigate,
};

/// How a subtask is addressed: by server id, or by position in the cached task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtaskRef {
    Id(SubtaskId),
    Index(usize),
}

type Today = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Clone)]
pub struct MutationDispatcher {
    api: ApiClient,
    store: TaskStore,
    today: Today,
}

impl MutationDispatcher {
    pub fn new(api: ApiClient, store: TaskStore) -> Self {
        Self {
            api,
            store,
            today: Arc::new(|| Local::now().date_naive()),
        }
    }

    /// Override the date used for due-date validation
    pub fn with_today(mut self, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.today = Arc::new(today);
        self
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Validate and submit a new task. Validation failures never reach the network.
    pub async fn create_task(&self, input: &TaskInput) -> ClientResult<Navigate> {
        let errors = validate_task_input(input, (self.today)());
        if !errors.is_empty() {
            debug!("Rejected new task with {} validation errors", errors.len());
            return Err(ClientError::Validation(errors));
        }

        let generation = self.api.session().generation().await;
        let created: Task = self.api.post_json(paths::TASKS, input).await?;
        info!("Created task {}", created.id);

        let id = created.id;
        self.store.insert(generation, created).await;
        Ok(Navigate::TaskDetail(id))
    }

    /// Send the cached task with `patch` applied as a full replacement, then refetch it
    pub async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> ClientResult<Task> {
        let current = self.store.get_or_load(id).await?;
        let updated = current.patched(patch);

        let errors = validate_task_edit(&updated);
        if !errors.is_empty() {
            return Err(ClientError::Validation(errors));
        }

        self.api.put(&paths::task(id), &updated).await?;
        info!("Updated task {}", id);

        self.store.load_one(id).await
    }

    pub async fn delete_task(&self, id: TaskId) -> ClientResult<Navigate> {
        let generation = self.api.session().generation().await;
        self.api.delete(&paths::task(id)).await?;
        info!("Deleted task {}", id);

        self.store.remove(generation, id).await;
        Ok(Navigate::TaskList)
    }

    /// Board drop: issue the status change, then reload the whole list.
    ///
    /// The task changes column only once the reload lands; nothing is
    /// rendered optimistically.
    pub async fn move_task(&self, id: TaskId, status: TaskStatus) -> ClientResult<Vec<Task>> {
        let current = self.store.get_or_load(id).await?;
        if current.status == status {
            debug!("Task {} already in {}", id, status);
        }

        let moved = current.patched(&TaskPatch::status(status));
        self.api.put(&paths::task(id), &moved).await?;
        info!("Moved task {} to {}", id, status);

        self.store.load_all().await
    }

    /// Flip a subtask's completion through the subtask endpoint, then refetch the task.
    ///
    /// `current_completed` is the value the caller displayed; the server is
    /// sent its negation.
    pub async fn toggle_subtask(
        &self,
        task_id: TaskId,
        subtask: SubtaskRef,
        current_completed: bool,
    ) -> ClientResult<Task> {
        let subtask_id = match subtask {
            SubtaskRef::Id(id) => id,
            SubtaskRef::Index(index) => {
                let task = self.store.get_or_load(task_id).await?;
                task.subtasks
                    .get(index)
                    .map(|s| s.id)
                    .ok_or_else(|| {
                        ClientError::NotFound(format!(
                            "Task {} has no subtask at position {}",
                            task_id,
                            index + 1
                        ))
                    })?
            }
        };

        self.api
            .put(
                &paths::subtask(task_id, subtask_id),
                &SubtaskUpdate {
                    completed: !current_completed,
                },
            )
            .await?;
        debug!("Toggled subtask {} of task {}", subtask_id, task_id);

        self.store.load_one(task_id).await
    }

    pub async fn add_subtask(&self, task_id: TaskId, title: &str) -> ClientResult<Task> {
        let errors = validate_subtask_title(title);
        if !errors.is_empty() {
            return Err(ClientError::Validation(errors));
        }

        self.api
            .post(
                &paths::subtasks(task_id),
                &NewSubtask {
                    title: title.trim(),
                    completed: false,
                },
            )
            .await?;
        debug!("Added subtask to task {}", task_id);

        self.store.load_one(task_id).await
    }

    pub async fn add_comment(&self, task_id: TaskId, text: &str) -> ClientResult<Task> {
        let errors = validate_comment_text(text);
        if !errors.is_empty() {
            return Err(ClientError::Validation(errors));
        }

        self.api
            .post(&paths::comments(task_id), &NewComment { text: text.trim() })
            .await?;
        debug!("Added comment to task {}", task_id);

        self.store.load_one(task_id).await
    }
}
