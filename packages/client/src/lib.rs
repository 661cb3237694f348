//! Taskdeck Client Package
//!
//! Session-aware access to the Taskdeck task API: authentication, a shared
//! task cache, and the mutation path (including kanban moves).

pub mod api;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod scope;
pub mod session;
pub mod storage;
pub mod store;

use std::sync::Arc;

use taskdeck_core::{Analytics, TaskId};
use tracing::debug;

// Re-export commonly used types
pub use config::{ClientConfig, ConfigError};
pub use dispatcher::{MutationDispatcher, SubtaskRef};
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use scope::{ScopedCall, ViewScope};
pub use session::{AuthFailure, Session, SessionHandle, SessionManager, SessionStatus};
pub use storage::{FileSessionStore, MemorySessionStore, PersistedSession, SessionStore};
pub use store::TaskStore;

/// Where the front-end should go after an operation completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigate {
    Login,
    TaskList,
    TaskDetail(TaskId),
}

/// All client components wired to one shared session
#[derive(Clone)]
pub struct TaskdeckClient {
    api: ApiClient,
    session: SessionManager,
    store: TaskStore,
    dispatcher: MutationDispatcher,
}

impl TaskdeckClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let api = ApiClient::new(config, SessionHandle::new(store))?;
        let tasks = TaskStore::new(api.clone());
        let dispatcher = MutationDispatcher::new(api.clone(), tasks.clone());

        debug!("Client configured for {}", config.api_url);

        Ok(Self {
            session: SessionManager::new(api.clone()),
            api,
            store: tasks,
            dispatcher,
        })
    }

    /// Client persisting its session to `config.session_file`
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
        Self::new(config, store)
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.store
    }

    pub fn mutations(&self) -> &MutationDispatcher {
        &self.dispatcher
    }

    /// Restore and validate any persisted session
    pub async fn initialize(&self) -> SessionStatus {
        self.session.initialize().await
    }

    /// End the session and drop every cached task
    pub async fn logout(&self) -> Navigate {
        let next = self.session.logout().await;
        self.store.clear().await;
        next
    }

    /// Server-side aggregate counts by status
    pub async fn fetch_analytics(&self) -> ClientResult<Analytics> {
        self.api.get_json(api::paths::ANALYTICS).await
    }

    /// Use a fixed date for due-date validation
    pub fn with_today(
        mut self,
        today: impl Fn() -> chrono::NaiveDate + Send + Sync + 'static,
    ) -> Self {
        self.dispatcher = self.dispatcher.with_today(today);
        self
    }
}
