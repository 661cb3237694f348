//! Persisted session storage
//!
//! The session token and username survive restarts. Every change to the
//! in-memory session is mirrored here by the session module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::{ClientError, ClientResult};

/// What is written to persistent storage: the `token` and `username` keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl PersistedSession {
    pub fn new(token: impl Into<String>, username: Option<String>) -> Self {
        Self {
            token: Some(token.into()),
            username,
        }
    }
}

/// Key/value persistence for the session
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the persisted session; an absent store yields an empty session
    async fn load(&self) -> ClientResult<PersistedSession>;

    async fn save(&self, session: &PersistedSession) -> ClientResult<()>;

    async fn clear(&self) -> ClientResult<()>;
}

/// Session persisted as a TOML file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> ClientResult<PersistedSession> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No persisted session at {}", self.path.display());
                return Ok(PersistedSession::default());
            }
            Err(e) => return Err(e.into()),
        };

        toml::from_str(&content)
            .map_err(|e| ClientError::storage(format!("Invalid session file: {}", e)))
    }

    async fn save(&self, session: &PersistedSession) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = toml::to_string_pretty(session)
            .map_err(|e| ClientError::storage(format!("Failed to serialize session: {}", e)))?;

        fs::write(&self.path, content).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and embedders that manage persistence themselves
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<PersistedSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: PersistedSession) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    /// Snapshot of what is currently persisted
    pub async fn current(&self) -> PersistedSession {
        self.session.lock().await.clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> ClientResult<PersistedSession> {
        Ok(self.current().await)
    }

    async fn save(&self, session: &PersistedSession) -> ClientResult<()> {
        *self.session.lock().await = session.clone();
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        *self.session.lock().await = PersistedSession::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.toml"));

        assert_eq!(store.load().await.unwrap(), PersistedSession::default());

        let session = PersistedSession::new("abc.def", Some("alice".to_string()));
        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), session);

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("token = \"abc.def\""));
        assert!(content.contains("username = \"alice\""));

        store.clear().await.unwrap();
        assert!(!store.path().exists());
        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_store_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.toml"));
        store
            .save(&PersistedSession::new("secret", None))
            .await
            .unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_file_store_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "token = [unterminated").unwrap();

        let result = FileSessionStore::new(path).load().await;
        assert!(matches!(result, Err(ClientError::Storage(_))));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemorySessionStore::with_session(PersistedSession::new("t", None));
        assert_eq!(store.load().await.unwrap().token.as_deref(), Some("t"));

        store.clear().await.unwrap();
        assert_eq!(store.current().await, PersistedSession::default());
    }
}
