//! Session lifecycle: login, registration, validation of a persisted token, and logout
//!
//! [`SessionHandle`] is the shared session object. It is cloned into every
//! component that issues authenticated requests; only this module writes it.
//! Each change bumps a generation counter so results and 401s belonging to an
//! earlier session can be recognised and ignored.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{watch, RwLock};
use tracing::{debug, error, info, warn};

use crate::{
    api::{paths, AuthRequest, AuthResponse, ValidateResponse},
    error::{ClientError, ClientResult},
    http::ApiClient,
    storage::{PersistedSession, SessionStore},
    Navigate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Initializing,
    Unauthenticated,
    Authenticated,
}

/// The client's belief about whether it holds a valid credential, and for whom
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub username: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("username", &self.username)
            .finish()
    }
}

/// Why a login or registration did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    /// Bad credentials or a server-side refusal, with the message to display
    #[error("{0}")]
    Rejected(String),

    #[error("Network error")]
    Network(String),

    #[error("Could not save session: {0}")]
    Storage(String),
}

struct SessionState {
    session: Session,
    status: SessionStatus,
    generation: u64,
}

/// Shared, process-wide session. Cloning shares the same underlying state.
#[derive(Clone)]
pub struct SessionHandle {
    state: Arc<RwLock<SessionState>>,
    store: Arc<dyn SessionStore>,
    status_tx: Arc<watch::Sender<SessionStatus>>,
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle").finish_non_exhaustive()
    }
}

impl SessionHandle {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (status_tx, _) = watch::channel(SessionStatus::Initializing);
        Self {
            state: Arc::new(RwLock::new(SessionState {
                session: Session::default(),
                status: SessionStatus::Initializing,
                generation: 0,
            })),
            store,
            status_tx: Arc::new(status_tx),
        }
    }

    pub async fn session(&self) -> Session {
        self.state.read().await.session.clone()
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.read().await.status
    }

    pub async fn is_authenticated(&self) -> bool {
        self.status().await == SessionStatus::Authenticated
    }

    pub async fn username(&self) -> Option<String> {
        self.state.read().await.session.username.clone()
    }

    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    /// Whether `generation` still identifies the live session
    pub async fn is_current(&self, generation: u64) -> bool {
        self.generation().await == generation
    }

    /// Watch status transitions
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }

    /// Token and generation to attach to an outgoing request
    pub(crate) async fn credentials(&self) -> Option<(String, u64)> {
        let state = self.state.read().await;
        state
            .session
            .token
            .clone()
            .map(|token| (token, state.generation))
    }

    fn publish(&self, state: &SessionState) {
        self.status_tx.send_replace(state.status);
    }

    /// Seed memory from persistent storage. Returns whether a token was found.
    pub(crate) async fn restore(&self) -> ClientResult<bool> {
        let persisted = self.store.load().await?;
        let mut state = self.state.write().await;
        let found = persisted.token.is_some();
        state.session = Session {
            token: persisted.token,
            username: persisted.username,
        };
        state.generation += 1;
        Ok(found)
    }

    /// Install a fresh session after login or registration
    pub(crate) async fn establish(
        &self,
        token: String,
        username: Option<String>,
    ) -> ClientResult<()> {
        let mut state = self.state.write().await;

        // Persist first: a failed write leaves the previous session in place
        self.store
            .save(&PersistedSession {
                token: Some(token.clone()),
                username: username.clone(),
            })
            .await?;

        state.session = Session {
            token: Some(token),
            username,
        };
        state.status = SessionStatus::Authenticated;
        state.generation += 1;
        self.publish(&state);
        Ok(())
    }

    /// Mark a restored session valid. Returns false if the session changed meanwhile.
    pub(crate) async fn confirm(
        &self,
        generation: u64,
        username: Option<String>,
    ) -> ClientResult<bool> {
        let mut state = self.state.write().await;
        if state.generation != generation || state.session.token.is_none() {
            return Ok(false);
        }

        if let Some(username) = username {
            if state.session.username.as_deref() != Some(username.as_str()) {
                self.store
                    .save(&PersistedSession {
                        token: state.session.token.clone(),
                        username: Some(username.clone()),
                    })
                    .await?;
                state.session.username = Some(username);
            }
        }

        state.status = SessionStatus::Authenticated;
        self.publish(&state);
        Ok(true)
    }

    /// Settle into Unauthenticated without touching storage (nothing was persisted)
    pub(crate) async fn mark_unauthenticated(&self) {
        let mut state = self.state.write().await;
        state.status = SessionStatus::Unauthenticated;
        self.publish(&state);
    }

    /// Clear memory and persisted storage unconditionally
    pub(crate) async fn end(&self) {
        let mut state = self.state.write().await;
        self.clear_locked(&mut state).await;
    }

    /// Clear the session only if `generation` is still the live one.
    /// Returns whether anything was torn down.
    pub(crate) async fn end_generation(&self, generation: u64) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation || state.session.token.is_none() {
            debug!(
                "Ignoring teardown for stale session generation {} (current {})",
                generation, state.generation
            );
            return false;
        }
        self.clear_locked(&mut state).await;
        true
    }

    /// Forced logout after a 401 from any authenticated call
    pub(crate) async fn force_logout(&self, generation: u64) -> bool {
        let ended = self.end_generation(generation).await;
        if ended {
            warn!("Server rejected the session token; logged out");
        }
        ended
    }

    async fn clear_locked(&self, state: &mut SessionState) {
        state.session = Session::default();
        state.status = SessionStatus::Unauthenticated;
        state.generation += 1;

        if let Err(e) = self.store.clear().await {
            error!("Failed to clear persisted session: {}", e);
        }
        self.publish(state);
    }
}

/// Owns the authentication flows. All state changes go through [`SessionHandle`].
#[derive(Clone)]
pub struct SessionManager {
    api: ApiClient,
}

impl SessionManager {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn handle(&self) -> &SessionHandle {
        self.api.session()
    }

    /// Leave the Initializing state: restore any persisted token and validate it
    pub async fn initialize(&self) -> SessionStatus {
        match self.handle().restore().await {
            Ok(true) => self.validate_existing().await,
            Ok(false) => {
                debug!("No persisted token; starting unauthenticated");
                self.handle().mark_unauthenticated().await;
                SessionStatus::Unauthenticated
            }
            Err(e) => {
                warn!("Could not read persisted session: {}", e);
                self.handle().mark_unauthenticated().await;
                SessionStatus::Unauthenticated
            }
        }
    }

    /// Check a held token against the server. Any failure silently clears the session.
    pub async fn validate_existing(&self) -> SessionStatus {
        let generation = self.handle().generation().await;

        match self.api.get_json::<ValidateResponse>(paths::VALIDATE).await {
            Ok(body) => match self.handle().confirm(generation, body.username).await {
                Ok(true) => {
                    info!("Restored session validated");
                }
                Ok(false) => {
                    debug!("Session changed during validation; keeping newer state");
                }
                Err(e) => {
                    warn!("Session valid but could not be persisted: {}", e);
                    self.handle().end_generation(generation).await;
                }
            },
            Err(ClientError::NotAuthenticated) => {
                self.handle().mark_unauthenticated().await;
            }
            Err(e) => {
                debug!("Persisted session rejected: {}", e);
                if !self.handle().end_generation(generation).await
                    && self.handle().status().await == SessionStatus::Initializing
                {
                    self.handle().mark_unauthenticated().await;
                }
            }
        }

        self.handle().status().await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Navigate, AuthFailure> {
        self.authenticate(paths::LOGIN, username, password, "Login failed")
            .await
    }

    /// Create an account; success logs the new user in directly
    pub async fn register(&self, username: &str, password: &str) -> Result<Navigate, AuthFailure> {
        self.authenticate(paths::REGISTER, username, password, "Registration failed")
            .await
    }

    async fn authenticate(
        &self,
        path: &str,
        username: &str,
        password: &str,
        fallback: &str,
    ) -> Result<Navigate, AuthFailure> {
        info!("Authenticating '{}' via {}", username, path);

        let response = self
            .api
            .post_anonymous(path, &AuthRequest { username, password })
            .await
            .map_err(|e| {
                warn!("Authentication request failed: {}", e);
                AuthFailure::Network(e.to_string())
            })?;

        let status = response.status();
        let body: AuthResponse = response.json().await.unwrap_or_default();

        match body.token {
            Some(token) if status.is_success() && !token.is_empty() => {
                let username = body.username.unwrap_or_else(|| username.to_string());
                self.handle()
                    .establish(token, Some(username))
                    .await
                    .map_err(|e| AuthFailure::Storage(e.to_string()))?;
                info!("Authenticated successfully");
                Ok(Navigate::TaskList)
            }
            _ => {
                let message = body.message.unwrap_or_else(|| fallback.to_string());
                debug!("Authentication refused ({}): {}", status, message);
                Err(AuthFailure::Rejected(message))
            }
        }
    }

    /// Clear token, username, and persisted storage
    pub async fn logout(&self) -> Navigate {
        self.handle().end().await;
        info!("Logged out");
        Navigate::Login
    }
}
