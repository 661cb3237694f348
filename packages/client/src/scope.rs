//! Cancellable requests tied to the lifetime of a view

use std::future::Future;

use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Owns the requests a view has in flight.
///
/// Dropping the scope (or calling [`ViewScope::close`]) aborts every
/// outstanding request, so nothing writes into shared state after the view
/// that asked for it has gone away.
pub struct ViewScope {
    name: String,
    tasks: JoinSet<()>,
}

/// Handle to the result of a request spawned in a [`ViewScope`]
pub struct ScopedCall<T> {
    rx: oneshot::Receiver<ClientResult<T>>,
}

impl<T> ScopedCall<T> {
    /// Wait for the request. Yields `Cancelled` if its scope was torn down first.
    pub async fn join(self) -> ClientResult<T> {
        self.rx.await.unwrap_or(Err(ClientError::Cancelled))
    }
}

impl ViewScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: JoinSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run `call` on the runtime, owned by this scope
    pub fn spawn<F, T>(&mut self, call: F) -> ScopedCall<T>
    where
        F: Future<Output = ClientResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.tasks.spawn(async move {
            let _ = tx.send(call.await);
        });
        ScopedCall { rx }
    }

    /// Requests that have not finished yet
    pub fn pending(&mut self) -> usize {
        while self.tasks.try_join_next().is_some() {}
        self.tasks.len()
    }

    /// Abort everything still in flight and wait for the aborts to land
    pub async fn close(mut self) {
        self.tasks.abort_all();
        while self.tasks.join_next().await.is_some() {}
        debug!("Closed view scope '{}'", self.name);
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        if !self.tasks.is_empty() {
            debug!(
                "Dropping view scope '{}' with {} request(s) in flight",
                self.name,
                self.tasks.len()
            );
        }
    }
}
