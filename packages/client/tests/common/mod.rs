// ABOUTME: Shared fixtures for client integration tests
// ABOUTME: Spins up a mock Taskdeck API and wires a client to an in-memory session store

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{json, Value};
use taskdeck_client::{ClientConfig, MemorySessionStore, PersistedSession, TaskdeckClient};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

pub struct TestContext {
    pub server: MockServer,
    pub store: Arc<MemorySessionStore>,
    pub client: TaskdeckClient,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_store(MemorySessionStore::new()).await
    }

    pub async fn with_persisted(token: &str, username: &str) -> Self {
        Self::with_store(MemorySessionStore::with_session(PersistedSession::new(
            token,
            Some(username.to_string()),
        )))
        .await
    }

    async fn with_store(store: MemorySessionStore) -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(store);
        let config = ClientConfig::new(server.uri(), "unused-session.toml").unwrap();
        let client = TaskdeckClient::new(&config, store.clone())
            .unwrap()
            .with_today(today);

        Self {
            server,
            store,
            client,
        }
    }

    /// Mount a login endpoint for `username` that issues `token`
    pub async fn mount_login(&self, username: &str, token: &str) {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_partial_json(json!({ "username": username })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({
                    "token": token,
                    "username": username
                })),
            )
            .mount(&self.server)
            .await;
    }

    /// Log in through the mock server
    pub async fn login_as(&self, username: &str, token: &str) {
        self.mount_login(username, token).await;
        self.client
            .session()
            .login(username, "secret")
            .await
            .unwrap();
    }

    /// Number of requests the mock server saw for `method path`
    pub async fn hits(&self, verb: &str, route: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == verb && r.url.path() == route)
            .count()
    }
}

pub fn task_json(id: i64, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "",
        "status": status,
        "priority": "MEDIUM",
        "dueDate": null,
        "subtasks": [],
        "comments": []
    })
}
