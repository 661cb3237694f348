//! API request and response models for the Taskdeck server

use serde::{Deserialize, Serialize};

/// Credentials sent to `/auth/login` and `/auth/register`
#[derive(Debug, Serialize)]
pub struct AuthRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of a login/register response. A success status without a token is
/// still a failure.
#[derive(Debug, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `GET /auth/validate`
#[derive(Debug, Deserialize)]
pub struct ValidateResponse {
    #[serde(default)]
    pub username: Option<String>,
}

/// Body of `POST /tasks/{id}/subtasks`
#[derive(Debug, Serialize)]
pub struct NewSubtask<'a> {
    pub title: &'a str,
    pub completed: bool,
}

/// Body of `PUT /tasks/{id}/subtasks/{subtaskId}`
#[derive(Debug, Serialize)]
pub struct SubtaskUpdate {
    pub completed: bool,
}

/// Body of `POST /tasks/{id}/comments`
#[derive(Debug, Serialize)]
pub struct NewComment<'a> {
    pub text: &'a str,
}

pub mod paths {
    use taskdeck_core::{SubtaskId, TaskId};

    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const VALIDATE: &str = "/auth/validate";
    pub const TASKS: &str = "/tasks";
    pub const ANALYTICS: &str = "/analytics";

    pub fn task(id: TaskId) -> String {
        format!("/tasks/{}", id)
    }

    pub fn subtasks(task_id: TaskId) -> String {
        format!("/tasks/{}/subtasks", task_id)
    }

    pub fn subtask(task_id: TaskId, subtask_id: SubtaskId) -> String {
        format!("/tasks/{}/subtasks/{}", task_id, subtask_id)
    }

    pub fn comments(task_id: TaskId) -> String {
        format!("/tasks/{}/comments", task_id)
    }
}
