pub mod auth;
pub mod comments;
pub mod stats;
pub mod subtasks;
pub mod tasks;
