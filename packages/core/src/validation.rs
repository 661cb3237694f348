use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{Task, TaskInput};

/// Minimum number of characters in a task title
pub const MIN_TITLE_LENGTH: usize = 3;

/// Maximum number of characters in a task description
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Field-scoped validation failure for task data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn validate_title(title: &str, errors: &mut Vec<ValidationError>) {
    if title.trim().is_empty() {
        errors.push(ValidationError::new("title", "Title is required"));
    } else if title.chars().count() < MIN_TITLE_LENGTH {
        errors.push(ValidationError::new(
            "title",
            format!("Title must be at least {} characters", MIN_TITLE_LENGTH),
        ));
    }
}

fn validate_description(description: &str, errors: &mut Vec<ValidationError>) {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        errors.push(ValidationError::new(
            "description",
            format!(
                "Description must be less than {} characters",
                MAX_DESCRIPTION_LENGTH
            ),
        ));
    }
}

/// Validates a new task before it is submitted.
///
/// `today` is the caller's current calendar date; a due date earlier than it
/// is rejected. An empty result means the input may be sent.
pub fn validate_task_input(input: &TaskInput, today: NaiveDate) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_title(&input.title, &mut errors);
    validate_description(&input.description, &mut errors);

    if let Some(due_date) = input.due_date {
        if due_date < today {
            errors.push(ValidationError::new(
                "dueDate",
                "Due date cannot be in the past",
            ));
        }
    }

    errors
}

/// Validates an edited task. Past due dates are allowed since existing
/// tasks may already be overdue.
pub fn validate_task_edit(task: &Task) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_title(&task.title, &mut errors);
    if let Some(ref description) = task.description {
        validate_description(description, &mut errors);
    }

    errors
}

pub fn validate_subtask_title(title: &str) -> Vec<ValidationError> {
    if title.trim().is_empty() {
        vec![ValidationError::new("title", "Subtask title is required")]
    } else {
        Vec::new()
    }
}

pub fn validate_comment_text(text: &str) -> Vec<ValidationError> {
    if text.trim().is_empty() {
        vec![ValidationError::new("text", "Comment text is required")]
    } else {
        Vec::new()
    }
}

/// Truncate a string to `max_len` characters, appending `...` when cut
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
