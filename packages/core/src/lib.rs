// ABOUTME: Core types, validation, and derived views for Taskdeck
// ABOUTME: Foundational package shared by the API client and the terminal front-end

pub mod stats;
pub mod types;
pub mod validation;
pub mod views;

// Re-export main types
pub use types::{
    Comment, CommentId, Priority, Subtask, SubtaskId, Task, TaskId, TaskInput, TaskPatch,
    TaskStatus,
};

// Re-export statistics
pub use stats::{percentage, Analytics, Dashboard, PriorityCounts, StatusCounts};

// Re-export validation
pub use validation::{
    truncate, validate_comment_text, validate_subtask_title, validate_task_edit,
    validate_task_input, ValidationError, MAX_DESCRIPTION_LENGTH, MIN_TITLE_LENGTH,
};

// Re-export views
pub use views::{
    board_columns, due_label, is_overdue, subtask_progress, table_rows, BoardColumn, DueLabel,
    SortKey, StatusFilter, TableQuery,
};
