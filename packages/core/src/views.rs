// ABOUTME: Derived views over the task list
// ABOUTME: Kanban columns, table filtering and sorting, subtask progress, and due-date labels

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::types::{Task, TaskStatus};

/// One kanban column and the tasks currently in it
#[derive(Debug, Clone, PartialEq)]
pub struct BoardColumn<'a> {
    pub status: TaskStatus,
    pub title: &'static str,
    pub tasks: Vec<&'a Task>,
}

/// Group tasks into the three board columns, preserving list order within a column
pub fn board_columns(tasks: &[Task]) -> Vec<BoardColumn<'_>> {
    TaskStatus::ALL
        .iter()
        .map(|&status| BoardColumn {
            status,
            title: status.title(),
            tasks: tasks.iter().filter(|t| t.status == status).collect(),
        })
        .collect()
}

/// Share of completed subtasks as a whole percentage, 0 when there are none
pub fn subtask_progress(task: &Task) -> u8 {
    if task.subtasks.is_empty() {
        return 0;
    }
    let done = task.completed_subtasks() as f64;
    ((done / task.subtasks.len() as f64) * 100.0).round() as u8
}

/// A task is overdue when its due date has passed and it is not done
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    match task.due_date {
        Some(due) => task.status != TaskStatus::Done && due < today,
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueLabel {
    NoDate,
    Overdue,
    Today,
    DaysLeft(i64),
    On(NaiveDate),
}

impl fmt::Display for DueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueLabel::NoDate => f.write_str("No date"),
            DueLabel::Overdue => f.write_str("Overdue"),
            DueLabel::Today => f.write_str("Today"),
            DueLabel::DaysLeft(1) => f.write_str("1 day left"),
            DueLabel::DaysLeft(days) => write!(f, "{} days left", days),
            DueLabel::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

pub fn due_label(due_date: Option<NaiveDate>, today: NaiveDate) -> DueLabel {
    let Some(due) = due_date else {
        return DueLabel::NoDate;
    };

    match (due - today).num_days() {
        days if days < 0 => DueLabel::Overdue,
        0 => DueLabel::Today,
        days if days <= 3 => DueLabel::DaysLeft(days),
        _ => DueLabel::On(due),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    fn matches(&self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    DueDate,
    Priority,
    None,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "due-date" | "duedate" | "due" => Ok(SortKey::DueDate),
            "priority" => Ok(SortKey::Priority),
            "none" => Ok(SortKey::None),
            _ => Err(format!(
                "Invalid sort key '{}': expected due-date, priority or none",
                s
            )),
        }
    }
}

/// Table view options: title search, status filter, sort order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    pub search: String,
    pub status: StatusFilter,
    pub sort: SortKey,
}

/// Apply a table query. Sorting is stable; tasks without a due date sort last
/// and priority sorts by wire name.
pub fn table_rows<'a>(tasks: &'a [Task], query: &TableQuery) -> Vec<&'a Task> {
    let needle = query.search.to_lowercase();

    let mut rows: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.title.to_lowercase().contains(&needle))
        .filter(|t| query.status.matches(t.status))
        .collect();

    match query.sort {
        SortKey::DueDate => rows.sort_by(|a, b| match (a.due_date, b.due_date) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        SortKey::Priority => rows.sort_by(|a, b| a.priority.as_str().cmp(b.priority.as_str())),
        SortKey::None => {}
    }

    rows
}
