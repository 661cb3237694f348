// ABOUTME: Completion statistics for the dashboard and analytics views
// ABOUTME: Status and priority counts computed locally or returned by the analytics endpoint

use serde::{Deserialize, Serialize};

use crate::types::{Priority, Task, TaskStatus};

/// Percentage of `part` in `total`, rounded to one decimal. Zero when `total` is zero.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl StatusCounts {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut counts, task| {
            match task.status {
                TaskStatus::Todo => counts.todo += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Done => counts.done += 1,
            }
            counts
        })
    }

    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        }
    }

    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.done
    }

    pub fn completion_rate(&self) -> f64 {
        percentage(self.done, self.total())
    }

    pub fn in_progress_rate(&self) -> f64 {
        percentage(self.in_progress, self.total())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut counts, task| {
            match task.priority {
                Priority::High => counts.high += 1,
                Priority::Medium => counts.medium += 1,
                Priority::Low => counts.low += 1,
            }
            counts
        })
    }

    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Dashboard figures derived from the locally loaded task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub status: StatusCounts,
    pub priority: PriorityCounts,
}

impl Dashboard {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            status: StatusCounts::from_tasks(tasks),
            priority: PriorityCounts::from_tasks(tasks),
        }
    }
}

/// Aggregate counts returned by `GET /analytics`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    #[serde(default)]
    pub total_tasks: usize,
    #[serde(default)]
    pub to_do: usize,
    #[serde(default)]
    pub in_progress: usize,
    #[serde(default)]
    pub done: usize,
}

impl Analytics {
    pub fn completion_rate(&self) -> f64 {
        percentage(self.done, self.total_tasks)
    }

    pub fn in_progress_rate(&self) -> f64 {
        percentage(self.in_progress, self.total_tasks)
    }

    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts {
            todo: self.to_do,
            in_progress: self.in_progress,
            done: self.done,
        }
    }
}

impl From<StatusCounts> for Analytics {
    fn from(counts: StatusCounts) -> Self {
        Self {
            total_tasks: counts.total(),
            to_do: counts.todo,
            in_progress: counts.in_progress,
            done: counts.done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tasks(json: serde_json::Value) -> Vec<Task> {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_completion_rate_two_tasks() {
        let tasks = tasks(json!([
            {"id": 1, "title": "First", "status": "TODO"},
            {"id": 2, "title": "Second", "status": "DONE"}
        ]));

        let counts = StatusCounts::from_tasks(&tasks);
        assert_eq!(counts.completion_rate(), 50.0);
        assert_eq!(counts.in_progress_rate(), 0.0);
    }

    #[test]
    fn test_rates_round_to_one_decimal() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn test_dashboard_counts() {
        let tasks = tasks(json!([
            {"id": 1, "title": "a", "status": "TODO", "priority": "HIGH"},
            {"id": 2, "title": "b", "status": "IN_PROGRESS", "priority": "HIGH"},
            {"id": 3, "title": "c", "status": "DONE", "priority": "LOW"}
        ]));

        let dashboard = Dashboard::from_tasks(&tasks);
        assert_eq!(
            dashboard.status,
            StatusCounts {
                todo: 1,
                in_progress: 1,
                done: 1
            }
        );
        assert_eq!(dashboard.priority.get(Priority::High), 2);
        assert_eq!(dashboard.priority.get(Priority::Medium), 0);
    }

    #[test]
    fn test_analytics_wire_format() {
        let analytics: Analytics = serde_json::from_value(json!({
            "totalTasks": 4,
            "toDo": 1,
            "inProgress": 1,
            "done": 2
        }))
        .unwrap();

        assert_eq!(analytics.completion_rate(), 50.0);
        assert_eq!(analytics.in_progress_rate(), 25.0);
        assert_eq!(analytics.status_counts().total(), 4);
    }

    #[test]
    fn test_analytics_without_tasks() {
        let analytics = Analytics::default();
        assert_eq!(analytics.completion_rate(), 0.0);
    }
}
