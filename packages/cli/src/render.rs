// ABOUTME: Terminal rendering for tasks, the kanban board, and completion statistics
// ABOUTME: Pure functions building comfy-table tables and colored labels from core types

use chrono::NaiveDate;
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use taskdeck_core::{
    board_columns, due_label, is_overdue, subtask_progress, truncate, Analytics, Dashboard,
    DueLabel, Priority, StatusCounts, Task, TaskStatus, ValidationError,
};

const TITLE_WIDTH: usize = 40;
const BOARD_TITLE_WIDTH: usize = 28;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn status_label(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::Todo => status.title().normal(),
        TaskStatus::InProgress => status.title().yellow(),
        TaskStatus::Done => status.title().green(),
    }
}

pub fn priority_label(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => "High".red(),
        Priority::Medium => "Medium".yellow(),
        Priority::Low => "Low".green(),
    }
}

/// Due column text. Finished tasks past their date show the date, not "Overdue".
pub fn due_text(task: &Task, today: NaiveDate) -> String {
    match due_label(task.due_date, today) {
        DueLabel::Overdue if !is_overdue(task, today) => task
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        label => label.to_string(),
    }
}

fn due_colored(task: &Task, today: NaiveDate) -> ColoredString {
    let text = due_text(task, today);
    if is_overdue(task, today) {
        return text.red().bold();
    }
    match due_label(task.due_date, today) {
        DueLabel::Today | DueLabel::DaysLeft(_) => text.yellow(),
        DueLabel::NoDate => text.dimmed(),
        _ => text.normal(),
    }
}

/// `done/total (pct%)`, or `-` for a task without subtasks
pub fn progress_text(task: &Task) -> String {
    if task.subtasks.is_empty() {
        return "-".to_string();
    }
    format!(
        "{}/{} ({}%)",
        task.completed_subtasks(),
        task.subtasks.len(),
        subtask_progress(task)
    )
}

pub fn task_table(tasks: &[&Task], today: NaiveDate) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Title", "Status", "Priority", "Due", "Subtasks"]);

    for task in tasks {
        table.add_row(vec![
            task.id.to_string(),
            truncate(&task.title, TITLE_WIDTH),
            status_label(task.status).to_string(),
            priority_label(task.priority).to_string(),
            due_colored(task, today).to_string(),
            progress_text(task),
        ]);
    }

    table
}

/// Kanban board: one column per status, tasks in list order
pub fn board_table(tasks: &[Task]) -> Table {
    let columns = board_columns(tasks);

    let mut table = new_table();
    table.set_header(
        columns
            .iter()
            .map(|c| format!("{} ({})", c.title, c.tasks.len()))
            .collect::<Vec<_>>(),
    );

    let depth = columns.iter().map(|c| c.tasks.len()).max().unwrap_or(0);
    for row in 0..depth {
        table.add_row(
            columns
                .iter()
                .map(|c| {
                    c.tasks
                        .get(row)
                        .map(|t| format!("#{} {}", t.id, truncate(&t.title, BOARD_TITLE_WIDTH)))
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>(),
        );
    }

    table
}

fn status_rows(table: &mut Table, counts: &StatusCounts) {
    for status in TaskStatus::ALL {
        table.add_row(vec![
            status_label(status).to_string(),
            counts.get(status).to_string(),
        ]);
    }
}

pub fn dashboard_table(dashboard: &Dashboard) -> Table {
    let mut table = new_table();
    table.set_header(vec!["", "Tasks"]);

    table.add_row(vec!["Total".bold().to_string(), dashboard.status.total().to_string()]);
    status_rows(&mut table, &dashboard.status);
    for priority in Priority::ALL {
        table.add_row(vec![
            format!("{} priority", priority_label(priority)),
            dashboard.priority.get(priority).to_string(),
        ]);
    }

    table
}

pub fn analytics_table(analytics: &Analytics) -> Table {
    let mut table = new_table();
    table.set_header(vec!["", "Tasks"]);

    table.add_row(vec!["Total".bold().to_string(), analytics.total_tasks.to_string()]);
    status_rows(&mut table, &analytics.status_counts());

    table
}

pub fn rates_line(completion: f64, in_progress: f64) -> String {
    format!(
        "Completion: {}   In progress: {}",
        format!("{:.1}%", completion).green().bold(),
        format!("{:.1}%", in_progress).yellow()
    )
}

pub fn print_task_details(task: &Task, today: NaiveDate) {
    println!("{:<12} {}", "ID:".cyan(), task.id);
    println!("{:<12} {}", "Title:".cyan(), task.title);
    println!("{:<12} {}", "Status:".cyan(), status_label(task.status));
    println!("{:<12} {}", "Priority:".cyan(), priority_label(task.priority));
    println!("{:<12} {}", "Due:".cyan(), due_colored(task, today));

    if let Some(description) = &task.description {
        if !description.trim().is_empty() {
            println!("{:<12} {}", "Description:".cyan(), description);
        }
    }

    println!();
    println!(
        "{} {}",
        "Subtasks".bold(),
        progress_text(task).dimmed()
    );
    if task.subtasks.is_empty() {
        println!("  {}", "No subtasks".dimmed());
    }
    for (position, subtask) in task.subtasks.iter().enumerate() {
        let mark = if subtask.completed {
            "[x]".green()
        } else {
            "[ ]".normal()
        };
        println!("  {}. {} {}", position + 1, mark, subtask.title);
    }

    println!();
    println!("{}", "Comments".bold());
    if task.comments.is_empty() {
        println!("  {}", "No comments".dimmed());
    }
    for comment in &task.comments {
        let when = comment
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("  {} {}", when.dimmed(), comment.text);
    }
}

pub fn print_validation_errors(errors: &[ValidationError]) {
    for error in errors {
        eprintln!("  {} {}: {}", "✗".red().bold(), error.field.bold(), error.message);
    }
}
