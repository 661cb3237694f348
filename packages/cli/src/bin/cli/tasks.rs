// ABOUTME: CLI commands for tasks and the kanban board
// ABOUTME: List with search/filter/sort, show, create, edit, delete, and status moves

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use clap::Subcommand;
use colored::*;
use inquire::{Confirm, Select, Text};
use taskdeck_cli::render::{board_table, print_task_details, print_validation_errors, task_table};
use taskdeck_cli::require_login;
use taskdeck_client::{ClientError, Navigate, TaskdeckClient};
use taskdeck_core::{
    table_rows, Priority, SortKey, StatusFilter, TableQuery, TaskId, TaskInput, TaskPatch,
    TaskStatus,
};

#[derive(Subcommand)]
pub enum TasksCommands {
    /// List tasks
    List {
        /// Only show tasks whose title contains this text
        #[arg(short, long, default_value = "")]
        search: String,
        /// ALL, TODO, IN_PROGRESS or DONE
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// due-date, priority or none
        #[arg(long, default_value = "due-date")]
        sort: SortKey,
    },
    /// Show a task with its subtasks and comments
    Show {
        /// Task ID
        id: TaskId,
    },
    /// Create a task (prompts for anything not given)
    Create {
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(short, long)]
        priority: Option<Priority>,
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Edit a task (prompts for every field when no flags are given)
    Edit {
        /// Task ID
        id: TaskId,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        #[arg(short, long)]
        priority: Option<Priority>,
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: TaskId,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a task to another board column
    Move {
        /// Task ID
        id: TaskId,
        /// TODO, IN_PROGRESS or DONE
        status: TaskStatus,
    },
    /// Show the kanban board
    Board,
}

pub async fn handle_tasks_command(client: &TaskdeckClient, command: TasksCommands) -> Result<()> {
    require_login(client).await?;

    match command {
        TasksCommands::List {
            search,
            status,
            sort,
        } => {
            list_tasks(
                client,
                TableQuery {
                    search,
                    status,
                    sort,
                },
            )
            .await
        }
        TasksCommands::Show { id } => show_task(client, id).await,
        TasksCommands::Create {
            title,
            description,
            due,
            priority,
            status,
        } => create_task(client, title, description, due, priority, status).await,
        TasksCommands::Edit {
            id,
            title,
            description,
            due,
            clear_due,
            priority,
            status,
        } => {
            let patch = TaskPatch {
                title,
                description,
                status,
                priority,
                due_date: due,
                clear_due_date: clear_due,
            };
            edit_task(client, id, patch).await
        }
        TasksCommands::Delete { id, yes } => delete_task(client, id, yes).await,
        TasksCommands::Move { id, status } => move_task(client, id, status).await,
        TasksCommands::Board => show_board(client).await,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Print field errors for a validation failure and turn it into a short summary
pub fn report(err: ClientError, action: &str) -> anyhow::Error {
    match err {
        ClientError::Validation(errors) => {
            print_validation_errors(&errors);
            anyhow::anyhow!("{}: fix the fields above and try again", action)
        }
        other => anyhow::Error::new(other).context(action.to_string()),
    }
}

async fn list_tasks(client: &TaskdeckClient, query: TableQuery) -> Result<()> {
    let tasks = client.tasks().load_all().await?;

    if tasks.is_empty() {
        println!("{}", "No tasks found".yellow());
        println!(
            "{}",
            "Use 'taskdeck tasks create' to add your first task".dimmed()
        );
        return Ok(());
    }

    let rows = table_rows(&tasks, &query);
    println!("{}", "📋 Tasks".blue().bold());
    println!();
    println!("{}", task_table(&rows, today()));
    println!(
        "Showing: {} of {} tasks",
        rows.len().to_string().cyan(),
        tasks.len()
    );

    Ok(())
}

async fn show_task(client: &TaskdeckClient, id: TaskId) -> Result<()> {
    let task = client.tasks().load_one(id).await?;

    println!("{}", format!("📋 Task - {}", task.title).blue().bold());
    println!();
    print_task_details(&task, today());

    Ok(())
}

fn optional(text: String) -> String {
    text.trim().to_string()
}

fn prompt_due_date() -> Result<Option<NaiveDate>> {
    loop {
        let raw = Text::new("Due date (YYYY-MM-DD, optional):").prompt()?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(date) => return Ok(Some(date)),
            Err(_) => eprintln!("{}", "Please enter a date like 2024-12-31".red()),
        }
    }
}

async fn create_task(
    client: &TaskdeckClient,
    title: Option<String>,
    description: Option<String>,
    due: Option<NaiveDate>,
    priority: Option<Priority>,
    status: Option<TaskStatus>,
) -> Result<()> {
    println!("{}", "➕ New Task".blue().bold());
    println!();

    let interactive = title.is_none();

    let title = match title {
        Some(t) => t,
        None => Text::new("Title:").prompt()?,
    };

    let description = match description {
        Some(d) => d,
        None if interactive => optional(Text::new("Description (optional):").prompt()?),
        None => String::new(),
    };

    let due_date = match due {
        Some(d) => Some(d),
        None if interactive => prompt_due_date()?,
        None => None,
    };

    let priority = match priority {
        Some(p) => p,
        None if interactive => Select::new("Priority:", Priority::ALL.to_vec())
            .with_starting_cursor(1)
            .prompt()?,
        None => Priority::default(),
    };

    let input = TaskInput {
        title,
        description,
        due_date,
        priority,
        status: status.unwrap_or_default(),
    };

    let next = client
        .mutations()
        .create_task(&input)
        .await
        .map_err(|e| report(e, "Task not created"))?;

    println!();
    println!("{}", format!("✅ Task '{}' created", input.title.trim()).green());
    if let Navigate::TaskDetail(id) = next {
        println!("ID: {}", id.to_string().cyan());
        println!(
            "{}",
            format!("Use 'taskdeck tasks show {}' to view it", id).dimmed()
        );
    }

    Ok(())
}

async fn edit_task(client: &TaskdeckClient, id: TaskId, patch: TaskPatch) -> Result<()> {
    let patch = if patch.is_empty() {
        prompt_edit(client, id).await?
    } else {
        patch
    };

    let task = client
        .mutations()
        .update_task(id, &patch)
        .await
        .map_err(|e| report(e, "Task not updated"))?;

    println!("{}", format!("✅ Task '{}' updated", task.title).green());
    Ok(())
}

async fn prompt_edit(client: &TaskdeckClient, id: TaskId) -> Result<TaskPatch> {
    let task = client.tasks().get_or_load(id).await?;

    println!("{}", format!("📝 Edit Task - {}", task.title).blue().bold());
    println!();

    let title = Text::new("Title:").with_default(&task.title).prompt()?;
    let description = Text::new("Description:")
        .with_default(task.description.as_deref().unwrap_or(""))
        .prompt()?;

    let status_cursor = TaskStatus::ALL
        .iter()
        .position(|s| *s == task.status)
        .unwrap_or(0);
    let status = Select::new("Status:", TaskStatus::ALL.to_vec())
        .with_starting_cursor(status_cursor)
        .prompt()?;

    let priority_cursor = Priority::ALL
        .iter()
        .position(|p| *p == task.priority)
        .unwrap_or(1);
    let priority = Select::new("Priority:", Priority::ALL.to_vec())
        .with_starting_cursor(priority_cursor)
        .prompt()?;

    let current_due = task
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let due_raw = Text::new("Due date (YYYY-MM-DD, empty to clear):")
        .with_default(&current_due)
        .prompt()?;
    let due_date = if due_raw.trim().is_empty() {
        None
    } else {
        Some(NaiveDate::parse_from_str(due_raw.trim(), "%Y-%m-%d")?)
    };

    Ok(TaskPatch {
        title: Some(title),
        description: Some(optional(description)),
        status: Some(status),
        priority: Some(priority),
        clear_due_date: due_date.is_none(),
        due_date,
    })
}

async fn delete_task(client: &TaskdeckClient, id: TaskId, skip_confirmation: bool) -> Result<()> {
    let task = client.tasks().get_or_load(id).await?;

    println!("{}", format!("🗑️  Delete Task - {}", task.title).red().bold());
    println!();

    let confirmed = if skip_confirmation {
        true
    } else {
        Confirm::new(&format!("Are you sure you want to delete '{}'?", task.title))
            .with_default(false)
            .prompt()?
    };

    if !confirmed {
        println!("{}", "❌ Operation cancelled".yellow());
        return Ok(());
    }

    client.mutations().delete_task(id).await?;
    println!("{}", format!("✅ Task '{}' deleted", task.title).green());
    Ok(())
}

async fn move_task(client: &TaskdeckClient, id: TaskId, status: TaskStatus) -> Result<()> {
    let tasks = client.mutations().move_task(id, status).await?;

    match tasks.iter().find(|t| t.id == id) {
        Some(task) if task.status == status => {
            println!(
                "{} Moved '{}' to {}",
                "✓".green().bold(),
                task.title,
                status.title().bold()
            );
        }
        Some(task) => bail!(
            "Server kept '{}' in {} after the move",
            task.title,
            task.status.title()
        ),
        None => bail!("Task {} is no longer on the board", id),
    }

    println!();
    println!("{}", board_table(&tasks));
    Ok(())
}

async fn show_board(client: &TaskdeckClient) -> Result<()> {
    let tasks = client.tasks().load_all().await?;

    println!("{}", "🗂️  Board".blue().bold());
    println!();
    println!("{}", board_table(&tasks));
    Ok(())
}
