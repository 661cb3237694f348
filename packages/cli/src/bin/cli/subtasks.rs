// ABOUTME: CLI commands for subtasks
// ABOUTME: Adding subtasks and toggling their completion by position or id

use anyhow::{anyhow, Result};
use clap::Subcommand;
use colored::*;
use taskdeck_cli::render::progress_text;
use taskdeck_cli::require_login;
use taskdeck_client::{SubtaskRef, TaskdeckClient};
use taskdeck_core::{SubtaskId, TaskId};

use super::tasks::report;

#[derive(Subcommand)]
pub enum SubtasksCommands {
    /// Add a subtask to a task
    Add {
        /// Task ID
        task_id: TaskId,
        /// Subtask title
        title: String,
    },
    /// Flip a subtask between done and not done
    Toggle {
        /// Task ID
        task_id: TaskId,
        /// Subtask position as listed by 'tasks show' (starting at 1)
        subtask: i64,
        /// Treat SUBTASK as a subtask id instead of a position
        #[arg(long)]
        by_id: bool,
    },
}

pub async fn handle_subtasks_command(
    client: &TaskdeckClient,
    command: SubtasksCommands,
) -> Result<()> {
    require_login(client).await?;

    match command {
        SubtasksCommands::Add { task_id, title } => add_subtask(client, task_id, &title).await,
        SubtasksCommands::Toggle {
            task_id,
            subtask,
            by_id,
        } => {
            let target = if by_id {
                SubtaskRef::Id(subtask as SubtaskId)
            } else {
                let position = usize::try_from(subtask)
                    .ok()
                    .filter(|p| *p >= 1)
                    .ok_or_else(|| anyhow!("Subtask positions start at 1"))?;
                SubtaskRef::Index(position - 1)
            };
            toggle_subtask(client, task_id, target).await
        }
    }
}

async fn add_subtask(client: &TaskdeckClient, task_id: TaskId, title: &str) -> Result<()> {
    let task = client
        .mutations()
        .add_subtask(task_id, title)
        .await
        .map_err(|e| report(e, "Subtask not added"))?;

    println!(
        "{} Added subtask to '{}' {}",
        "✓".green().bold(),
        task.title,
        progress_text(&task).dimmed()
    );
    Ok(())
}

async fn toggle_subtask(
    client: &TaskdeckClient,
    task_id: TaskId,
    target: SubtaskRef,
) -> Result<()> {
    // Load fresh so the flag we negate is the server's current value
    let task = client.tasks().load_one(task_id).await?;
    let current = match target {
        SubtaskRef::Id(id) => task.subtasks.iter().find(|s| s.id == id),
        SubtaskRef::Index(index) => task.subtasks.get(index),
    }
    .ok_or_else(|| anyhow!("Task {} has no such subtask", task_id))?;

    let subtask_id = current.id;
    let updated = client
        .mutations()
        .toggle_subtask(task_id, SubtaskRef::Id(subtask_id), current.completed)
        .await?;

    let subtask = updated.subtasks.iter().find(|s| s.id == subtask_id);
    match subtask {
        Some(s) if s.completed => println!("{} '{}' done", "✓".green().bold(), s.title),
        Some(s) => println!("{} '{}' reopened", "○".yellow().bold(), s.title),
        None => println!("{}", "Subtask no longer exists".yellow()),
    }
    println!("{} {}", "Progress:".cyan(), progress_text(&updated));
    Ok(())
}
