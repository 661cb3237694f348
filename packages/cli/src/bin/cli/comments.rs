use anyhow::Result;
use clap::Subcommand;
use colored::*;
use inquire::Text;
use taskdeck_cli::require_login;
use taskdeck_client::TaskdeckClient;
use taskdeck_core::TaskId;

use super::tasks::report;

#[derive(Subcommand)]
pub enum CommentsCommands {
    /// Append a comment to a task
    Add {
        /// Task ID
        task_id: TaskId,
        /// Comment text (prompted when omitted)
        text: Option<String>,
    },
}

pub async fn handle_comments_command(
    client: &TaskdeckClient,
    command: CommentsCommands,
) -> Result<()> {
    require_login(client).await?;

    match command {
        CommentsCommands::Add { task_id, text } => {
            let text = match text {
                Some(t) => t,
                None => Text::new("Comment:").prompt()?,
            };

            let task = client
                .mutations()
                .add_comment(task_id, &text)
                .await
                .map_err(|e| report(e, "Comment not added"))?;

            println!(
                "{} Comment added to '{}' ({} total)",
                "✓".green().bold(),
                task.title,
                task.comments.len()
            );
            Ok(())
        }
    }
}
