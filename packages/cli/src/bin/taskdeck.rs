use clap::{Parser, Subcommand};
use colored::*;
use std::process;

mod cli;

use cli::comments::CommentsCommands;
use cli::subtasks::SubtasksCommands;
use cli::tasks::TasksCommands;
use taskdeck_cli::{connect, init_tracing, load_config};

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Taskdeck CLI - tasks, subtasks, and a kanban board from your terminal")]
#[command(version)]
struct Cli {
    /// Taskdeck API base URL (overrides TASKDECK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// HTTP request timeout in seconds (overrides TASKDECK_HTTP_TIMEOUT_SECS)
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and save the session
    Login {
        /// Username (prompted when omitted)
        username: Option<String>,
    },
    /// Create an account and log in
    Register {
        /// Username (prompted when omitted)
        username: Option<String>,
    },
    /// Clear the saved session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Manage tasks
    #[command(subcommand)]
    Tasks(TasksCommands),
    /// Manage subtasks
    #[command(subcommand)]
    Subtasks(SubtasksCommands),
    /// Manage comments
    #[command(subcommand)]
    Comments(CommentsCommands),
    /// Show server-side analytics
    Analytics,
    /// Show counts and completion rates for your tasks
    Dashboard,
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.api_url.as_deref(), cli.timeout)?;
    let client = connect(&config).await?;

    match cli.command {
        Commands::Login { username } => cli::auth::login(&client, username).await,
        Commands::Register { username } => cli::auth::register(&client, username).await,
        Commands::Logout => cli::auth::logout(&client).await,
        Commands::Whoami => cli::auth::whoami(&client).await,
        Commands::Tasks(command) => cli::tasks::handle_tasks_command(&client, command).await,
        Commands::Subtasks(command) => {
            cli::subtasks::handle_subtasks_command(&client, command).await
        }
        Commands::Comments(command) => {
            cli::comments::handle_comments_command(&client, command).await
        }
        Commands::Analytics => cli::stats::analytics(&client).await,
        Commands::Dashboard => cli::stats::dashboard(&client).await,
    }
}
