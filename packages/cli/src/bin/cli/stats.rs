// ABOUTME: CLI commands for completion statistics
// ABOUTME: Server-side analytics and a dashboard computed from the loaded task list

use anyhow::Result;
use chrono::Local;
use colored::*;
use taskdeck_cli::render::{analytics_table, dashboard_table, rates_line, task_table};
use taskdeck_cli::require_login;
use taskdeck_client::TaskdeckClient;
use taskdeck_core::{is_overdue, Dashboard};

pub async fn analytics(client: &TaskdeckClient) -> Result<()> {
    require_login(client).await?;

    let analytics = client.fetch_analytics().await?;

    println!("{}", "📊 Analytics".blue().bold());
    println!();
    println!("{}", analytics_table(&analytics));
    println!(
        "{}",
        rates_line(analytics.completion_rate(), analytics.in_progress_rate())
    );
    Ok(())
}

pub async fn dashboard(client: &TaskdeckClient) -> Result<()> {
    require_login(client).await?;

    let tasks = client.tasks().load_all().await?;
    let dashboard = Dashboard::from_tasks(&tasks);
    let today = Local::now().date_naive();

    println!("{}", "📊 Dashboard".blue().bold());
    println!();
    println!("{}", dashboard_table(&dashboard));
    println!(
        "{}",
        rates_line(
            dashboard.status.completion_rate(),
            dashboard.status.in_progress_rate()
        )
    );

    let overdue: Vec<_> = tasks.iter().filter(|t| is_overdue(t, today)).collect();
    if !overdue.is_empty() {
        println!();
        println!("{}", format!("⚠ {} overdue", overdue.len()).red().bold());
        println!("{}", task_table(&overdue, today));
    }

    Ok(())
}
