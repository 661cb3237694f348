// ABOUTME: CLI commands for the Taskdeck session
// ABOUTME: Login, registration, logout, and showing the current user

use anyhow::Result;
use colored::*;
use inquire::{Password, PasswordDisplayMode, Text};
use taskdeck_client::{SessionStatus, TaskdeckClient};

fn prompt_username(username: Option<String>) -> Result<String> {
    match username {
        Some(u) => Ok(u),
        None => Ok(Text::new("Username:").prompt()?),
    }
}

pub async fn login(client: &TaskdeckClient, username: Option<String>) -> Result<()> {
    let username = prompt_username(username)?;
    let password = Password::new("Password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    println!("{}", "🔐 Logging in...".bold().cyan());
    client.session().login(&username, &password).await?;

    let name = client
        .session()
        .handle()
        .username()
        .await
        .unwrap_or(username);
    println!("{} Logged in as {}", "✓".green().bold(), name.cyan());
    println!("{}", "Use 'taskdeck tasks list' to see your tasks".dimmed());
    Ok(())
}

pub async fn register(client: &TaskdeckClient, username: Option<String>) -> Result<()> {
    let username = prompt_username(username)?;
    let password = Password::new("Password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_custom_confirmation_message("Confirm password:")
        .with_custom_confirmation_error_message("Passwords do not match")
        .prompt()?;

    println!("{}", "📝 Creating account...".bold().cyan());
    client.session().register(&username, &password).await?;

    println!(
        "{} Account created. Logged in as {}",
        "✓".green().bold(),
        username.cyan()
    );
    Ok(())
}

pub async fn logout(client: &TaskdeckClient) -> Result<()> {
    let was_logged_in = client.session().handle().is_authenticated().await;
    client.logout().await;

    if was_logged_in {
        println!("{} Logged out", "✓".green().bold());
    } else {
        println!("{}", "Not logged in; saved session cleared".dimmed());
    }
    Ok(())
}

pub async fn whoami(client: &TaskdeckClient) -> Result<()> {
    let handle = client.session().handle();
    match handle.status().await {
        SessionStatus::Authenticated => {
            let name = handle.username().await.unwrap_or_else(|| "unknown".to_string());
            println!("{} {}", "Logged in as".cyan(), name.bold());
            println!("{} {}", "Server:".cyan(), client.api().base_url());
        }
        _ => println!("{}", "Not logged in".yellow()),
    }
    Ok(())
}
