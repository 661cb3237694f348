// ABOUTME: Process startup for the taskdeck binary
// ABOUTME: Installs the tracing subscriber and restores the saved session from resolved settings

use std::time::Duration;

use anyhow::{bail, ensure, Context, Result};
use taskdeck_client::{ClientConfig, SessionStatus, TaskdeckClient};
use taskdeck_config::RUST_LOG;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const VERBOSE_FILTER: &str = "warn,taskdeck_client=debug,taskdeck_cli=debug";
const DEFAULT_FILTER: &str = "warn";

/// Log filter: `--verbose` wins, then `RUST_LOG`, then warnings only
pub fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_env(RUST_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Logs go to stderr so command output stays pipeable.
pub fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false) // Don't show module paths in logs
        .compact()
        .init();
}

/// Resolve client settings from the environment. `--api-url` and `--timeout` take precedence.
pub fn load_config(api_url: Option<&str>, timeout_secs: Option<u64>) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("Invalid Taskdeck configuration")?;

    if let Some(url) = api_url {
        config = config
            .with_api_url(url)
            .context("Invalid value for --api-url")?;
    }

    if let Some(secs) = timeout_secs {
        ensure!(secs > 0, "Invalid value for --timeout: must be at least one second");
        config = config.with_timeout(Duration::from_secs(secs));
    }

    Ok(config)
}

/// Build a client and restore any saved session, validating it with the server
pub async fn connect(config: &ClientConfig) -> Result<TaskdeckClient> {
    let client = TaskdeckClient::from_config(config)?;
    let status = client.initialize().await;
    debug!("Session status after startup: {:?}", status);
    Ok(client)
}

pub async fn require_login(client: &TaskdeckClient) -> Result<()> {
    if client.session().handle().status().await != SessionStatus::Authenticated {
        bail!("Not logged in. Run 'taskdeck login' first");
    }
    Ok(())
}
