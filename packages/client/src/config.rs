use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

use taskdeck_config::{
    session_file, DEFAULT_API_URL, DEFAULT_HTTP_TIMEOUT_SECS, TASKDECK_API_URL,
    TASKDECK_HTTP_TIMEOUT_SECS,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(#[from] ParseIntError),
    #[error("Timeout must be at least one second")]
    TimeoutOutOfRange,
    #[error("Invalid API URL '{0}': must start with http:// or https://")]
    InvalidApiUrl(String),
    #[error("Could not determine a home directory for the session file")]
    NoHomeDirectory,
}

/// Connection and persistence settings for a client instance
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub session_file: PathBuf,
}

impl ClientConfig {
    pub fn new(
        api_url: impl Into<String>,
        session_file: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize_api_url(&api_url.into())?,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            session_file: session_file.into(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = env::var(TASKDECK_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_url = normalize_api_url(&api_url)?;

        let timeout_secs = match env::var(TASKDECK_HTTP_TIMEOUT_SECS) {
            Ok(raw) => raw.trim().parse::<u64>()?,
            Err(_) => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::TimeoutOutOfRange);
        }

        let session_file = session_file().ok_or(ConfigError::NoHomeDirectory)?;

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            session_file,
        })
    }

    /// Replace the API URL, e.g. from a command-line flag
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_api_url(api_url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidApiUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}
