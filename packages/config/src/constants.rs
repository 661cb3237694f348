// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Taskdeck

// API Configuration
pub const TASKDECK_API_URL: &str = "TASKDECK_API_URL";
pub const TASKDECK_HTTP_TIMEOUT_SECS: &str = "TASKDECK_HTTP_TIMEOUT_SECS";

// Local State
pub const TASKDECK_HOME: &str = "TASKDECK_HOME";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";

// System Environment Variables
pub const HOME: &str = "HOME";
pub const USERPROFILE: &str = "USERPROFILE"; // Windows

/// API base URL used when `TASKDECK_API_URL` is unset
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Request timeout used when `TASKDECK_HTTP_TIMEOUT_SECS` is unset
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// File name of the persisted session inside the Taskdeck home directory
pub const SESSION_FILE_NAME: &str = "session.toml";
