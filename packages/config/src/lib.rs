// ABOUTME: Environment variable names and local directory resolution for Taskdeck
// ABOUTME: Shared by the client library and the CLI so both agree on where state lives

pub mod constants;

use std::env;
use std::path::PathBuf;

pub use constants::*;

/// Get the path to the Taskdeck directory.
///
/// Resolution order: `TASKDECK_HOME`, then `$HOME/.taskdeck` (`%USERPROFILE%`
/// on Windows), then the platform home directory reported by `dirs`. Returns
/// `None` only when no home directory can be determined at all.
pub fn taskdeck_dir() -> Option<PathBuf> {
    if let Ok(dir) = env::var(TASKDECK_HOME) {
        if !dir.trim().is_empty() {
            return Some(PathBuf::from(dir));
        }
    }

    // HOME first so tests can redirect it
    for var in [HOME, USERPROFILE] {
        if let Ok(home) = env::var(var) {
            if !home.is_empty() {
                return Some(PathBuf::from(home).join(".taskdeck"));
            }
        }
    }

    let dir = dirs::home_dir().map(|home| home.join(".taskdeck"));
    if dir.is_none() {
        tracing::warn!("Unable to determine a home directory for Taskdeck state");
    }
    dir
}

/// Get the path to the persisted session file (`<taskdeck dir>/session.toml`)
pub fn session_file() -> Option<PathBuf> {
    taskdeck_dir().map(|dir| dir.join(SESSION_FILE_NAME))
}
