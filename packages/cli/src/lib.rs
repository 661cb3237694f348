// ABOUTME: Shared pieces of the taskdeck terminal front-end
// ABOUTME: Startup (logging, configuration, session restore) and terminal rendering of tasks

pub mod context;
pub mod render;

pub use context::{connect, init_tracing, load_config, require_login};
