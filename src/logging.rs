//! File-backed tracing setup. Nothing is written to the terminal.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_LEVEL_ENV: &str = "POKEGQL_LOG_LEVEL";
pub const DEFAULT_DIRECTIVES: &str = "pokegql=info,reqwest=warn,hyper=warn";

/// Filter from `POKEGQL_LOG_LEVEL`, or the default directives when unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber when a log file is requested.
///
/// Without a path no subscriber is installed and `tracing` macros are no-ops,
/// which keeps the alternate screen clean.
pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| io::Error::other(format!("logging init failed: {e}")))
}
