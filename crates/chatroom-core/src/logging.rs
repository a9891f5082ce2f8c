//! File-backed tracing setup.
//!
//! The interactive client owns stdout, so logs go to
//! `${CHATROOM_HOME}/logs/chatroom.log` instead of the terminal.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::paths;

const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn,tungstenite=warn";
const LOG_FILE: &str = "chatroom.log";

/// Keeps the background writer alive; logs stop flushing once dropped.
pub struct LoggingHandle {
    pub log_path: PathBuf,
    _guard: WorkerGuard,
}

/// Installs the global subscriber writing to the default logs directory.
pub fn init_logging() -> Result<LoggingHandle> {
    init_logging_in(&paths::logs_dir())
}

/// Installs the global subscriber writing into `log_dir`.
pub fn init_logging_in(log_dir: &Path) -> Result<LoggingHandle> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join(LOG_FILE);

    let filter = std::env::var("CHATROOM_LOG")
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(log_path = %log_path.display(), "logging initialized");

    Ok(LoggingHandle {
        log_path,
        _guard: guard,
    })
}
