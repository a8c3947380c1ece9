//! CLI command implementations

pub mod config;
pub mod import;
pub mod logs;
pub mod prompt;
pub mod roll;
pub mod status;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use rollbook_core::config::ConfigSource;
use rollbook_core::services::logging::events;
use rollbook_core::services::{LogEvent, LoggingService};
use rollbook_core::{Error, RollbookContext};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let app_dir = get_app_dir();
    std::fs::create_dir_all(&app_dir).ok()?;
    LoggingService::new(&app_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Record `command_executed` for a subcommand
pub fn log_command(logger: &Option<LoggingService>, command: &str) {
    log_event(logger, LogEvent::new(events::COMMAND_EXECUTED).with_command(command));
}

/// Record a failed run with the error's kind as detail
pub fn log_failure(
    logger: &Option<LoggingService>,
    event: &str,
    command: &str,
    target: &Path,
    error: &Error,
) {
    log_event(
        logger,
        LogEvent::new(event)
            .with_command(command)
            .with_target(target)
            .with_error(error.to_string())
            .with_error_details(error.kind()),
    );
}

/// Application directory from `ROLLBOOK_DIR`, else `~/.rollbook`
pub fn get_app_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ROLLBOOK_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rollbook")
    }
}

/// Build the context: loads (and if needed creates) config.json
pub fn get_context() -> Result<RollbookContext> {
    let app_dir = get_app_dir();

    std::fs::create_dir_all(&app_dir)
        .with_context(|| format!("Failed to create rollbook directory: {:?}", app_dir))?;

    let ctx = RollbookContext::new(&app_dir).context("Failed to initialize rollbook context")?;

    if ctx.config.source == ConfigSource::Corrupt {
        eprintln!(
            "{}",
            format!(
                "Warning: {} is not valid JSON; using defaults for this run.",
                app_dir.join(rollbook_core::config::CONFIG_FILE).display()
            )
            .yellow()
        );
    }

    Ok(ctx)
}
