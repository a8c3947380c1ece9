//! Logs command - inspect and prune the import/roll event log

use anyhow::{bail, Result};
use chrono::{TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use super::get_app_dir;
use crate::output;
use rollbook_core::services::logging::{now_ms, LogEntry};
use rollbook_core::services::LoggingService;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Errors echoed under the `logs list` table
const RECENT_ERRORS_SHOWN: usize = 3;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent imports, rolls and commands
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only failures
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete entries older than a number of days
    Clear {
        /// Age threshold in days
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show entry counts per event and where the log lives
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: LogsCommands) -> Result<()> {
    let log = LoggingService::new(&get_app_dir(), env!("CARGO_PKG_VERSION"))?;
    match command {
        LogsCommands::List { limit, errors, json } => list(&log, limit, errors, json),
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => clear(&log, older_than_days, force, json),
        LogsCommands::Stats { json } => stats(&log, json),
    }
}

fn list(log: &LoggingService, limit: usize, errors_only: bool, json: bool) -> Result<()> {
    let entries = if errors_only {
        log.get_errors(limit)?
    } else {
        log.get_recent(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("Event log is empty.");
        return Ok(());
    }

    let mut table = output::create_table(["Time", "Event", "Workbook / CSV", "Failed"]);
    for entry in &entries {
        let failed = match entry.error_message {
            Some(_) => "yes".red().to_string(),
            None => String::new(),
        };
        table.add_row(vec![stamp(entry.timestamp), entry.event.clone(), describe(entry), failed]);
    }
    println!("{}", table);

    if errors_only {
        return Ok(());
    }
    let failures = log.get_errors(RECENT_ERRORS_SHOWN)?;
    if !failures.is_empty() {
        println!();
        println!("{}", "Latest failures".red().bold());
        for entry in &failures {
            println!(
                "  {} {}: {}",
                stamp(entry.timestamp).dimmed(),
                entry.event,
                entry.error_message.as_deref().unwrap_or("no message")
            );
        }
    }
    Ok(())
}

fn clear(log: &LoggingService, older_than_days: u64, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        if atty::isnt(atty::Stream::Stdin) {
            bail!("Refusing to clear logs without a terminal; pass --force");
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete log entries older than {} days?", older_than_days))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let cutoff = now_ms() - older_than_days as i64 * DAY_MS;
    let deleted = log.delete_before(cutoff)?;
    if json {
        println!("{}", serde_json::json!({ "deleted": deleted }));
    } else {
        output::success(&format!("Removed {} entries", deleted));
    }
    Ok(())
}

fn stats(log: &LoggingService, json: bool) -> Result<()> {
    let total = log.count()?;
    let per_event = log.event_counts()?;
    let failures = log.error_count()?;
    let path = log.db_path();
    let bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    if json {
        let events: serde_json::Map<_, _> = per_event
            .iter()
            .map(|(event, n)| (event.clone(), serde_json::json!(n)))
            .collect();
        let body = serde_json::json!({
            "total_entries": total,
            "error_count": failures,
            "events": events,
            "database_path": path.to_string_lossy(),
            "database_size_bytes": bytes,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("{}", "Event log".bold());
    output::field("Entries", total);
    output::field("Failures", failures);
    output::field("Database", path.display());
    output::field("Size", human_size(bytes));
    if !per_event.is_empty() {
        let mut table = output::create_table(["Event", "Count"]);
        for (event, n) in &per_event {
            table.add_row(vec![event.clone(), n.to_string()]);
        }
        println!("{}", table);
    }
    Ok(())
}

/// Command, target file and detail, whichever are present
fn describe(entry: &LogEntry) -> String {
    [&entry.command, &entry.target, &entry.detail]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" | ")
}

fn stamp(timestamp_ms: i64) -> String {
    match Utc.timestamp_millis_opt(timestamp_ms).single() {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp_ms.to_string(),
    }
}

fn human_size(bytes: u64) -> String {
    match bytes {
        b if b >= 1 << 20 => format!("{:.1} MB", b as f64 / (1u64 << 20) as f64),
        b if b >= 1 << 10 => format!("{:.1} KB", b as f64 / (1u64 << 10) as f64),
        b => format!("{} bytes", b),
    }
}
