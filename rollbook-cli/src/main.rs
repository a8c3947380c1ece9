//! Rollbook CLI - brokerage CSV imports and workbook roll-forward

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{config, import, logs, roll, status};

/// Rollbook - keep the investment workbook current
#[derive(Parser)]
#[command(name = "rb", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a brokerage CSV export into the workbook
    Import {
        #[command(subcommand)]
        command: import::ImportCommands,
    },

    /// Copy the workbook to a new file dated for the next business day
    Roll {
        /// Workbook to roll (defaults to the configured one)
        #[arg(long)]
        workbook: Option<PathBuf>,
        /// Target business date, MM/DD/YYYY or YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// Overwrite an existing destination without asking
        #[arg(long, short)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the active workbook and how far each sheet is filled
    Status {
        /// Workbook to inspect (defaults to the configured one)
        #[arg(long)]
        workbook: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Import { command } => import::run(command),
        Commands::Roll { workbook, date, yes, json } => roll::run(workbook, date, yes, json),
        Commands::Status { workbook, json } => status::run(workbook, json),
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
