//! Config command - show or change config.json

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::{get_context, get_logger, log_command};
use crate::output;
use rollbook_core::config::{FolderLayout, CONFIG_FILE};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the folder rolled workbooks are written under
    SetBasePath {
        path: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the active workbook
    SetWorkbook {
        path: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let mut ctx = get_context()?;
    let logger = get_logger();

    match command {
        ConfigCommands::Show { json } => {
            log_command(&logger, "config show");
            if json {
                println!("{}", serde_json::to_string_pretty(&ctx.config)?);
                return Ok(());
            }

            let layout = match ctx.config.folder_layout {
                FolderLayout::Flat => "flat",
                FolderLayout::YearMonth => "year_month (YYYY/MM)",
            };
            println!("{}", "Configuration".bold());
            output::field("File", ctx.app_dir.join(CONFIG_FILE).display());
            output::field("Base path", ctx.config.base_path.display());
            output::field("Workbook", ctx.config.excel_path.display());
            output::field("Transactions CSV", ctx.config.transactions_csv.display());
            output::field("Investments CSV", ctx.config.investments_csv.display());
            output::field("Folder layout", layout);
        }
        ConfigCommands::SetBasePath { path, json } => {
            log_command(&logger, "config set-base-path");
            ctx.config.set_base_path(&path);
            ctx.save_config()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ctx.config)?);
            } else {
                output::success(&format!("Base path set to {}", path.display()));
            }
        }
        ConfigCommands::SetWorkbook { path, json } => {
            log_command(&logger, "config set-workbook");
            ctx.config.set_excel_path(&path);
            ctx.save_config()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ctx.config)?);
                return Ok(());
            }
            if !path.exists() {
                output::warning(&format!("{} does not exist yet", path.display()));
            }
            output::success(&format!("Active workbook set to {}", path.display()));
        }
    }

    Ok(())
}
