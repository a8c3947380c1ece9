//! Import command - merge a brokerage CSV export into the workbook

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use super::prompt::TerminalPrompter;
use super::{get_context, get_logger, log_command, log_event, log_failure};
use crate::output;
use rollbook_core::ports::Prompter;
use rollbook_core::services::logging::events;
use rollbook_core::services::{ImportPreview, ImportResult, LoadReport, LogEvent, DEFAULT_PREVIEW_ROWS};
use rollbook_core::SchemaKind;

#[derive(Subcommand)]
pub enum ImportCommands {
    /// Append the Transactions export to the Transactions sheet
    Transactions(ImportArgs),
    /// Replace the Investments sheet with the Investments export
    Investments(ImportArgs),
}

#[derive(Args)]
pub struct ImportArgs {
    /// CSV export to read (defaults to the configured path)
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Workbook to write (defaults to the configured one)
    #[arg(long)]
    workbook: Option<PathBuf>,
    /// Show normalized rows without writing
    #[arg(long)]
    preview: bool,
    /// Rows to show with --preview
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    limit: usize,
    /// Import even if this exact CSV was already imported into the workbook
    #[arg(long)]
    force: bool,
    /// Answer yes to confirmation prompts
    #[arg(long, short)]
    yes: bool,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(command: ImportCommands) -> Result<()> {
    match command {
        ImportCommands::Transactions(args) => import(SchemaKind::Transactions, args),
        ImportCommands::Investments(args) => import(SchemaKind::Investments, args),
    }
}

fn import(kind: SchemaKind, args: ImportArgs) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    let command = format!("import {}", kind);
    log_command(&logger, &command);

    let csv = args
        .csv
        .unwrap_or_else(|| ctx.config.csv_path(kind).to_path_buf());
    let workbook = args.workbook.unwrap_or_else(|| ctx.config.excel_path.clone());

    if args.preview {
        let preview = ctx.import_service.preview(kind, &csv, args.limit)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&preview)?);
        } else {
            print_preview(&preview);
        }
        return Ok(());
    }

    let loaded = match ctx.import_service.load(kind, &csv) {
        Ok(loaded) => loaded,
        Err(e) => {
            log_failure(&logger, events::IMPORT_FAILED, &command, &workbook, &e);
            return Err(e.into());
        }
    };

    if !args.force {
        let seen = logger
            .as_ref()
            .and_then(|l| l.has_import(&workbook, &loaded.digest).ok())
            .unwrap_or(false);
        if seen {
            let prompter = TerminalPrompter::new(args.yes);
            let again = prompter.confirm(&format!(
                "{} was already imported into {}. Import it again?",
                csv.display(),
                workbook.display()
            ))?;
            if !again {
                if args.json {
                    println!(
                        "{}",
                        serde_json::json!({"status": "skipped", "digest": loaded.digest})
                    );
                } else {
                    output::warning("Skipped: this CSV is already in the workbook (use --force to import anyway).");
                }
                return Ok(());
            }
        }
    }

    let result = match ctx.import_service.import_file(kind, &loaded, &workbook) {
        Ok(result) => result,
        Err(e) => {
            log_failure(&logger, events::IMPORT_FAILED, &command, &workbook, &e);
            return Err(e.into());
        }
    };

    log_event(
        &logger,
        LogEvent::new(events::IMPORT_COMPLETED)
            .with_command(&command)
            .with_target(&workbook)
            .with_digest(&result.digest)
            .with_detail(format!(
                "rows={} run={}",
                result.summary.rows_written, result.run_id
            )),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    Ok(())
}

fn print_preview(preview: &ImportPreview) {
    println!(
        "{} {} ({} rows, showing {})",
        "Preview:".bold(),
        preview.csv.display(),
        preview.total_rows,
        preview.rows.len()
    );

    let mut table = output::create_table(&preview.columns);
    for row in &preview.rows {
        table.add_row(row.clone());
    }
    println!("{}", table);

    print_report(&preview.report);
}

fn print_result(result: &ImportResult) {
    let summary = &result.summary;
    if summary.rows_written == 0 {
        output::info(&format!("No rows in {}; workbook unchanged.", result.csv.display()));
        print_report(&result.report);
        return;
    }

    output::success(&format!(
        "Imported {} {} rows into '{}' of {}",
        summary.rows_written,
        result.feed,
        summary.sheet,
        result.workbook.display()
    ));

    if summary.cleared_rows > 0 {
        output::field("Cleared rows", summary.cleared_rows);
    }
    if let (Some(first), Some(last)) = (summary.first_written_row, summary.last_written_row) {
        output::field("Rows written", format!("{}-{}", first, last));
    }
    match summary.formula_rows {
        Some((start, end)) => output::field("Formulas filled", format!("rows {}-{}", start, end)),
        None => output::field("Formulas filled", "none needed"),
    }
    println!("  {}", format!("Run: {}", result.run_id).dimmed());

    print_report(&result.report);
}

fn print_report(report: &LoadReport) {
    for line in report.summary_lines() {
        output::warning(&format!("  {}", line));
    }
}
