//! Roll command - copy the workbook forward to the next business date

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use super::prompt::TerminalPrompter;
use super::{get_context, get_logger, log_command, log_event, log_failure};
use crate::output;
use rollbook_core::ports::Prompter;
use rollbook_core::services::logging::events;
use rollbook_core::services::{parse_business_date, previous_business_day, LogEvent, RollOutcome};

const COMMAND: &str = "roll";

pub fn run(workbook: Option<PathBuf>, date: Option<String>, yes: bool, json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    let logger = get_logger();
    log_command(&logger, COMMAND);

    let prompter = TerminalPrompter::new(yes);

    let source = match workbook {
        Some(path) => path,
        None => {
            let current = ctx.config.excel_path.clone();
            match prompter.pick_file("Workbook to roll forward", Some(&current))? {
                Some(path) => path,
                None => {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
        }
    };

    let date = match date {
        Some(d) => d,
        None => {
            let default = previous_business_day(Local::now().date_naive());
            match prompter.pick_date("Business date (MM/DD/YYYY)", default)? {
                Some(d) => d,
                None => {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
        }
    };

    let outcome = parse_business_date(&date).and_then(|target| {
        ctx.roll_service
            .roll_forward(&mut ctx.config, &source, target, &prompter)
    });

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            log_failure(&logger, events::ROLL_FAILED, COMMAND, &source, &e);
            return Err(e.into());
        }
    };

    match &outcome {
        RollOutcome::Rolled(result) => {
            log_event(
                &logger,
                LogEvent::new(events::ROLL_COMPLETED)
                    .with_command(COMMAND)
                    .with_target(&result.destination)
                    .with_detail(format!(
                        "from={} overwritten={} run={}",
                        result.source_date, result.overwritten, result.run_id
                    )),
            );
        }
        RollOutcome::Cancelled { destination } => {
            log_event(
                &logger,
                LogEvent::new(events::ROLL_CANCELLED)
                    .with_command(COMMAND)
                    .with_target(destination),
            );
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        RollOutcome::Rolled(result) => {
            output::success(&format!(
                "Rolled {} to {}",
                result.source.display(),
                result.destination.display()
            ));
            println!(
                "  Business date: {} -> {}",
                result.source_date.format("%m/%d/%Y"),
                result.target_date.format("%m/%d/%Y")
            );
            if result.overwritten {
                output::warning("  Existing file was overwritten");
            }
            println!("  Active workbook is now {}", result.destination.display().to_string().bold());
        }
        RollOutcome::Cancelled { destination } => {
            output::warning(&format!(
                "Cancelled: {} already exists and was left untouched.",
                destination.display()
            ));
        }
    }

    Ok(())
}
