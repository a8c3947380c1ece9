//! Status command - show the active workbook and sheet fill levels

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use super::{get_context, get_logger, log_command};
use crate::output;

pub fn run(workbook: Option<PathBuf>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    log_command(&logger, "status");

    let path = workbook.unwrap_or_else(|| ctx.config.excel_path.clone());
    let status = ctx.status_service.get_status(&path)?;

    if json {
        let output = serde_json::json!({
            "config": &ctx.config,
            "status": &status,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Rollbook Status".bold());
    println!();
    output::field("Workbook", status.workbook.display());
    match (&status.file_date, &status.naming_error) {
        (Some(date), _) => output::field("File date", date.format("%m/%d/%Y")),
        (None, Some(err)) => output::warning(&format!("  {}", err)),
        (None, None) => {}
    }
    output::field("Output root", ctx.config.base_path.display());

    if !status.exists {
        println!();
        output::warning("Workbook not found. Roll forward or set one with 'rb config set-workbook'.");
        return Ok(());
    }

    let mut table = output::create_table([
        "Sheet",
        "Last data row",
        "Formula gap from",
        "Pending formulas",
    ]);
    for sheet in &status.sheets {
        if !sheet.present {
            table.add_row(vec![
                sheet.name.clone(),
                "missing".red().to_string(),
                "-".to_string(),
                "-".to_string(),
            ]);
            continue;
        }
        table.add_row(vec![
            sheet.name.clone(),
            output::row_or_dash(sheet.last_data_row),
            output::row_or_dash(sheet.first_missing_row),
            sheet.pending_formula_rows.to_string(),
        ]);
    }

    println!();
    println!("{}", table);

    Ok(())
}
