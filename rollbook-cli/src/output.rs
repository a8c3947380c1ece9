//! Terminal output helpers shared by the commands

use std::fmt::Display;

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Row, Table};

/// Width labels are padded to in `field` lines
const LABEL_WIDTH: usize = 18;

pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Errors go to stderr
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// One indented `Label: value` line under a section title
pub fn field(label: &str, value: impl Display) {
    println!("  {:<width$}{}", format!("{}:", label), value, width = LABEL_WIDTH);
}

pub fn create_table(header: impl Into<Row>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Optional row number for tables
pub fn row_or_dash(row: Option<u32>) -> String {
    row.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string())
}
