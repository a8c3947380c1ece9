//! Sheet layout for each feed: where rows land and which formula fills column A

use serde::Serialize;

use super::address::CellAddress;
use super::schema::SchemaKind;

/// Placeholder substituted with the row number
pub const ROW_PLACEHOLDER: &str = "{row}";

pub const TRANSACTIONS_SHEET: &str = "Transactions";
pub const TRANSACTIONS_FORMULA: &str = "=IF(ISERROR(VLOOKUP(D{row},MapName!A:D,4,0)),VLOOKUP(H{row},MapEdgeCases!A:B,2,0),VLOOKUP(D{row},MapName!A:D,4,0))";
/// A:M
pub const TRANSACTIONS_MAX_COLUMN: u32 = 13;

pub const INVESTMENTS_SHEET: &str = "Investments";
pub const INVESTMENTS_FORMULA: &str = "=IF(ISERROR(VLOOKUP(B{row},MapName!A:D,4,0)),\"\",VLOOKUP(B{row},MapName!A:D,4,0))";
/// A only
pub const INVESTMENTS_MAX_COLUMN: u32 = 1;

/// A lookup formula with `{row}` placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormulaTemplate(String);

impl FormulaTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Substitute every placeholder with `row`
    pub fn render(&self, row: u32) -> String {
        self.0.replace(ROW_PLACEHOLDER, &row.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Where and how a feed is merged into the workbook
#[derive(Debug, Clone, Serialize)]
pub struct ImportProfile {
    pub kind: SchemaKind,
    pub sheet_name: String,
    /// First data cell; its column is the anchor column
    pub start_cell: CellAddress,
    /// Column holding the derived lookup formula
    pub formula_column: u32,
    pub formula_template: FormulaTemplate,
    /// Formats of columns 1..=format_span are copied onto appended rows
    pub format_span: u32,
    /// Blank the data region (values only) before writing
    pub clear_before_write: bool,
}

impl ImportProfile {
    pub fn for_kind(kind: SchemaKind) -> Self {
        match kind {
            SchemaKind::Transactions => Self::transactions(),
            SchemaKind::Investments => Self::investments(),
        }
    }

    pub fn transactions() -> Self {
        Self {
            kind: SchemaKind::Transactions,
            sheet_name: TRANSACTIONS_SHEET.to_string(),
            start_cell: CellAddress::new(2, 2),
            formula_column: 1,
            formula_template: FormulaTemplate::new(TRANSACTIONS_FORMULA),
            format_span: TRANSACTIONS_MAX_COLUMN,
            clear_before_write: false,
        }
    }

    pub fn investments() -> Self {
        Self {
            kind: SchemaKind::Investments,
            sheet_name: INVESTMENTS_SHEET.to_string(),
            start_cell: CellAddress::new(2, 2),
            formula_column: 1,
            formula_template: FormulaTemplate::new(INVESTMENTS_FORMULA),
            format_span: INVESTMENTS_MAX_COLUMN,
            clear_before_write: true,
        }
    }

    pub fn anchor_column(&self) -> u32 {
        self.start_cell.column
    }
}
