//! CSV feed schemas: which cleaner applies to which column

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::Error;

/// The two brokerage feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Transactions,
    Investments,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Transactions => "transactions",
            SchemaKind::Investments => "investments",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "transactions" => Ok(SchemaKind::Transactions),
            "investments" => Ok(SchemaKind::Investments),
            other => Err(Error::validation(format!("Unknown feed: {}", other))),
        }
    }
}

/// How a column's raw text is turned into a cell value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnCleaner {
    /// Strip currency symbols; unparsed text is kept as text
    CurrencyLike,
    /// Strip currency symbols; unparsed text becomes empty
    Numeric,
    /// First-row `$` / later-row `p` price quirk
    Price,
    /// Strip `%`
    Percentage,
    /// Day-first date; unparsed becomes empty with a warning
    DayFirstDate,
}

/// Columns the transactions feed derives values for
pub mod transactions {
    pub const DATE: &str = "Date";
    pub const SETTLEMENT_DATE: &str = "Settlement Date";
    pub const DESCRIPTION: &str = "Description";
    pub const QUANTITY: &str = "Quantity";
    pub const PRICE: &str = "Price";
    pub const DEBIT: &str = "Debit";
    pub const CREDIT: &str = "Credit";
    pub const RUNNING_BALANCE: &str = "Running Balance";

    /// Description prefixes whose credits keep a positive quantity
    pub const INCOME_MARKERS: &[&str] = &["Div", "GROSS INTEREST"];
}

/// Columns the investments feed cleans
pub mod investments {
    pub const PRICE: &str = "Price";
    pub const DAY_GAIN_LOSS: &str = "Day Gain/Loss";
    pub const DAY_GAIN_LOSS_PCT: &str = "Day Gain/Loss %";
    pub const MARKET_VALUE: &str = "Market Value £";
    pub const BOOK_COST: &str = "Book Cost";
    pub const GAIN_LOSS: &str = "Gain/Loss";
    pub const GAIN_LOSS_PCT: &str = "Gain/Loss %";
}

/// Declared cleaners for one feed
#[derive(Debug, Clone)]
pub struct CsvSchema {
    pub kind: SchemaKind,
    pub columns: Vec<(&'static str, ColumnCleaner)>,
    pub required: Vec<&'static str>,
}

impl CsvSchema {
    pub fn for_kind(kind: SchemaKind) -> Self {
        match kind {
            SchemaKind::Transactions => Self::transactions(),
            SchemaKind::Investments => Self::investments(),
        }
    }

    pub fn transactions() -> Self {
        use transactions::*;
        Self {
            kind: SchemaKind::Transactions,
            columns: vec![
                (DATE, ColumnCleaner::DayFirstDate),
                (SETTLEMENT_DATE, ColumnCleaner::DayFirstDate),
                (QUANTITY, ColumnCleaner::Numeric),
                (PRICE, ColumnCleaner::CurrencyLike),
                (DEBIT, ColumnCleaner::Numeric),
                (CREDIT, ColumnCleaner::Numeric),
                (RUNNING_BALANCE, ColumnCleaner::Numeric),
            ],
            required: vec![DATE],
        }
    }

    pub fn investments() -> Self {
        use investments::*;
        Self {
            kind: SchemaKind::Investments,
            columns: vec![
                (PRICE, ColumnCleaner::Price),
                (DAY_GAIN_LOSS, ColumnCleaner::Numeric),
                (DAY_GAIN_LOSS_PCT, ColumnCleaner::Percentage),
                (MARKET_VALUE, ColumnCleaner::Numeric),
                (BOOK_COST, ColumnCleaner::Numeric),
                (GAIN_LOSS, ColumnCleaner::Numeric),
                (GAIN_LOSS_PCT, ColumnCleaner::Percentage),
            ],
            required: Vec::new(),
        }
    }

    pub fn cleaner_for(&self, column: &str) -> Option<ColumnCleaner> {
        self.columns
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, cleaner)| *cleaner)
    }
}
