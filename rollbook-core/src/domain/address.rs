//! A1-style cell addressing

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// First row that may hold data; row 1 is reserved for headers
pub const FIRST_DATA_ROW: u32 = 2;

/// A 1-based (row, column) cell address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellAddress {
    pub row: u32,
    pub column: u32,
}

impl CellAddress {
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Parse an A1 reference such as `B2` (case-insensitive, `$` markers ignored)
    pub fn parse(a1: &str) -> Result<Self> {
        let cleaned: String = a1.trim().chars().filter(|c| *c != '$').collect();
        let split = cleaned
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| Error::validation(format!("Invalid cell reference: {}", a1)))?;
        let (letters, digits) = cleaned.split_at(split);

        let column = column_index(letters)
            .ok_or_else(|| Error::validation(format!("Invalid column in cell reference: {}", a1)))?;
        let row: u32 = digits
            .parse()
            .ok()
            .filter(|r| *r > 0)
            .ok_or_else(|| Error::validation(format!("Invalid row in cell reference: {}", a1)))?;

        Ok(Self { row, column })
    }

    pub fn with_row(self, row: u32) -> Self {
        Self { row, ..self }
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letter(self.column), self.row)
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Convert a column letter sequence (`A`, `M`, `AA`) to its 1-based index
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0u32, |acc, c| {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })
}

/// Convert a 1-based column index to its letter sequence
pub fn column_letter(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        column = (column - 1) / 26;
    }
    letters.iter().rev().collect()
}
