//! Row-range locator: where existing data ends and where formulas stop

use serde::Serialize;

use crate::domain::address::FIRST_DATA_ROW;
use crate::domain::CellAddress;
use crate::ports::SheetGrid;

/// Data extent of one sheet, measured on its anchor and formula columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnchorBounds {
    /// Lowest data row whose formula cell is empty; row 2 when none is
    pub first_missing_row: u32,
    /// Highest data row whose anchor cell is populated; `None` for a sheet without data
    pub last_data_row: Option<u32>,
    /// True when no formula cell in `2..=last_data_row` is empty
    pub formulas_complete: bool,
}

impl AnchorBounds {
    /// Rows that still need a formula
    pub fn pending_formula_rows(&self) -> u32 {
        match self.last_data_row {
            Some(last) if !self.formulas_complete && last >= self.first_missing_row => {
                last - self.first_missing_row + 1
            }
            _ => 0,
        }
    }

    /// Next row an append would write to
    pub fn next_free_row(&self, start_row: u32) -> u32 {
        match self.last_data_row {
            Some(last) => start_row.max(last + 1),
            None => start_row,
        }
    }
}

/// Highest row >= 2 with a populated anchor cell, scanning up from the reported extent.
///
/// Trailing rows left blank by a previous clear are skipped.
pub fn last_data_row<S: SheetGrid + ?Sized>(sheet: &S, anchor_column: u32) -> Option<u32> {
    (FIRST_DATA_ROW..=sheet.max_row())
        .rev()
        .find(|row| sheet.is_populated(CellAddress::new(*row, anchor_column)))
}

pub fn find_anchor_bounds<S: SheetGrid + ?Sized>(
    sheet: &S,
    anchor_column: u32,
    formula_column: u32,
) -> AnchorBounds {
    let last = last_data_row(sheet, anchor_column);

    let missing = last.and_then(|last| {
        (FIRST_DATA_ROW..=last)
            .find(|row| !sheet.is_populated(CellAddress::new(*row, formula_column)))
    });

    AnchorBounds {
        first_missing_row: missing.unwrap_or(FIRST_DATA_ROW),
        last_data_row: last,
        formulas_complete: missing.is_none(),
    }
}
