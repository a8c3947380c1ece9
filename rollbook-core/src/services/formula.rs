//! Formula populator for the derived lookup column

use crate::domain::address::FIRST_DATA_ROW;
use crate::domain::{CellAddress, FormulaTemplate};
use crate::ports::SheetGrid;

/// Row whose formatting is copied onto rows starting at `start_row`.
/// Never the header row.
pub fn default_format_source_row(start_row: u32) -> u32 {
    if start_row > FIRST_DATA_ROW {
        start_row - 1
    } else {
        FIRST_DATA_ROW
    }
}

/// Write `template` rendered per row into `formula_column` for `start_row..=end_row`,
/// copying number format and fill from `format_source_row` (see
/// [`default_format_source_row`] when `None`).
///
/// Returns the number of formulas written; `start_row > end_row` writes nothing.
pub fn populate_formulas<S: SheetGrid + ?Sized>(
    sheet: &mut S,
    formula_column: u32,
    template: &FormulaTemplate,
    start_row: u32,
    end_row: u32,
    format_source_row: Option<u32>,
) -> u32 {
    if start_row > end_row {
        return 0;
    }
    let source = CellAddress::new(
        format_source_row.unwrap_or_else(|| default_format_source_row(start_row)),
        formula_column,
    );

    for row in start_row..=end_row {
        let target = source.with_row(row);
        sheet.set_formula(target, &template.render(row));
        if target != source {
            sheet.copy_format(source, target);
        }
    }
    end_row - start_row + 1
}

/// Copy number format and fill of columns `1..=max_column` from `source_row`
/// onto every row in `start_row..=end_row`
pub fn copy_row_formatting<S: SheetGrid + ?Sized>(
    sheet: &mut S,
    source_row: u32,
    start_row: u32,
    end_row: u32,
    max_column: u32,
) {
    for row in start_row..=end_row {
        if row == source_row {
            continue;
        }
        for column in 1..=max_column {
            sheet.copy_format(CellAddress::new(source_row, column), CellAddress::new(row, column));
        }
    }
}
