//! Append/merge engine
//!
//! Locate -> (Clear) -> Write -> Bound -> Formulate -> Persist. Values are
//! assigned without touching cell formatting; the only formatting writes are the
//! formula column and, for wide profiles, the newly formulated rows.

use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{CellAddress, ImportProfile, RecordSet};
use crate::ports::{SheetGrid, Workbook};

use super::formula::{copy_row_formatting, default_format_source_row, populate_formulas};
use super::locate::{find_anchor_bounds, last_data_row};

/// Outcome of one append run
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppendSummary {
    pub sheet: String,
    pub rows_written: usize,
    pub first_written_row: Option<u32>,
    pub last_written_row: Option<u32>,
    /// Last populated anchor row after the write
    pub last_data_row: Option<u32>,
    /// Inclusive range of rows that received a formula
    pub formula_rows: Option<(u32, u32)>,
    /// Rows blanked by the clear step
    pub cleared_rows: u32,
}

/// Merge `records` into the profile's sheet and save the workbook.
///
/// On a failed save the in-memory workbook is reloaded from its last persisted
/// state, so nothing half-written lingers.
pub fn append_records<W: Workbook>(
    workbook: &mut W,
    profile: &ImportProfile,
    records: &RecordSet,
) -> Result<AppendSummary> {
    let mut summary = AppendSummary {
        sheet: profile.sheet_name.clone(),
        ..Default::default()
    };

    if profile.clear_before_write {
        summary.cleared_rows = clear_region(workbook, &profile.sheet_name, profile.start_cell)?;
        persist(workbook)?;
        workbook.reload()?;
    }

    let sheet = sheet_mut(workbook, &profile.sheet_name)?;
    let anchor = profile.anchor_column();

    // Locate
    let bounds = find_anchor_bounds(sheet, anchor, profile.formula_column);
    let first_row = bounds.next_free_row(profile.start_cell.row);

    // Write
    for (offset, record) in records.rows().iter().enumerate() {
        let row = first_row + offset as u32;
        for (col_offset, value) in record.values.iter().enumerate() {
            sheet.set_value(
                CellAddress::new(row, profile.start_cell.column + col_offset as u32),
                value,
            );
        }
    }
    summary.rows_written = records.len();
    if !records.is_empty() {
        summary.first_written_row = Some(first_row);
        summary.last_written_row = Some(first_row + records.len() as u32 - 1);
    }

    // Bound
    summary.last_data_row = last_data_row(sheet, anchor);

    // Formulate. A complete column has nothing to fill, and populated cells are never rewritten.
    let bounds = find_anchor_bounds(sheet, anchor, profile.formula_column);
    if let (Some(last), false) = (bounds.last_data_row, bounds.formulas_complete) {
        let start = bounds.first_missing_row;
        let source_row = default_format_source_row(start);
        populate_formulas(
            sheet,
            profile.formula_column,
            &profile.formula_template,
            start,
            last,
            Some(source_row),
        );
        if profile.format_span > profile.formula_column {
            copy_row_formatting(sheet, source_row, start, last, profile.format_span);
        }
        summary.formula_rows = Some((start, last));
    }

    // Persist
    persist(workbook)?;
    Ok(summary)
}

/// Blank every value from `start` to the sheet's reported extent. Formats stay.
///
/// Returns the number of rows in the cleared region.
pub fn clear_region<W: Workbook>(workbook: &mut W, sheet_name: &str, start: CellAddress) -> Result<u32> {
    let sheet = sheet_mut(workbook, sheet_name)?;
    let (max_row, max_column) = (sheet.max_row(), sheet.max_column());
    if max_row < start.row || max_column < start.column {
        return Ok(0);
    }
    for row in start.row..=max_row {
        for column in start.column..=max_column {
            sheet.clear_value(CellAddress::new(row, column));
        }
    }
    Ok(max_row - start.row + 1)
}

fn sheet_mut<'a, W: Workbook>(workbook: &'a mut W, name: &str) -> Result<&'a mut W::Sheet> {
    if workbook.sheet(name).is_none() {
        return Err(Error::schema(format!(
            "Sheet '{}' not found in {}",
            name,
            workbook.path().display()
        )));
    }
    workbook
        .sheet_mut(name)
        .ok_or_else(|| Error::schema(format!("Sheet '{}' not found", name)))
}

fn persist<W: Workbook>(workbook: &mut W) -> Result<()> {
    if let Err(e) = workbook.save() {
        // Discard in-memory mutations; the save error is the one worth reporting
        let _ = workbook.reload();
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{CellFormat, MemorySheet, MemoryWorkbook};
    use crate::domain::{CellValue, FormulaTemplate, Record};
    use crate::domain::schema::SchemaKind;

    fn profile(clear: bool, span: u32) -> ImportProfile {
        ImportProfile {
            kind: SchemaKind::Transactions,
            sheet_name: "Data".into(),
            start_cell: CellAddress::new(2, 2),
            formula_column: 1,
            formula_template: FormulaTemplate::new("=F({row})"),
            format_span: span,
            clear_before_write: clear,
        }
    }

    fn existing_sheet(data_rows: u32) -> MemorySheet {
        let mut sheet = MemorySheet::new();
        sheet.set_value(CellAddress::new(1, 2), &CellValue::from("Key"));
        sheet.set_value(CellAddress::new(1, 3), &CellValue::from("Amount"));
        for row in 2..2 + data_rows {
            sheet.set_value(CellAddress::new(row, 2), &CellValue::from(format!("old{}", row).as_str()));
            sheet.set_formula(CellAddress::new(row, 1), &format!("=F({})", row));
            for column in 1..=3 {
                sheet.set_format(
                    CellAddress::new(row, column),
                    CellFormat::new("#,##0.00", Some("FFDDEBF7")),
                );
            }
        }
        sheet
    }

    fn records(keys: &[&str]) -> RecordSet {
        let mut rs = RecordSet::new(vec!["Key".into(), "Amount".into()]);
        for (i, key) in keys.iter().enumerate() {
            rs.push(Record::new(vec![
                CellValue::from(*key),
                CellValue::Number((i as i64 + 1).into()),
            ]));
        }
        rs
    }

    #[test]
    fn test_append_after_existing_rows() {
        let mut wb = MemoryWorkbook::new("book.xlsx").with_sheet("Data", existing_sheet(3));
        let summary = append_records(&mut wb, &profile(false, 3), &records(&["a", "b"])).unwrap();

        assert_eq!(summary.first_written_row, Some(5));
        assert_eq!(summary.last_written_row, Some(6));
        assert_eq!(summary.last_data_row, Some(6));
        assert_eq!(summary.formula_rows, Some((5, 6)));
        assert_eq!(wb.save_count(), 1);

        let sheet = wb.persisted_sheet("Data").unwrap();
        assert_eq!(sheet.value(CellAddress::new(4, 2)), CellValue::from("old4"));
        assert_eq!(sheet.value(CellAddress::new(5, 2)), CellValue::from("a"));
        assert_eq!(sheet.formula(CellAddress::new(6, 1)).as_deref(), Some("=F(6)"));
        assert_eq!(sheet.format(CellAddress::new(6, 3)).fill.as_deref(), Some("FFDDEBF7"));
    }

    #[test]
    fn test_populated_rows_equal_existing_plus_new() {
        // M counts the header row
        for (existing, new) in [(0u32, 3usize), (4, 2), (1, 0)] {
            let mut wb = MemoryWorkbook::new("b.xlsx").with_sheet("Data", existing_sheet(existing));
            let keys: Vec<String> = (0..new).map(|i| format!("k{}", i)).collect();
            let keys: Vec<&str> = keys.iter().map(|s| s.as_str()).collect();
            append_records(&mut wb, &profile(false, 1), &records(&keys)).unwrap();

            let sheet = wb.persisted_sheet("Data").unwrap();
            let m = existing as usize + 1;
            let anchor_rows = (1..=sheet.max_row())
                .filter(|r| sheet.is_populated(CellAddress::new(*r, 2)))
                .count();
            let formula_rows: Vec<u32> = (1..=sheet.max_row())
                .filter(|r| sheet.formula(CellAddress::new(*r, 1)).is_some())
                .collect();
            assert_eq!(anchor_rows, m + new);
            assert_eq!(formula_rows.len(), m + new - 1);
            if let (Some(first), Some(last)) = (formula_rows.first(), formula_rows.last()) {
                assert_eq!(*first, 2);
                assert_eq!(*last as usize, m + new);
            }
        }
    }

    #[test]
    fn test_cells_outside_written_region_are_untouched() {
        let mut sheet = existing_sheet(2);
        let outside = CellAddress::new(1, 8);
        sheet.set_value(outside, &CellValue::from("note"));
        sheet.set_format(outside, CellFormat::new("@", Some("FFFFFF00")));
        let before = sheet.cell(outside).cloned();

        let mut wb = MemoryWorkbook::new("b.xlsx").with_sheet("Data", sheet);
        append_records(&mut wb, &profile(false, 3), &records(&["x"])).unwrap();

        let after = wb.persisted_sheet("Data").unwrap().cell(outside).cloned();
        assert_eq!(before, after);
        let old_row = wb.persisted_sheet("Data").unwrap().format(CellAddress::new(2, 2));
        assert_eq!(old_row, CellFormat::new("#,##0.00", Some("FFDDEBF7")));
    }

    #[test]
    fn test_manual_value_in_formula_column_is_kept() {
        let mut sheet = existing_sheet(2);
        sheet.set_value(CellAddress::new(2, 1), &CellValue::from("Manual"));
        let mut wb = MemoryWorkbook::new("b.xlsx").with_sheet("Data", sheet);
        let summary = append_records(&mut wb, &profile(false, 1), &records(&["new"])).unwrap();

        assert_eq!(summary.formula_rows, Some((4, 4)));
        let sheet = wb.persisted_sheet("Data").unwrap();
        assert_eq!(sheet.value(CellAddress::new(2, 1)), CellValue::from("Manual"));
        assert_eq!(sheet.formula(CellAddress::new(2, 1)), None);
        assert_eq!(sheet.formula(CellAddress::new(3, 1)).as_deref(), Some("=F(3)"));
        assert_eq!(sheet.formula(CellAddress::new(4, 1)).as_deref(), Some("=F(4)"));
    }

    #[test]
    fn test_complete_formula_column_is_left_alone() {
        let mut sheet = existing_sheet(3);
        sheet.set_value(CellAddress::new(3, 1), &CellValue::from("Manual"));
        let mut wb = MemoryWorkbook::new("b.xlsx").with_sheet("Data", sheet);
        let summary = append_records(&mut wb, &profile(false, 1), &RecordSet::default()).unwrap();

        assert_eq!(summary.formula_rows, None);
        let sheet = wb.persisted_sheet("Data").unwrap();
        assert_eq!(sheet.value(CellAddress::new(3, 1)), CellValue::from("Manual"));
        assert_eq!(sheet.formula(CellAddress::new(2, 1)).as_deref(), Some("=F(2)"));
        assert_eq!(sheet.formula(CellAddress::new(4, 1)).as_deref(), Some("=F(4)"));
    }

    #[test]
    fn test_write_denied_discards_changes() {
        let mut wb = MemoryWorkbook::new("b.xlsx").with_sheet("Data", existing_sheet(2));
        wb.deny_writes(true);
        let err = append_records(&mut wb, &profile(false, 1), &records(&["x"])).unwrap_err();
        assert!(matches!(err, Error::WriteDenied(_)));

        let live = wb.sheet("Data").unwrap();
        assert_eq!(live.value(CellAddress::new(4, 2)), CellValue::Empty);
        assert_eq!(wb.save_count(), 0);
    }

    #[test]
    fn test_clear_then_write_drops_stale_rows() {
        let mut wb = MemoryWorkbook::new("b.xlsx").with_sheet("Data", existing_sheet(5));
        let summary = append_records(&mut wb, &profile(true, 1), &records(&["new1", "new2"])).unwrap();

        assert_eq!(summary.cleared_rows, 5);
        assert_eq!(summary.first_written_row, Some(2));
        assert_eq!(summary.last_data_row, Some(3));
        assert_eq!(wb.save_count(), 2);

        let sheet = wb.persisted_sheet("Data").unwrap();
        assert_eq!(sheet.value(CellAddress::new(2, 2)), CellValue::from("new1"));
        assert_eq!(sheet.value(CellAddress::new(4, 2)), CellValue::Empty);
        // Header row and formats survive the clear
        assert_eq!(sheet.value(CellAddress::new(1, 2)), CellValue::from("Key"));
        assert_eq!(sheet.format(CellAddress::new(6, 2)).number_format, "#,##0.00");
    }

    #[test]
    fn test_missing_sheet_is_schema_error() {
        let mut wb = MemoryWorkbook::new("b.xlsx").with_sheet("Other", MemorySheet::new());
        let err = append_records(&mut wb, &profile(false, 1), &records(&["x"])).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_empty_sheet_and_no_records_is_noop() {
        let mut wb = MemoryWorkbook::new("b.xlsx").with_sheet("Data", MemorySheet::new());
        let summary = append_records(&mut wb, &profile(false, 1), &RecordSet::default()).unwrap();
        assert_eq!(summary.rows_written, 0);
        assert_eq!(summary.formula_rows, None);
        assert_eq!(wb.persisted_sheet("Data").unwrap().max_row(), 0);
    }
}
