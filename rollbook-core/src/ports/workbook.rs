//! Workbook port - spreadsheet grid abstraction
//!
//! Services mutate workbooks only through these traits, so the append engine
//! runs the same against an xlsx file or an in-memory grid.

use std::path::Path;

use crate::domain::result::Result;
use crate::domain::{CellAddress, CellValue};

/// A single worksheet: a 2-D grid whose cells carry a value, a number format
/// and a fill that can be set independently.
pub trait SheetGrid {
    /// Highest row the sheet reports as used (values or styles)
    fn max_row(&self) -> u32;

    /// Highest column the sheet reports as used
    fn max_column(&self) -> u32;

    /// Stored value; formula cells report their cached value
    fn value(&self, at: CellAddress) -> CellValue;

    /// Formula text including the leading `=`
    fn formula(&self, at: CellAddress) -> Option<String>;

    /// Assign a value. Number format and fill are left untouched.
    fn set_value(&mut self, at: CellAddress, value: &CellValue);

    /// Blank the value. Number format and fill are left untouched.
    fn clear_value(&mut self, at: CellAddress);

    /// Store a formula (`=` prefixed). Number format and fill are left untouched.
    fn set_formula(&mut self, at: CellAddress, formula: &str);

    /// Copy number format and fill from `from` onto `to`. A source without a
    /// fill resets the target to the default (empty) fill.
    fn copy_format(&mut self, from: CellAddress, to: CellAddress);

    /// A cell holding a formula or a non-blank value
    fn is_populated(&self, at: CellAddress) -> bool {
        self.formula(at).is_some() || !self.value(at).is_empty()
    }
}

/// A persisted spreadsheet with named sheets
pub trait Workbook {
    type Sheet: SheetGrid;

    /// Location the workbook is saved to
    fn path(&self) -> &Path;

    fn sheet_names(&self) -> Vec<String>;

    fn sheet(&self, name: &str) -> Option<&Self::Sheet>;

    fn sheet_mut(&mut self, name: &str) -> Option<&mut Self::Sheet>;

    /// Persist all in-memory changes. Readers see either the previous file or
    /// the new one; a refused write fails with `Error::WriteDenied`.
    fn save(&mut self) -> Result<()>;

    /// Discard in-memory state and re-read the last persisted state
    fn reload(&mut self) -> Result<()>;
}
