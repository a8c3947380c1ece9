//! In-memory workbook adapter
//!
//! Mirrors the observable behavior of the xlsx adapter (reported extent counts
//! styled-but-empty cells, saves can be refused) without touching disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::result::{Error, Result};
use crate::domain::{CellAddress, CellValue};
use crate::ports::{SheetGrid, Workbook};

/// Number format and fill of one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFormat {
    pub number_format: String,
    /// Fill color; `None` is the default (empty) fill
    pub fill: Option<String>,
}

impl Default for CellFormat {
    fn default() -> Self {
        Self {
            number_format: "General".to_string(),
            fill: None,
        }
    }
}

impl CellFormat {
    pub fn new(number_format: impl Into<String>, fill: Option<&str>) -> Self {
        Self {
            number_format: number_format.into(),
            fill: fill.map(|f| f.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryCell {
    pub value: CellValue,
    pub formula: Option<String>,
    pub format: CellFormat,
}

impl Default for MemoryCell {
    fn default() -> Self {
        Self {
            value: CellValue::Empty,
            formula: None,
            format: CellFormat::default(),
        }
    }
}

/// Sparse grid keyed by (row, column)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySheet {
    cells: BTreeMap<(u32, u32), MemoryCell>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header row 1 from `start_column`, then one row per entry of `rows`
    pub fn with_table(start_column: u32, headers: &[&str], rows: Vec<Vec<CellValue>>) -> Self {
        let mut sheet = Self::new();
        for (i, header) in headers.iter().enumerate() {
            sheet.set_value(
                CellAddress::new(1, start_column + i as u32),
                &CellValue::from(*header),
            );
        }
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                sheet.set_value(CellAddress::new(r as u32 + 2, start_column + c as u32), &value);
            }
        }
        sheet
    }

    pub fn cell(&self, at: CellAddress) -> Option<&MemoryCell> {
        self.cells.get(&(at.row, at.column))
    }

    pub fn format(&self, at: CellAddress) -> CellFormat {
        self.cell(at).map(|c| c.format.clone()).unwrap_or_default()
    }

    pub fn set_format(&mut self, at: CellAddress, format: CellFormat) {
        self.entry(at).format = format;
    }

    /// Count of populated cells in one column from row 2 down
    pub fn populated_in_column(&self, column: u32) -> usize {
        (2..=self.max_row())
            .filter(|row| self.is_populated(CellAddress::new(*row, column)))
            .count()
    }

    fn entry(&mut self, at: CellAddress) -> &mut MemoryCell {
        self.cells.entry((at.row, at.column)).or_default()
    }
}

impl SheetGrid for MemorySheet {
    fn max_row(&self) -> u32 {
        self.cells.keys().map(|(row, _)| *row).max().unwrap_or(0)
    }

    fn max_column(&self) -> u32 {
        self.cells.keys().map(|(_, col)| *col).max().unwrap_or(0)
    }

    fn value(&self, at: CellAddress) -> CellValue {
        self.cell(at).map(|c| c.value.clone()).unwrap_or(CellValue::Empty)
    }

    fn formula(&self, at: CellAddress) -> Option<String> {
        self.cell(at).and_then(|c| c.formula.clone())
    }

    fn set_value(&mut self, at: CellAddress, value: &CellValue) {
        let cell = self.entry(at);
        cell.value = value.clone();
        cell.formula = None;
    }

    fn clear_value(&mut self, at: CellAddress) {
        if let Some(cell) = self.cells.get_mut(&(at.row, at.column)) {
            cell.value = CellValue::Empty;
            cell.formula = None;
        }
    }

    fn set_formula(&mut self, at: CellAddress, formula: &str) {
        let cell = self.entry(at);
        cell.value = CellValue::Empty;
        cell.formula = Some(formula.to_string());
    }

    fn copy_format(&mut self, from: CellAddress, to: CellAddress) {
        let source = self.format(from);
        self.entry(to).format = source;
    }
}

/// Named sheets plus the last "persisted" snapshot
#[derive(Debug, Clone)]
pub struct MemoryWorkbook {
    path: PathBuf,
    sheets: BTreeMap<String, MemorySheet>,
    persisted: BTreeMap<String, MemorySheet>,
    deny_writes: bool,
    save_count: usize,
}

impl MemoryWorkbook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheets: BTreeMap::new(),
            persisted: BTreeMap::new(),
            deny_writes: false,
            save_count: 0,
        }
    }

    /// Add a sheet as if it had been read from disk
    pub fn with_sheet(mut self, name: &str, sheet: MemorySheet) -> Self {
        self.sheets.insert(name.to_string(), sheet.clone());
        self.persisted.insert(name.to_string(), sheet);
        self
    }

    /// Make every subsequent save fail, as when another process holds the file
    pub fn deny_writes(&mut self, deny: bool) {
        self.deny_writes = deny;
    }

    pub fn persisted_sheet(&self, name: &str) -> Option<&MemorySheet> {
        self.persisted.get(name)
    }

    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl Workbook for MemoryWorkbook {
    type Sheet = MemorySheet;

    fn path(&self) -> &Path {
        &self.path
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.keys().cloned().collect()
    }

    fn sheet(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.get(name)
    }

    fn sheet_mut(&mut self, name: &str) -> Option<&mut MemorySheet> {
        self.sheets.get_mut(name)
    }

    fn save(&mut self) -> Result<()> {
        if self.deny_writes {
            return Err(Error::write_denied(format!(
                "{} is open in another application",
                self.path.display()
            )));
        }
        self.persisted = self.sheets.clone();
        self.save_count += 1;
        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        self.sheets = self.persisted.clone();
        Ok(())
    }
}
