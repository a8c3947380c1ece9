//! xlsx workbook adapter backed by umya-spreadsheet

use std::path::{Path, PathBuf};

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use umya_spreadsheet::{Spreadsheet, Worksheet};

use crate::domain::result::{Error, Result};
use crate::domain::{CellAddress, CellValue};
use crate::ports::{SheetGrid, Workbook};

pub struct XlsxWorkbook {
    path: PathBuf,
    book: Spreadsheet,
}

impl XlsxWorkbook {
    /// Open an existing workbook
    pub fn open(path: &Path) -> Result<Self> {
        let book = read_book(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            book,
        })
    }

    pub fn spreadsheet(&self) -> &Spreadsheet {
        &self.book
    }
}

fn read_book(path: &Path) -> Result<Spreadsheet> {
    if !path.exists() {
        return Err(Error::input_missing(format!(
            "Workbook not found: {}",
            path.display()
        )));
    }
    umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|e| Error::Workbook(format!("Failed to read {}: {}", path.display(), e)))
}

impl Workbook for XlsxWorkbook {
    type Sheet = Worksheet;

    fn path(&self) -> &Path {
        &self.path
    }

    fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection()
            .iter()
            .map(|ws| ws.get_name().to_string())
            .collect()
    }

    fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.book.get_sheet_by_name(name)
    }

    fn sheet_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.book.get_sheet_by_name_mut(name)
    }

    /// Written to a sibling temp file first, then renamed over the target
    fn save(&mut self) -> Result<()> {
        let denied = |e: &dyn std::fmt::Display| {
            Error::write_denied(format!("Cannot write {}: {}", self.path.display(), e))
        };

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let tmp = tempfile::Builder::new()
            .prefix(".rollbook-")
            .suffix(".xlsx")
            .tempfile_in(dir)
            .map_err(|e| denied(&e))?;

        umya_spreadsheet::writer::xlsx::write(&self.book, tmp.path()).map_err(|e| denied(&e))?;
        tmp.persist(&self.path).map_err(|e| denied(&e.error))?;
        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        self.book = read_book(&self.path)?;
        Ok(())
    }
}

impl SheetGrid for Worksheet {
    fn max_row(&self) -> u32 {
        self.get_highest_row()
    }

    fn max_column(&self) -> u32 {
        self.get_highest_column()
    }

    fn value(&self, at: CellAddress) -> CellValue {
        let Some(cell) = self.get_cell((at.column, at.row)) else {
            return CellValue::Empty;
        };
        if let Some(number) = cell.get_value_number() {
            if let Some(decimal) = Decimal::from_f64(number) {
                return CellValue::Number(decimal);
            }
        }
        let text = cell.get_value();
        if text.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(text.to_string())
        }
    }

    fn formula(&self, at: CellAddress) -> Option<String> {
        let cell = self.get_cell((at.column, at.row))?;
        if !cell.is_formula() {
            return None;
        }
        let formula = cell.get_formula();
        if formula.starts_with('=') {
            Some(formula.to_string())
        } else {
            Some(format!("={}", formula))
        }
    }

    fn set_value(&mut self, at: CellAddress, value: &CellValue) {
        let cell = self.get_cell_mut((at.column, at.row));
        match value {
            CellValue::Empty => {
                cell.set_blank();
            }
            CellValue::Text(s) => {
                cell.set_value_string(s.clone());
            }
            CellValue::Number(_) | CellValue::Date(_) => {
                cell.set_value_number(value.to_f64().unwrap_or_default());
            }
        }
    }

    fn clear_value(&mut self, at: CellAddress) {
        if self.get_cell((at.column, at.row)).is_some() {
            self.get_cell_mut((at.column, at.row)).set_blank();
        }
    }

    fn set_formula(&mut self, at: CellAddress, formula: &str) {
        let body = formula.strip_prefix('=').unwrap_or(formula);
        self.get_cell_mut((at.column, at.row))
            .set_formula(body.to_string());
    }

    fn copy_format(&mut self, from: CellAddress, to: CellAddress) {
        let (number_format, fill) = match self.get_cell((from.column, from.row)) {
            Some(cell) => {
                let style = cell.get_style();
                (
                    style.get_number_format().cloned(),
                    style.get_fill().cloned(),
                )
            }
            None => (None, None),
        };
        let style = self.get_cell_mut((to.column, to.row)).get_style_mut();
        style.set_number_format(number_format.unwrap_or_default());
        style.set_fill(fill.unwrap_or_default());
    }
}
