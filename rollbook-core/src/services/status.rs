//! Status service - workbook and sheet summaries

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::adapters::xlsx::XlsxWorkbook;
use crate::domain::result::Result;
use crate::domain::ImportProfile;
use crate::ports::Workbook;

use super::locate::find_anchor_bounds;
use super::roll::extract_file_date;

pub struct StatusService {
    profiles: Vec<ImportProfile>,
}

impl StatusService {
    pub fn new(profiles: Vec<ImportProfile>) -> Self {
        Self { profiles }
    }

    /// Summarize the workbook at `path`; a missing file is reported, not an error
    pub fn get_status(&self, path: &Path) -> Result<StatusSummary> {
        let (file_date, naming_error) = match extract_file_date(path) {
            Ok(name) => (Some(name.date), None),
            Err(e) => (None, Some(e.to_string())),
        };

        let exists = path.exists();
        let sheets = if exists {
            let workbook = XlsxWorkbook::open(path)?;
            self.inspect(&workbook)
        } else {
            Vec::new()
        };

        Ok(StatusSummary {
            workbook: path.to_path_buf(),
            exists,
            file_date,
            naming_error,
            sheets,
        })
    }

    /// Anchor bounds of every profiled sheet
    pub fn inspect<W: Workbook>(&self, workbook: &W) -> Vec<SheetStatus> {
        self.profiles
            .iter()
            .map(|profile| match workbook.sheet(&profile.sheet_name) {
                Some(sheet) => {
                    let bounds =
                        find_anchor_bounds(sheet, profile.anchor_column(), profile.formula_column);
                    SheetStatus {
                        name: profile.sheet_name.clone(),
                        present: true,
                        last_data_row: bounds.last_data_row,
                        first_missing_row: (!bounds.formulas_complete)
                            .then_some(bounds.first_missing_row),
                        pending_formula_rows: bounds.pending_formula_rows(),
                    }
                }
                None => SheetStatus {
                    name: profile.sheet_name.clone(),
                    present: false,
                    last_data_row: None,
                    first_missing_row: None,
                    pending_formula_rows: 0,
                },
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub workbook: PathBuf,
    pub exists: bool,
    pub file_date: Option<NaiveDate>,
    pub naming_error: Option<String>,
    pub sheets: Vec<SheetStatus>,
}

#[derive(Debug, Serialize)]
pub struct SheetStatus {
    pub name: String,
    pub present: bool,
    pub last_data_row: Option<u32>,
    pub first_missing_row: Option<u32>,
    pub pending_formula_rows: u32,
}
