//! Import service - merge a brokerage CSV export into the workbook

use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::adapters::lock::WorkbookLock;
use crate::adapters::xlsx::XlsxWorkbook;
use crate::domain::result::Result;
use crate::domain::{CsvSchema, ImportProfile, SchemaKind};
use crate::ports::Workbook;

use super::append::{append_records, AppendSummary};
use super::loader::{load_and_normalize, LoadReport, LoadedCsv};

/// Rows shown by a preview when no limit is given
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Import service for the two brokerage feeds
pub struct ImportService {
    transactions: ImportProfile,
    investments: ImportProfile,
}

impl Default for ImportService {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportService {
    pub fn new() -> Self {
        Self {
            transactions: ImportProfile::transactions(),
            investments: ImportProfile::investments(),
        }
    }

    /// Replace the profile used for `profile.kind`
    pub fn with_profile(mut self, profile: ImportProfile) -> Self {
        match profile.kind {
            SchemaKind::Transactions => self.transactions = profile,
            SchemaKind::Investments => self.investments = profile,
        }
        self
    }

    pub fn profile(&self, kind: SchemaKind) -> &ImportProfile {
        match kind {
            SchemaKind::Transactions => &self.transactions,
            SchemaKind::Investments => &self.investments,
        }
    }

    pub fn profiles(&self) -> Vec<ImportProfile> {
        vec![self.transactions.clone(), self.investments.clone()]
    }

    /// Read and normalize a CSV export; the workbook is not touched
    pub fn load(&self, kind: SchemaKind, csv_path: &Path) -> Result<LoadedCsv> {
        load_and_normalize(csv_path, &CsvSchema::for_kind(kind))
    }

    /// First `limit` normalized rows, as display strings
    pub fn preview(&self, kind: SchemaKind, csv_path: &Path, limit: usize) -> Result<ImportPreview> {
        let loaded = self.load(kind, csv_path)?;
        let rows = loaded
            .records
            .rows()
            .iter()
            .take(limit)
            .map(|r| r.values.iter().map(|v| v.display()).collect())
            .collect();

        Ok(ImportPreview {
            feed: kind,
            csv: loaded.source.clone(),
            columns: loaded.records.columns().to_vec(),
            rows,
            total_rows: loaded.records.len(),
            digest: loaded.digest,
            report: loaded.report,
        })
    }

    /// Merge a loaded CSV into the xlsx workbook at `workbook_path`, holding the
    /// workbook lock for the whole run
    pub fn import_file(
        &self,
        kind: SchemaKind,
        loaded: &LoadedCsv,
        workbook_path: &Path,
    ) -> Result<ImportResult> {
        let _lock = WorkbookLock::acquire(workbook_path)?;
        let mut workbook = XlsxWorkbook::open(workbook_path)?;
        self.import_into(kind, loaded, &mut workbook)
    }

    /// Merge a loaded CSV into any workbook
    pub fn import_into<W: Workbook>(
        &self,
        kind: SchemaKind,
        loaded: &LoadedCsv,
        workbook: &mut W,
    ) -> Result<ImportResult> {
        let profile = self.profile(kind);
        let summary = append_records(workbook, profile, &loaded.records)?;

        Ok(ImportResult {
            run_id: Uuid::new_v4().to_string(),
            feed: kind,
            csv: loaded.source.clone(),
            workbook: workbook.path().to_path_buf(),
            digest: loaded.digest.clone(),
            report: loaded.report.clone(),
            summary,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ImportPreview {
    pub feed: SchemaKind,
    pub csv: PathBuf,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
    pub digest: String,
    pub report: LoadReport,
}

#[derive(Debug, Serialize)]
pub struct ImportResult {
    pub run_id: String,
    pub feed: SchemaKind,
    pub csv: PathBuf,
    pub workbook: PathBuf,
    pub digest: String,
    pub report: LoadReport,
    pub summary: AppendSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemorySheet, MemoryWorkbook};
    use crate::domain::{CellAddress, CellValue};
    use crate::ports::SheetGrid;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_preview_limits_rows() {
        let dir = TempDir::new().unwrap();
        let csv = write_csv(&dir, "Investments.csv", "Symbol,Price\nA,$1\nB,2p\nC,3p\n");
        let preview = ImportService::new()
            .preview(SchemaKind::Investments, &csv, 2)
            .unwrap();
        assert_eq!(preview.total_rows, 3);
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[1], vec!["B".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_import_investments_into_memory_workbook() {
        let dir = TempDir::new().unwrap();
        let csv = write_csv(&dir, "Investments.csv", "Symbol,Price\nVOD,$0.72\nVUSA,8000p\n");

        let stale = MemorySheet::with_table(
            2,
            &["Symbol", "Price"],
            vec![
                vec![CellValue::from("OLD1"), CellValue::from("1")],
                vec![CellValue::from("OLD2"), CellValue::from("2")],
                vec![CellValue::from("OLD3"), CellValue::from("3")],
            ],
        );
        let mut wb = MemoryWorkbook::new("II_20250917.xlsx").with_sheet("Investments", stale);

        let service = ImportService::new();
        let loaded = service.load(SchemaKind::Investments, &csv).unwrap();
        let result = service
            .import_into(SchemaKind::Investments, &loaded, &mut wb)
            .unwrap();

        assert_eq!(result.summary.rows_written, 2);
        assert_eq!(result.summary.last_data_row, Some(3));
        assert_eq!(result.summary.formula_rows, Some((2, 3)));

        let sheet = wb.persisted_sheet("Investments").unwrap();
        assert_eq!(sheet.value(CellAddress::new(2, 2)), CellValue::from("VOD"));
        assert_eq!(sheet.value(CellAddress::new(4, 2)), CellValue::Empty);
        assert!(sheet
            .formula(CellAddress::new(3, 1))
            .unwrap()
            .contains("VLOOKUP(B3,MapName!A:D,4,0)"));
    }
}
