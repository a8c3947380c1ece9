//! CSV loader and normalizer
//!
//! Reads a brokerage export, applies the per-column cleaners declared by a
//! [`CsvSchema`] and, for the transactions feed, derives signed quantities and
//! debits and orders rows by trade date. Cell-level problems never fail the
//! load; they are counted in the [`LoadReport`].

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::clean::{
    clean_currency_like, clean_percentage, clean_price, is_not_applicable,
    parse_day_first_date, Cleaned, CURRENCY_SYMBOLS,
};
use crate::domain::result::{Error, Result};
use crate::domain::schema::transactions;
use crate::domain::{CellValue, ColumnCleaner, CsvSchema, Record, RecordSet, SchemaKind};

/// What the loader had to absorb while normalizing
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    /// Cells whose cleaner could not parse them (kept as text or nulled)
    pub unparsed_cells: usize,
    /// Date cells that did not parse and were nulled
    pub unparsed_dates: usize,
    pub warnings: Vec<String>,
}

impl LoadReport {
    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Human-readable lines for everything the load absorbed; empty for a clean load
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.unparsed_cells > 0 {
            lines.push(format!(
                "{} cell(s) could not be parsed and were kept as text or left blank",
                self.unparsed_cells
            ));
        }
        if self.unparsed_dates > 0 {
            lines.push(format!(
                "{} date(s) could not be parsed and were left blank",
                self.unparsed_dates
            ));
        }
        lines.extend(self.warnings.iter().cloned());
        lines
    }
}

/// A normalized CSV ready for the append engine
#[derive(Debug, Clone)]
pub struct LoadedCsv {
    pub source: PathBuf,
    pub records: RecordSet,
    pub report: LoadReport,
    /// SHA-256 of the raw file bytes, hex encoded
    pub digest: String,
}

pub fn load_and_normalize(csv_path: &Path, schema: &CsvSchema) -> Result<LoadedCsv> {
    if !csv_path.exists() {
        return Err(Error::input_missing(format!(
            "CSV file not found at: {}",
            csv_path.display()
        )));
    }
    let bytes = fs::read(csv_path)?;
    let digest = hex::encode(Sha256::digest(&bytes));
    let text = decode_text(bytes);

    let (records, report) = normalize_text(&text, schema)?;
    Ok(LoadedCsv {
        source: csv_path.to_path_buf(),
        records,
        report,
        digest,
    })
}

/// UTF-8 (BOM stripped), falling back to Windows-1252 for spreadsheet exports
pub fn decode_text(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

/// Parse and normalize already-decoded CSV text
pub fn normalize_text(text: &str, schema: &CsvSchema) -> Result<(RecordSet, LoadReport)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.replace('\u{feff}', "").trim().to_string())
        .collect();

    for required in &schema.required {
        if !columns.iter().any(|c| c.as_str() == *required) {
            return Err(Error::schema(format!(
                "Column '{}' not found in CSV. Available columns: {}",
                required,
                columns.join(", ")
            )));
        }
    }

    let cleaners: Vec<Option<ColumnCleaner>> =
        columns.iter().map(|c| schema.cleaner_for(c)).collect();

    let mut report = LoadReport::default();
    let mut records = RecordSet::new(columns.clone());

    for (row_idx, result) in reader.records().enumerate() {
        let row = result?;
        let mut values = Vec::with_capacity(columns.len());
        for (col_idx, column) in columns.iter().enumerate() {
            let raw = row.get(col_idx).unwrap_or("");
            let raw = if is_not_applicable(raw) { "" } else { raw };
            let value = clean_cell(raw, cleaners[col_idx], row_idx, column, &mut report);
            values.push(value);
        }
        records.push(Record::new(values));
    }
    report.rows_read = records.len();

    if schema.kind == SchemaKind::Transactions {
        derive_transactions(&mut records, &mut report);
    }

    Ok((records, report))
}

fn clean_cell(
    raw: &str,
    cleaner: Option<ColumnCleaner>,
    row_idx: usize,
    column: &str,
    report: &mut LoadReport,
) -> CellValue {
    let cleaned = match cleaner {
        None => return infer_plain(raw),
        Some(ColumnCleaner::DayFirstDate) => {
            return match parse_day_first_date(raw) {
                Some(date) => CellValue::Date(date),
                None if raw.trim().is_empty() => CellValue::Empty,
                None => {
                    report.unparsed_dates += 1;
                    report.warn(format!(
                        "Row {}: could not parse {} '{}'; left blank",
                        row_idx + 2,
                        column,
                        raw.trim()
                    ));
                    CellValue::Empty
                }
            };
        }
        Some(ColumnCleaner::CurrencyLike) | Some(ColumnCleaner::Numeric) => {
            clean_currency_like(raw, CURRENCY_SYMBOLS)
        }
        Some(ColumnCleaner::Price) => clean_price(raw, row_idx == 0),
        Some(ColumnCleaner::Percentage) => clean_percentage(raw),
    };

    if let Cleaned::Original(_) = cleaned {
        report.unparsed_cells += 1;
    }
    match cleaner {
        Some(ColumnCleaner::Numeric) => cleaned.into_number(),
        _ => cleaned.into_value(),
    }
}

/// Columns without a cleaner: plain numbers become numbers, the rest stays text.
/// Codes with leading zeros (`007`) stay text.
fn infer_plain(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    let digits = trimmed.trim_start_matches('-');
    let leading_zero = digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.");
    if !leading_zero {
        if let Ok(n) = Decimal::from_str(trimmed) {
            return CellValue::Number(n);
        }
    }
    CellValue::Text(trimmed.to_string())
}

fn derive_transactions(records: &mut RecordSet, report: &mut LoadReport) {
    use transactions::*;

    if !records.has_column(SETTLEMENT_DATE) {
        report.warn(format!("'{}' column not found in CSV", SETTLEMENT_DATE));
    }

    records.sort_by_date(DATE);

    let credit_idx = records.column_index(CREDIT);
    let description_idx = records.column_index(DESCRIPTION);
    records.map_column(QUANTITY, |_, row, quantity| {
        let has_credit = credit_idx
            .map(|i| !row.values[i].is_empty())
            .unwrap_or(false);
        let is_income = description_idx
            .map(|i| {
                let description = row.values[i].display();
                INCOME_MARKERS.iter().any(|m| description.starts_with(m))
            })
            .unwrap_or(false);
        match quantity {
            CellValue::Number(q) if has_credit && !is_income => CellValue::Number(-q),
            other => other,
        }
    });

    records.map_column(DEBIT, |_, _, debit| match debit {
        CellValue::Number(d) => CellValue::Number(-d),
        other => other,
    });
}
