//! Tabular record set produced by the CSV loader

use std::cmp::Ordering;

use serde::Serialize;

use super::value::CellValue;

/// One CSV row, positionally aligned with `RecordSet::columns`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub values: Vec<CellValue>,
}

impl Record {
    pub fn new(values: Vec<CellValue>) -> Self {
        Self { values }
    }
}

/// Ordered rows sharing one header
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl RecordSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the header width
    pub fn push(&mut self, mut record: Record) {
        record.values.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(record);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Value at (row, column name); `None` when the column is absent
    pub fn get(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.values.get(idx))
    }

    /// Apply `f` to every value of a column. No-op when the column is absent.
    pub fn map_column<F>(&mut self, column: &str, mut f: F)
    where
        F: FnMut(usize, &Record, CellValue) -> CellValue,
    {
        let Some(idx) = self.column_index(column) else {
            return;
        };
        for (i, row) in self.rows.iter_mut().enumerate() {
            let current = std::mem::replace(&mut row.values[idx], CellValue::Empty);
            let snapshot = row.clone();
            row.values[idx] = f(i, &snapshot, current);
        }
    }

    /// Stable ascending sort on a date column; empty or non-date values go last
    pub fn sort_by_date(&mut self, column: &str) {
        let Some(idx) = self.column_index(column) else {
            return;
        };
        self.rows.sort_by(|a, b| {
            match (a.values[idx].as_date(), b.values[idx].as_date()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
    }
}
