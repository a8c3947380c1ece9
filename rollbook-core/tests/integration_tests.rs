//! Integration tests for rollbook-core imports
//!
//! These run the full load -> append -> save path against real xlsx files
//! written with umya-spreadsheet in a temp directory.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use tempfile::TempDir;

use rollbook_core::adapters::{WorkbookLock, XlsxWorkbook};
use rollbook_core::ports::{SheetGrid, Workbook};
use rollbook_core::services::ImportService;
use rollbook_core::{CellAddress, CellValue, Error, SchemaKind};

// ============================================================================
// Test Helpers
// ============================================================================

const TX_HEADERS: &[&str] = &[
    "Date",
    "Settlement Date",
    "Symbol",
    "Sedol",
    "Quantity",
    "Price",
    "Description",
    "Reference",
    "Debit",
    "Credit",
    "Running Balance",
];

const DATE_FORMAT: &str = "dd/mm/yyyy";

/// Workbook with a Transactions sheet holding `existing` formatted rows and
/// an Investments sheet holding `holdings` rows
fn write_workbook(dir: &TempDir, existing: u32, holdings: u32) -> PathBuf {
    let path = dir.path().join("II_20250917.xlsx");
    let mut book = umya_spreadsheet::new_file();

    book.new_sheet("Transactions").unwrap();
    let ws = book.get_sheet_by_name_mut("Transactions").unwrap();
    ws.get_cell_mut("A1").set_value_string("Category");
    for (i, header) in TX_HEADERS.iter().enumerate() {
        ws.get_cell_mut((i as u32 + 2, 1)).set_value_string(*header);
    }
    for row in 2..2 + existing {
        ws.get_cell_mut((1, row)).set_formula(format!("D{}", row));
        ws.get_cell_mut((2, row)).set_value_number(45900.0 + row as f64);
        ws.get_cell_mut((4, row)).set_value_string("OLD");
        ws.get_style_mut((2, row))
            .get_number_format_mut()
            .set_format_code(DATE_FORMAT);
    }

    book.new_sheet("Investments").unwrap();
    let ws = book.get_sheet_by_name_mut("Investments").unwrap();
    ws.get_cell_mut("A1").set_value_string("Sector");
    ws.get_cell_mut("B1").set_value_string("Symbol");
    ws.get_cell_mut("C1").set_value_string("Qty");
    for row in 2..2 + holdings {
        ws.get_cell_mut((1, row)).set_formula(format!("B{}", row));
        ws.get_cell_mut((2, row)).set_value_string(format!("OLD{}", row));
        ws.get_cell_mut((3, row)).set_value_number(row as f64);
    }

    umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
    path
}

fn write_transactions_csv(dir: &TempDir, rows: &[&str]) -> PathBuf {
    let path = dir.path().join("Transactions.csv");
    let mut content = TX_HEADERS.join(",");
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    fs::write(&path, content).unwrap();
    path
}

fn write_investments_csv(dir: &TempDir, symbols: &[&str]) -> PathBuf {
    let path = dir.path().join("Investments.csv");
    let mut content = String::from("Symbol,Qty,Price,Market Value £\n");
    for (i, symbol) in symbols.iter().enumerate() {
        content.push_str(&format!("{},{},$1.50,\"£1,000.00\"\n", symbol, i + 1));
    }
    fs::write(&path, content).unwrap();
    path
}

fn value_at(path: &Path, sheet: &str, row: u32, column: u32) -> CellValue {
    let wb = XlsxWorkbook::open(path).unwrap();
    let ws = wb.sheet(sheet).unwrap();
    SheetGrid::value(ws, CellAddress::new(row, column))
}

fn formula_at(path: &Path, sheet: &str, row: u32, column: u32) -> Option<String> {
    let wb = XlsxWorkbook::open(path).unwrap();
    let ws = wb.sheet(sheet).unwrap();
    SheetGrid::formula(ws, CellAddress::new(row, column))
}

fn three_trades() -> Vec<&'static str> {
    vec![
        "19/09/2025,23/09/2025,VOD,B1,100,£0.72,Purchase VOD,R1,72.00,,928.00",
        "18/09/2025,22/09/2025,BP.,B2,50,£4.10,Sale BP.,R2,,205.00,1133.00",
        "20/09/2025,24/09/2025,,,,,Div VOD,R3,,12.50,1145.50",
    ]
}

// ============================================================================
// Transactions Append Tests
// ============================================================================

/// M existing data rows plus N imported rows leave M + N populated anchor cells
#[test]
fn test_transactions_append_after_existing_rows() {
    let dir = TempDir::new().unwrap();
    let workbook = write_workbook(&dir, 4, 0);
    let csv = write_transactions_csv(&dir, &three_trades());

    let service = ImportService::new();
    let loaded = service.load(SchemaKind::Transactions, &csv).unwrap();
    let result = service
        .import_file(SchemaKind::Transactions, &loaded, &workbook)
        .unwrap();

    assert_eq!(result.summary.rows_written, 3);
    assert_eq!(result.summary.first_written_row, Some(6));
    assert_eq!(result.summary.last_data_row, Some(8));
    assert_eq!(result.summary.formula_rows, Some((6, 8)));

    let wb = XlsxWorkbook::open(&workbook).unwrap();
    let ws = wb.sheet("Transactions").unwrap();
    let populated = (2..=ws.max_row())
        .filter(|row| ws.is_populated(CellAddress::new(*row, 2)))
        .count();
    assert_eq!(populated, 7);

    // Existing rows untouched
    assert_eq!(SheetGrid::value(ws, CellAddress::new(2, 4)), CellValue::from("OLD"));
    assert_eq!(SheetGrid::formula(ws, CellAddress::new(5, 1)).as_deref(), Some("=D5"));
}

#[test]
fn test_transactions_sorted_and_signed() {
    let dir = TempDir::new().unwrap();
    let workbook = write_workbook(&dir, 1, 0);
    let csv = write_transactions_csv(&dir, &three_trades());

    let service = ImportService::new();
    let loaded = service.load(SchemaKind::Transactions, &csv).unwrap();
    service
        .import_file(SchemaKind::Transactions, &loaded, &workbook)
        .unwrap();

    // Sorted ascending by Date: BP. (18th), VOD (19th), dividend (20th)
    assert_eq!(value_at(&workbook, "Transactions", 3, 4), CellValue::from("BP."));
    assert_eq!(value_at(&workbook, "Transactions", 4, 4), CellValue::from("VOD"));

    // Credit without income marker flips quantity; debit is negated
    assert_eq!(
        value_at(&workbook, "Transactions", 3, 6),
        CellValue::Number(Decimal::from(-50))
    );
    assert_eq!(
        value_at(&workbook, "Transactions", 4, 10),
        CellValue::Number(Decimal::from(-72))
    );
}

#[test]
fn test_transactions_formula_and_format_filled() {
    let dir = TempDir::new().unwrap();
    let workbook = write_workbook(&dir, 2, 0);
    let csv = write_transactions_csv(&dir, &three_trades());

    let service = ImportService::new();
    let loaded = service.load(SchemaKind::Transactions, &csv).unwrap();
    service
        .import_file(SchemaKind::Transactions, &loaded, &workbook)
        .unwrap();

    let formula = formula_at(&workbook, "Transactions", 5, 1).unwrap();
    assert!(formula.starts_with("=IF(ISERROR(VLOOKUP(D5,MapName!A:D,4,0))"));
    assert!(formula.contains("VLOOKUP(H5,MapEdgeCases!A:B,2,0)"));

    let wb = XlsxWorkbook::open(&workbook).unwrap();
    let ws = wb.sheet("Transactions").unwrap();
    let code = ws
        .get_cell((2, 5))
        .and_then(|c| c.get_style().get_number_format())
        .map(|f| f.get_format_code().to_string());
    assert_eq!(code.as_deref(), Some(DATE_FORMAT));
}

#[test]
fn test_reimport_appends_again() {
    let dir = TempDir::new().unwrap();
    let workbook = write_workbook(&dir, 1, 0);
    let csv = write_transactions_csv(&dir, &three_trades());

    let service = ImportService::new();
    let loaded = service.load(SchemaKind::Transactions, &csv).unwrap();
    service.import_file(SchemaKind::Transactions, &loaded, &workbook).unwrap();
    let second = service.import_file(SchemaKind::Transactions, &loaded, &workbook).unwrap();

    // The library never dedupes; the digest lets callers detect it
    assert_eq!(second.summary.first_written_row, Some(6));
    assert_eq!(second.summary.last_data_row, Some(8));
    assert_eq!(second.digest, loaded.digest);
}

#[test]
fn test_missing_date_column_leaves_workbook_untouched() {
    let dir = TempDir::new().unwrap();
    let workbook = write_workbook(&dir, 2, 0);
    let before = fs::read(&workbook).unwrap();

    let csv = dir.path().join("Transactions.csv");
    fs::write(&csv, "Symbol,Quantity\nVOD,1\n").unwrap();

    let service = ImportService::new();
    let err = service.load(SchemaKind::Transactions, &csv).unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
    assert_eq!(fs::read(&workbook).unwrap(), before);
}

#[test]
fn test_missing_workbook() {
    let dir = TempDir::new().unwrap();
    let csv = write_transactions_csv(&dir, &three_trades());

    let service = ImportService::new();
    let loaded = service.load(SchemaKind::Transactions, &csv).unwrap();
    let err = service
        .import_file(SchemaKind::Transactions, &loaded, &dir.path().join("II_20250918.xlsx"))
        .unwrap_err();
    assert!(matches!(err, Error::InputMissing(_)));
}

// ============================================================================
// Investments Replace Tests
// ============================================================================

#[test]
fn test_investments_replace_clears_old_rows() {
    let dir = TempDir::new().unwrap();
    let workbook = write_workbook(&dir, 0, 6);
    let csv = write_investments_csv(&dir, &["VOD", "BP.", "AZN"]);

    let service = ImportService::new();
    let loaded = service.load(SchemaKind::Investments, &csv).unwrap();
    let result = service
        .import_file(SchemaKind::Investments, &loaded, &workbook)
        .unwrap();

    assert_eq!(result.summary.cleared_rows, 6);
    assert_eq!(result.summary.first_written_row, Some(2));
    assert_eq!(result.summary.last_data_row, Some(4));

    assert_eq!(value_at(&workbook, "Investments", 2, 2), CellValue::from("VOD"));
    assert_eq!(value_at(&workbook, "Investments", 4, 2), CellValue::from("AZN"));
    assert_eq!(value_at(&workbook, "Investments", 5, 2), CellValue::Empty);
    assert_eq!(value_at(&workbook, "Investments", 7, 3), CellValue::Empty);

    // Cleaned numerics
    assert_eq!(
        value_at(&workbook, "Investments", 2, 4),
        CellValue::Number(Decimal::new(150, 2))
    );
    assert_eq!(
        value_at(&workbook, "Investments", 2, 5),
        CellValue::Number(Decimal::from(1000))
    );

    // Header row and column A formulas survive the clear
    assert_eq!(value_at(&workbook, "Investments", 1, 2), CellValue::from("Symbol"));
    assert_eq!(formula_at(&workbook, "Investments", 3, 1).as_deref(), Some("=B3"));
}

#[test]
fn test_investments_into_empty_sheet_gets_formulas() {
    let dir = TempDir::new().unwrap();
    let workbook = write_workbook(&dir, 0, 0);
    let csv = write_investments_csv(&dir, &["VOD", "BP."]);

    let service = ImportService::new();
    let loaded = service.load(SchemaKind::Investments, &csv).unwrap();
    let result = service
        .import_file(SchemaKind::Investments, &loaded, &workbook)
        .unwrap();

    assert_eq!(result.summary.formula_rows, Some((2, 3)));
    let formula = formula_at(&workbook, "Investments", 3, 1).unwrap();
    assert_eq!(
        formula,
        "=IF(ISERROR(VLOOKUP(B3,MapName!A:D,4,0)),\"\",VLOOKUP(B3,MapName!A:D,4,0))"
    );
}

// ============================================================================
// Locking Tests
// ============================================================================

#[test]
fn test_import_refused_while_workbook_locked() {
    let dir = TempDir::new().unwrap();
    let workbook = write_workbook(&dir, 2, 0);
    let csv = write_transactions_csv(&dir, &three_trades());
    let before = fs::read(&workbook).unwrap();

    let service = ImportService::new();
    let loaded = service.load(SchemaKind::Transactions, &csv).unwrap();

    let held = WorkbookLock::acquire(&workbook).unwrap();
    let err = service
        .import_file(SchemaKind::Transactions, &loaded, &workbook)
        .unwrap_err();
    assert!(matches!(err, Error::WriteDenied(_)));
    assert_eq!(fs::read(&workbook).unwrap(), before);

    drop(held);
    assert!(service
        .import_file(SchemaKind::Transactions, &loaded, &workbook)
        .is_ok());
}
