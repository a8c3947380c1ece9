//! Core domain types
//!
//! Pure data structures and value cleaning - no I/O or workbook access.

pub mod address;
pub mod clean;
pub mod profile;
pub mod record;
pub mod result;
pub mod schema;
pub mod value;

pub use address::CellAddress;
pub use clean::Cleaned;
pub use profile::{FormulaTemplate, ImportProfile};
pub use record::{Record, RecordSet};
pub use schema::{ColumnCleaner, CsvSchema, SchemaKind};
pub use value::CellValue;
