//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - umya-spreadsheet for xlsx workbooks
//! - An in-memory grid for tests and previews
//! - The local filesystem for roll-forward copies
//! - fs2 advisory locks guarding a workbook during a run

pub mod local_files;
pub mod lock;
pub mod memory;
pub mod xlsx;

pub use local_files::LocalFileStore;
pub use lock::WorkbookLock;
pub use memory::{CellFormat, MemorySheet, MemoryWorkbook};
pub use xlsx::XlsxWorkbook;
