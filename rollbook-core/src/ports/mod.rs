//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external collaborators. Services depend
//! only on these traits, not on concrete implementations.

mod files;
mod prompt;
mod workbook;

pub use files::FileStore;
pub use prompt::Prompter;
pub use workbook::{SheetGrid, Workbook};
