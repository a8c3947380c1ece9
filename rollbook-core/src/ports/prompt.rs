//! Interactive picker port

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::result::Result;

/// User interaction needed by the roll-forward and import flows.
///
/// `None` / `false` answers are cancellations, never errors.
pub trait Prompter {
    /// Choose a workbook file, starting from `initial` when known
    fn pick_file(&self, title: &str, initial: Option<&Path>) -> Result<Option<PathBuf>>;

    /// Enter a date string, pre-filled with `default`
    fn pick_date(&self, prompt: &str, default: NaiveDate) -> Result<Option<String>>;

    /// Yes/no question; declining returns `false`
    fn confirm(&self, prompt: &str) -> Result<bool>;
}
