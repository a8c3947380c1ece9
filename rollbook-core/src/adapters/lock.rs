//! Advisory lock guarding a workbook against concurrent rollbook runs

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::result::{Error, Result};

/// Exclusive lock held on a sidecar `.~<name>.lock` file next to the workbook.
///
/// Dropping the guard unlocks the sidecar but leaves it on disk, so every
/// process always contends on the same inode.
#[derive(Debug)]
pub struct WorkbookLock {
    file: File,
    path: PathBuf,
}

impl WorkbookLock {
    pub fn acquire(workbook: &Path) -> Result<Self> {
        let path = lock_path_for(workbook);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                Error::write_denied(format!("Cannot lock {}: {}", workbook.display(), e))
            })?;

        file.try_lock_exclusive().map_err(|_| {
            Error::write_denied(format!(
                "{} is being updated by another rollbook process",
                workbook.display()
            ))
        })?;

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkbookLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

pub fn lock_path_for(workbook: &Path) -> PathBuf {
    let name = workbook
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "workbook".to_string());
    workbook.with_file_name(format!(".~{}.lock", name))
}
