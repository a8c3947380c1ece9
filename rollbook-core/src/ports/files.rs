//! File copier / folder creator port

use std::io;
use std::path::Path;

pub trait FileStore {
    fn exists(&self, path: &Path) -> bool;

    /// Create `path` and any missing parents
    fn ensure_dir(&self, path: &Path) -> io::Result<()>;

    /// Copy `src` to `dst`, replacing `dst`. On failure `dst` is left as it was
    /// and `src` is never touched.
    fn copy(&self, src: &Path, dst: &Path) -> io::Result<()>;
}
