//! Local filesystem adapter for the FileStore port

use std::fs;
use std::io;
use std::path::Path;

use crate::ports::FileStore;

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for LocalFileStore {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn copy(&self, src: &Path, dst: &Path) -> io::Result<()> {
        let dir = match dst.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut source = fs::File::open(src)?;
        let mut tmp = tempfile::Builder::new()
            .prefix(".rollbook-")
            .tempfile_in(dir)?;
        io::copy(&mut source, tmp.as_file_mut())?;
        tmp.as_file().sync_all()?;
        tmp.persist(dst).map_err(|e| e.error)?;
        Ok(())
    }
}
