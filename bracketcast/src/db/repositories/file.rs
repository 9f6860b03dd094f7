//! JSON file store implementation.
//!
//! The document lives in a single file. Writes go to a uniquely named
//! temporary file in the same directory which is then persisted over the
//! target, so a failed write never leaves a half-written document behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::db::repository::{SnapshotStore, StoreResult};

/// File-backed store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl SnapshotStore for FileStore {
    fn read_document(&self) -> StoreResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&mut self, document: &str) -> StoreResult<()> {
        let parent = self.parent_dir();
        fs::create_dir_all(parent)?;

        // Dropped (and removed) on any error below.
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(document.as_bytes())?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        log::debug!("Wrote {} bytes to {}", document.len(), self.path.display());
        Ok(())
    }

    fn health_check(&self) -> bool {
        let parent = self.parent_dir();
        !parent.exists() || parent.is_dir()
    }

    fn describe(&self) -> String {
        format!("file ({})", self.path.display())
    }
}
