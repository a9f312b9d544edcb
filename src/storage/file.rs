//! Storage backend writing one file per record.

use super::{StorageBackend, StorageError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Storage that keeps each record in `<base_dir>/<kind>-<key>.data`.
///
/// Bytes of the kind and key outside `[A-Za-z0-9_]` are written as `%xx`,
/// so any key maps to a single file name inside the base directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    /// Opens a store rooted at `base_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory cannot be created.
    #[instrument(skip(base_dir), fields(base_dir = %base_dir.as_ref().display()))]
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir).map_err(|e| {
            StorageError::new(format!(
                "Failed to create storage directory '{}': {}",
                base_dir.display(),
                e
            ))
        })?;
        info!("File storage ready");
        Ok(Self { base_dir })
    }

    /// Directory holding the record files.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the file holding the record for `kind` and `key`.
    pub fn path_for(&self, kind: &str, key: &str) -> PathBuf {
        let mut name = String::new();
        escape(kind.as_bytes(), &mut name);
        name.push('-');
        escape(key.as_bytes(), &mut name);
        name.push_str(".data");
        self.base_dir.join(name)
    }
}

fn escape(bytes: &[u8], out: &mut String) {
    for &b in bytes {
        if b.is_ascii_alphanumeric() || b == b'_' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02x}", b));
        }
    }
}

impl StorageBackend for FileStorage {
    #[instrument(skip(self, value), fields(bytes = value.len()))]
    fn save(&self, kind: &str, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(kind, key);
        let staging = path.with_extension("tmp");
        std::fs::write(&staging, value)?;
        std::fs::rename(&staging, &path)?;
        debug!(path = %path.display(), "Record written");
        Ok(())
    }

    #[instrument(skip(self))]
    fn load(&self, kind: &str, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(kind, key);
        match std::fs::read(&path) {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes = bytes.len(), "Record read");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::new(format!(
                "Failed to read '{}': {}",
                path.display(),
                e
            ))),
        }
    }
}
