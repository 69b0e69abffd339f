//! Storage backends
//!
//! The adapter persists whole collections as JSON strings under fixed keys.
//! [`StorageBackend`] is the seam: [`MemoryBackend`] for tests and
//! single-run tools, [`JsonFileBackend`] as the durable stand-in for the
//! browser-local storage the data originally lived in.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Backend I/O failures.
///
/// Parse failures of stored payloads are deliberately NOT represented here;
/// the store fails open on those (see [`crate::DocumentStore::load_all`]).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying filesystem failure
    #[error("storage i/o failed for key '{key}': {source}")]
    Io {
        /// Collection key being accessed
        key: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Key-value persistence seam.
///
/// Keys are the fixed collection keys from [`crate::CollectionKind`];
/// values are opaque JSON strings. Writes replace the whole value — there
/// is no partial or merge write at this layer.
pub trait StorageBackend: Send + Sync {
    /// Read the stored value, `None` when the key has never been written.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the stored value.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Drop the key entirely.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Volatile in-process backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned lock only means a writer panicked mid-insert; the map
        // itself is still a coherent HashMap.
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Durable backend: one `<key>.json` file per collection under a root
/// directory.
///
/// Writes go through a temp file renamed into place so a crash mid-write
/// never leaves a truncated collection behind.
#[derive(Debug)]
pub struct JsonFileBackend {
    root: PathBuf,
}

impl JsonFileBackend {
    /// Open (and create if needed) the root directory.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl StorageBackend for JsonFileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let target = self.path_for(key);
        let tmp = self.root.join(format!("{key}.json.tmp"));
        let io = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };
        fs::write(&tmp, value).map_err(io)?;
        fs::rename(&tmp, &target).map_err(io)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_read_write_remove() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.read("k").unwrap(), None);

        backend.write("k", "[1,2]").unwrap();
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("[1,2]"));

        backend.remove("k").unwrap();
        assert_eq!(backend.read("k").unwrap(), None);
    }

    #[test]
    fn file_backend_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let backend = JsonFileBackend::open(dir.path()).unwrap();
            backend.write("audit_templates", "[]").unwrap();
        }
        let backend = JsonFileBackend::open(dir.path()).unwrap();
        assert_eq!(
            backend.read("audit_templates").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn file_backend_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::open(dir.path()).unwrap();
        assert_eq!(backend.read("never_written").unwrap(), None);
    }

    #[test]
    fn file_backend_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::open(dir.path()).unwrap();
        backend.write("k", "x").unwrap();
        backend.remove("k").unwrap();
        backend.remove("k").unwrap();
        assert_eq!(backend.read("k").unwrap(), None);
    }
}
