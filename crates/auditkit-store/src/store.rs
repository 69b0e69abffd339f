//! Whole-collection document store
//!
//! Collections are flat JSON arrays stored under fixed keys. Every mutation
//! at the layers above is read-all → modify-in-memory → write-all; there is
//! no partial write and no cross-collection transaction. Concurrent writers
//! racing on the same key clobber each other — accepted limitation of the
//! storage shape, not a guarantee of this layer.

use crate::backend::{MemoryBackend, StorageBackend, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The two persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Template definitions
    Templates,
    /// Audit records
    Audits,
}

impl CollectionKind {
    /// Fixed storage key of the collection.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            CollectionKind::Templates => "audit_templates",
            CollectionKind::Audits => "audit_records",
        }
    }

    /// Singular label for messages ("template" / "audit").
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CollectionKind::Templates => "template",
            CollectionKind::Audits => "audit",
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Serializes collections through a [`StorageBackend`].
pub struct DocumentStore {
    backend: Box<dyn StorageBackend>,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore").finish_non_exhaustive()
    }
}

impl DocumentStore {
    /// Create a store over any backend.
    #[must_use]
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Volatile store for tests and single-run tools.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    /// Load an entire collection.
    ///
    /// Fails open: an unwritten key or an unparsable payload both come back
    /// as the empty collection (the latter with a `tracing::warn!`), so a
    /// corrupted store degrades to empty state instead of erroring every
    /// read forever. Backend I/O failures do propagate.
    ///
    /// # Errors
    /// Returns an error only when the backend itself fails.
    pub fn load_all<T: DeserializeOwned>(
        &self,
        kind: CollectionKind,
    ) -> Result<Vec<T>, StoreError> {
        let Some(raw) = self.backend.read(kind.key())? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(docs) => Ok(docs),
            Err(e) => {
                tracing::warn!(
                    key = kind.key(),
                    error = %e,
                    "stored collection unparsable, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite an entire collection.
    ///
    /// # Errors
    /// Returns an error when serialization or the backend write fails.
    pub fn save_all<T: Serialize>(
        &self,
        kind: CollectionKind,
        docs: &[T],
    ) -> Result<(), StoreError> {
        // Vec<T> of serde-derived documents cannot fail to serialize; map
        // the impossible case onto the backend error for a total signature.
        let raw = serde_json::to_string(docs).map_err(|e| StoreError::Io {
            key: kind.key().to_string(),
            source: std::io::Error::other(e),
        })?;
        self.backend.write(kind.key(), &raw)
    }

    /// Drop an entire collection.
    ///
    /// # Errors
    /// Returns an error when the backend removal fails.
    pub fn clear(&self, kind: CollectionKind) -> Result<(), StoreError> {
        self.backend.remove(kind.key())
    }
}
