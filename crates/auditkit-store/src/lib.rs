//! Auditkit Persistence
//!
//! Whole-collection key-value persistence for audit documents.
//!
//! # Core Concepts
//!
//! - [`StorageBackend`]: the key-value seam ([`MemoryBackend`],
//!   [`JsonFileBackend`])
//! - [`DocumentStore`]: serializes collections as flat JSON arrays under
//!   the fixed keys `audit_templates` / `audit_records`
//! - Fail-open reads: corruption degrades to an empty collection, never an
//!   error surfaced to callers
//!
//! There is no concurrency control across processes sharing a backend;
//! last writer wins on the whole collection.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod backend;
mod store;

pub use backend::{JsonFileBackend, MemoryBackend, StorageBackend, StoreError};
pub use store::{CollectionKind, DocumentStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
