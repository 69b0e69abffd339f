//! Auditkit Data Model
//!
//! Typed documents for the audit-checklist subsystem.
//!
//! # Core Concepts
//!
//! - [`TemplateDocument`]: named, versioned audit-sheet definition
//! - [`AuditDocument`]: an instantiation of a template with a lifecycle
//! - [`SectionGroup`] → [`StageGroup`] → [`CheckpointRecord`]: the section
//!   tree, including the legacy flat-checkpoint shape and its migration
//! - [`CheckpointStatus`]: case-insensitive inspection outcome
//!
//! All documents serialize to the camelCase JSON layout the stored data
//! uses, so existing collections load unchanged.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod audit;
mod id;
mod section;
mod serde_util;
mod status;
mod template;

pub use audit::{AuditDocument, AuditStatus, Signature, Signatures};
pub use id::{audit_id, stage_id, template_id};
pub use section::{CheckpointRecord, SectionGroup, StageGroup};
pub use status::CheckpointStatus;
pub use template::{
    ColumnDef, ColumnType, HeaderConfig, InfoField, InfoFieldType, TemplateDocument,
    RESERVED_GROUP_COLUMNS,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
