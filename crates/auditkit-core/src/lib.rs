//! Auditkit Core
//!
//! Services over the audit-checklist data model:
//! - [`TemplateService`]: template CRUD, duplication, legacy-section
//!   migration on load
//! - [`AuditService`]: audit CRUD plus the draft → submitted →
//!   approved/rejected lifecycle; approved audits are immutable
//! - [`summary`]: pure status rollups with an explicit cache policy
//! - [`info`]: info-field resolution through the historical alias table
//!
//! # Example
//!
//! ```rust,ignore
//! use auditkit_core::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(DocumentStore::in_memory());
//! let templates = TemplateService::new(store.clone());
//! let audits = AuditService::new(store);
//!
//! let template = templates.create(TemplateDocument::new("Safety Check"))?;
//! let audit = audits.create(AuditDocument::from_template(&template))?;
//! let audit = audits.submit(&audit.id, "inspector")?;
//! audits.approve(&audit.id, "J.Doe")?;
//! # Ok::<(), auditkit_core::AuditError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod audits;
pub mod error;
pub mod info;
pub mod summary;
pub mod templates;

// Re-exports for convenience
pub use audits::{AuditPatch, AuditService};
pub use error::AuditError;
pub use info::{info_value, lookup, MISSING_VALUE};
pub use summary::{recompute, summarize, StatusSummary, SummaryPolicy};
pub use templates::{TemplatePatch, TemplateService};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the audit services
    pub use crate::{
        summarize, AuditError, AuditPatch, AuditService, StatusSummary, SummaryPolicy,
        TemplatePatch, TemplateService,
    };
    pub use auditkit_model::{AuditDocument, AuditStatus, TemplateDocument};
    pub use auditkit_store::DocumentStore;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
