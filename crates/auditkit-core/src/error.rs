//! Error types for the audit services
//!
//! Taxonomy:
//! - validation errors abort an operation before any persistence write
//! - not-found is an explicit error, never a silent no-op
//! - approved audits are immutable; edits and deletes are refused
//! - storage corruption is NOT here — the store fails open to empty
//!   collections (see `auditkit-store`); only backend I/O propagates

use auditkit_model::AuditStatus;
use auditkit_store::{CollectionKind, StoreError};

/// Main service error type.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// Required input missing or malformed; nothing was persisted
    #[error("validation failed: {0}")]
    Validation(String),

    /// No document with the given id in the collection
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Which collection was searched
        kind: CollectionKind,
        /// The id that did not match
        id: String,
    },

    /// The lifecycle state machine forbids this transition
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: AuditStatus,
        /// Requested status
        to: AuditStatus,
    },

    /// Approved audits cannot be edited or deleted
    #[error("audit is approved and immutable: {0}")]
    Immutable(String),

    /// Backend I/O failed
    #[error("storage failed: {0}")]
    Store(#[from] StoreError),
}

impl AuditError {
    /// Validation error from any message type.
    #[inline]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Not-found error for a collection/id pair.
    #[inline]
    #[must_use]
    pub fn not_found(kind: CollectionKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Whether this is a not-found error (callers often absorb these).
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_collection_and_id() {
        let e = AuditError::not_found(CollectionKind::Templates, "template_1");
        assert_eq!(e.to_string(), "template not found: template_1");
        assert!(e.is_not_found());
    }

    #[test]
    fn transition_message_names_both_states() {
        let e = AuditError::InvalidTransition {
            from: AuditStatus::Draft,
            to: AuditStatus::Approved,
        };
        assert_eq!(e.to_string(), "invalid status transition: draft -> approved");
    }
}
