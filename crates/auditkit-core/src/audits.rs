//! Audit CRUD and lifecycle
//!
//! Mutations follow the same read-all → modify → write-all shape as the
//! template service. On every write the status rollup is recomputed and
//! stored back on the document as a denormalized read optimization, so a
//! reader never needs to trust a stale cache.
//!
//! Lifecycle: draft → submitted → approved | rejected. Approved audits are
//! immutable; edit and delete are refused.

use crate::error::AuditError;
use crate::summary;
use auditkit_model::{AuditDocument, AuditStatus, SectionGroup, Signatures};
use auditkit_store::{CollectionKind, DocumentStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Partial update for an audit; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditPatch {
    /// New report title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_name: Option<String>,
    /// New audit code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_code: Option<String>,
    /// New format number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_no: Option<String>,
    /// New revision number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev_no: Option<String>,
    /// New revision date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev_date: Option<String>,
    /// Replace info values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_data: Option<BTreeMap<String, serde_json::Value>>,
    /// New notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Replace the section tree (per-checkpoint entries live here)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<SectionGroup>>,
    /// Replace the sign-off lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signatures: Option<Signatures>,
}

impl AuditPatch {
    fn apply(self, audit: &mut AuditDocument) {
        if let Some(report_name) = self.report_name {
            audit.report_name = report_name;
        }
        if let Some(audit_code) = self.audit_code {
            audit.audit_code = audit_code;
        }
        if let Some(format_no) = self.format_no {
            audit.format_no = format_no;
        }
        if let Some(rev_no) = self.rev_no {
            audit.rev_no = rev_no;
        }
        if let Some(rev_date) = self.rev_date {
            audit.rev_date = rev_date;
        }
        if let Some(info_data) = self.info_data {
            audit.info_data = info_data;
        }
        if let Some(notes) = self.notes {
            audit.notes = notes;
        }
        if let Some(sections) = self.sections {
            audit.sections = sections;
        }
        if let Some(signatures) = self.signatures {
            audit.signatures = signatures;
        }
    }
}

/// CRUD and lifecycle over the audit collection.
#[derive(Debug)]
pub struct AuditService {
    store: Arc<DocumentStore>,
}

impl AuditService {
    /// Create a service over a store.
    #[inline]
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// All audits, legacy sections upgraded in the returned copies.
    ///
    /// # Errors
    /// Returns an error when the backend fails.
    pub fn list(&self) -> Result<Vec<AuditDocument>, AuditError> {
        let mut audits: Vec<AuditDocument> = self.store.load_all(CollectionKind::Audits)?;
        for audit in &mut audits {
            audit.normalize_sections();
        }
        Ok(audits)
    }

    /// One audit by id.
    ///
    /// # Errors
    /// `NotFound` when no audit has the id; backend errors propagate.
    pub fn get(&self, id: &str) -> Result<AuditDocument, AuditError> {
        self.list()?
            .into_iter()
            .find(|a| a.id == id)
            .ok_or_else(|| AuditError::not_found(CollectionKind::Audits, id))
    }

    /// Persist a new audit (normally built with
    /// [`AuditDocument::from_template`]).
    ///
    /// Forces a fresh id, draft status and current timestamps, and stores
    /// the initial rollup.
    ///
    /// # Errors
    /// Returns an error when the backend fails.
    pub fn create(&self, mut audit: AuditDocument) -> Result<AuditDocument, AuditError> {
        let now = Utc::now();
        audit.id = auditkit_model::audit_id();
        audit.status = AuditStatus::Draft;
        audit.created_at = now;
        audit.updated_at = now;
        audit.normalize_sections();
        refresh_summary(&mut audit);

        let mut audits: Vec<AuditDocument> = self.store.load_all(CollectionKind::Audits)?;
        audits.push(audit.clone());
        self.store.save_all(CollectionKind::Audits, &audits)?;
        tracing::info!(id = %audit.id, template = %audit.template_id, "audit created");
        Ok(audit)
    }

    /// Merge a patch onto an audit.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `Immutable` for an approved audit;
    /// backend errors propagate.
    pub fn update(&self, id: &str, patch: AuditPatch) -> Result<AuditDocument, AuditError> {
        self.mutate(id, |audit| {
            patch.apply(audit);
            Ok(())
        })
    }

    /// Delete an audit. Approved audits are refused.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `Immutable` for an approved audit;
    /// backend errors propagate.
    pub fn delete(&self, id: &str) -> Result<(), AuditError> {
        let mut audits: Vec<AuditDocument> = self.store.load_all(CollectionKind::Audits)?;
        let audit = audits
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| AuditError::not_found(CollectionKind::Audits, id))?;
        if !audit.status.is_editable() {
            return Err(AuditError::Immutable(id.to_string()));
        }
        audits.retain(|a| a.id != id);
        self.store.save_all(CollectionKind::Audits, &audits)?;
        tracing::info!(id = %id, "audit deleted");
        Ok(())
    }

    /// Submit a draft for approval.
    ///
    /// # Errors
    /// `NotFound`, `InvalidTransition` when not a draft; backend errors
    /// propagate.
    pub fn submit(&self, id: &str, submitted_by: &str) -> Result<AuditDocument, AuditError> {
        self.transition(id, AuditStatus::Submitted, |audit| {
            audit.submitted_by = Some(submitted_by.to_string());
            audit.submitted_at = Some(Utc::now());
            Ok(())
        })
    }

    /// Approve a submitted audit. The audit becomes immutable.
    ///
    /// # Errors
    /// `Validation` when the approver name is empty, `NotFound`,
    /// `InvalidTransition` when not submitted; backend errors propagate.
    pub fn approve(&self, id: &str, approver: &str) -> Result<AuditDocument, AuditError> {
        if approver.trim().is_empty() {
            return Err(AuditError::validation("approver name is required"));
        }
        self.transition(id, AuditStatus::Approved, |audit| {
            audit.approved_by = Some(approver.to_string());
            audit.approved_at = Some(Utc::now());
            Ok(())
        })
    }

    /// Reject a submitted audit back to the auditor, with comments.
    ///
    /// # Errors
    /// `Validation` when the reviewer name or comments are empty,
    /// `NotFound`, `InvalidTransition` when not submitted; backend errors
    /// propagate.
    pub fn reject(
        &self,
        id: &str,
        reviewer: &str,
        comments: &str,
    ) -> Result<AuditDocument, AuditError> {
        if reviewer.trim().is_empty() {
            return Err(AuditError::validation("reviewer name is required"));
        }
        if comments.trim().is_empty() {
            return Err(AuditError::validation("rejection comments are required"));
        }
        self.transition(id, AuditStatus::Rejected, |audit| {
            audit.approved_by = Some(reviewer.to_string());
            audit.approved_at = Some(Utc::now());
            audit.approval_comments = Some(comments.to_string());
            Ok(())
        })
    }

    /// Move an audit through the state machine, then persist.
    fn transition<F>(
        &self,
        id: &str,
        next: AuditStatus,
        mutate: F,
    ) -> Result<AuditDocument, AuditError>
    where
        F: FnOnce(&mut AuditDocument) -> Result<(), AuditError>,
    {
        let mut audits: Vec<AuditDocument> = self.store.load_all(CollectionKind::Audits)?;
        let audit = audits
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AuditError::not_found(CollectionKind::Audits, id))?;

        if !audit.status.can_transition(next) {
            return Err(AuditError::InvalidTransition {
                from: audit.status,
                to: next,
            });
        }
        let from = audit.status;
        audit.status = next;
        mutate(audit)?;
        audit.touch();
        refresh_summary(audit);

        let updated = audit.clone();
        self.store.save_all(CollectionKind::Audits, &audits)?;
        tracing::info!(id = %id, %from, to = %next, "audit status changed");
        Ok(updated)
    }

    /// Shared edit path: refuses approved audits, recomputes the rollup.
    fn mutate<F>(&self, id: &str, edit: F) -> Result<AuditDocument, AuditError>
    where
        F: FnOnce(&mut AuditDocument) -> Result<(), AuditError>,
    {
        let mut audits: Vec<AuditDocument> = self.store.load_all(CollectionKind::Audits)?;
        let audit = audits
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AuditError::not_found(CollectionKind::Audits, id))?;
        if !audit.status.is_editable() {
            return Err(AuditError::Immutable(id.to_string()));
        }

        edit(audit)?;
        audit.normalize_sections();
        audit.touch();
        refresh_summary(audit);

        let updated = audit.clone();
        self.store.save_all(CollectionKind::Audits, &audits)?;
        tracing::debug!(id = %id, "audit updated");
        Ok(updated)
    }
}

/// Recompute the rollup and store it back on the document.
fn refresh_summary(audit: &mut AuditDocument) {
    let computed = summary::recompute(audit);
    match serde_json::to_value(computed) {
        Ok(value) => audit.summary = Some(value),
        Err(_) => audit.summary = None,
    }
}
