//! Audit documents and their lifecycle
//!
//! An audit is an instantiation of a template. The template's columns,
//! info fields and header config are copied in at creation time so a later
//! template edit never retroactively changes an existing audit.

use crate::id;
use crate::section::SectionGroup;
use crate::template::{ColumnDef, HeaderConfig, InfoField, TemplateDocument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle state of an audit.
///
/// ```text
/// draft -> submitted -> approved
///                    -> rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    /// Being filled in
    #[default]
    Draft,
    /// Awaiting approval
    Submitted,
    /// Signed off; immutable from here on
    Approved,
    /// Sent back with comments
    Rejected,
}

impl AuditStatus {
    /// Whether the state machine permits moving to `next`.
    #[inline]
    #[must_use]
    pub fn can_transition(&self, next: AuditStatus) -> bool {
        matches!(
            (self, next),
            (AuditStatus::Draft, AuditStatus::Submitted)
                | (AuditStatus::Submitted, AuditStatus::Approved)
                | (AuditStatus::Submitted, AuditStatus::Rejected)
        )
    }

    /// Whether edits and deletion are still permitted.
    #[inline]
    #[must_use]
    pub fn is_editable(&self) -> bool {
        !matches!(self, AuditStatus::Approved)
    }

    /// Lowercase label, matching the stored form.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Draft => "draft",
            AuditStatus::Submitted => "submitted",
            AuditStatus::Approved => "approved",
            AuditStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sign-off line on the sheet footer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    /// Signatory name
    #[serde(default)]
    pub name: String,
    /// Date as entered on the sheet
    #[serde(default)]
    pub date: String,
}

/// Auditor and approver sign-off lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signatures {
    /// Person who performed the audit
    #[serde(default)]
    pub auditor: Signature,
    /// Person who signed it off
    #[serde(default)]
    pub approver: Signature,
}

/// A filled-in (or in-progress) audit sheet.
///
/// Holds a denormalized copy of the originating template's structure plus
/// the audit-time data: info values, per-checkpoint entries, signatures and
/// lifecycle metadata. `summary` is a denormalized rollup cache kept loose
/// (`serde_json::Value`) because historical writers stored it as an object,
/// a JSON-encoded string, or with capitalized keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDocument {
    /// `audit_<millis>` identifier
    pub id: String,
    /// Originating template id (may dangle after template deletion)
    #[serde(default)]
    pub template_id: String,
    /// Originating template name, copied at creation
    #[serde(default)]
    pub template_name: String,
    /// Report title printed on the sheet
    #[serde(default)]
    pub report_name: String,
    /// Format number
    #[serde(default)]
    pub format_no: String,
    /// Revision number
    #[serde(default)]
    pub rev_no: String,
    /// Revision date
    #[serde(default)]
    pub rev_date: String,
    /// Short audit code
    #[serde(default)]
    pub audit_code: String,
    /// Column schema, copied at creation
    #[serde(default, deserialize_with = "crate::serde_util::null_to_default")]
    pub columns: Vec<ColumnDef>,
    /// Info-field schema, copied at creation
    #[serde(default, deserialize_with = "crate::serde_util::null_to_default")]
    pub info_fields: Vec<InfoField>,
    /// Header config, copied at creation
    #[serde(default)]
    pub header_config: HeaderConfig,
    /// Field-id → entered value
    #[serde(default)]
    pub info_data: BTreeMap<String, serde_json::Value>,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// Section tree carrying the per-checkpoint entries
    #[serde(default, deserialize_with = "crate::serde_util::null_to_default")]
    pub sections: Vec<SectionGroup>,
    /// Footer sign-offs
    #[serde(default)]
    pub signatures: Signatures,
    /// Lifecycle state
    #[serde(default)]
    pub status: AuditStatus,
    /// Cached rollup; may be absent, stale, or in a legacy encoding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<serde_json::Value>,
    /// Author
    #[serde(default)]
    pub created_by: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
    /// Who submitted it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    /// When it was submitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Who approved it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    /// When it was approved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    /// Approval or rejection comments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_comments: Option<String>,
}

impl AuditDocument {
    /// Instantiate an audit from a template.
    ///
    /// Copies the template's columns, info fields, header config and
    /// default sections (upgraded to the staged schema) so the audit stays
    /// intact when the template later changes or is deleted. Starts in
    /// [`AuditStatus::Draft`].
    #[must_use]
    pub fn from_template(template: &TemplateDocument) -> Self {
        let now = Utc::now();
        let mut sections = template.default_sections.clone();
        for section in &mut sections {
            section.normalize();
        }
        Self {
            id: id::audit_id(),
            template_id: template.id.clone(),
            template_name: template.name.clone(),
            report_name: template.name.clone(),
            format_no: template.header_config.format_no.clone(),
            rev_no: template.header_config.rev_no.clone(),
            rev_date: template.header_config.rev_date.clone(),
            audit_code: String::new(),
            columns: template.columns.clone(),
            info_fields: template.info_fields.clone(),
            header_config: template.header_config.clone(),
            info_data: BTreeMap::new(),
            notes: String::new(),
            sections,
            signatures: Signatures::default(),
            status: AuditStatus::Draft,
            summary: None,
            created_by: String::new(),
            created_at: now,
            updated_at: now,
            submitted_by: None,
            submitted_at: None,
            approved_by: None,
            approved_at: None,
            approval_comments: None,
        }
    }

    /// With report name
    #[inline]
    #[must_use]
    pub fn with_report_name(mut self, report_name: impl Into<String>) -> Self {
        self.report_name = report_name.into();
        self
    }

    /// With audit code
    #[inline]
    #[must_use]
    pub fn with_audit_code(mut self, audit_code: impl Into<String>) -> Self {
        self.audit_code = audit_code.into();
        self
    }

    /// With author
    #[inline]
    #[must_use]
    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }

    /// With one info value set
    #[inline]
    #[must_use]
    pub fn with_info_value(mut self, field_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.info_data
            .insert(field_id.into(), serde_json::Value::String(value.into()));
        self
    }

    /// Total checkpoints across all sections.
    #[inline]
    #[must_use]
    pub fn checkpoint_count(&self) -> usize {
        self.sections.iter().map(SectionGroup::checkpoint_count).sum()
    }

    /// Upgrade any legacy sections to the staged schema in place.
    pub fn normalize_sections(&mut self) {
        for section in &mut self.sections {
            section.normalize();
        }
    }

    /// Refresh the modification timestamp.
    #[inline]
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{CheckpointRecord, SectionGroup, StageGroup};
    use crate::template::TemplateDocument;

    fn template_with_section() -> TemplateDocument {
        TemplateDocument::new("Safety Check").with_section(SectionGroup::new(
            "sec1",
            "Incoming",
            vec![StageGroup::new(
                "st1",
                "Line",
                vec![CheckpointRecord::new("cp1", "Visual check")],
            )],
        ))
    }

    #[test]
    fn lifecycle_transitions() {
        assert!(AuditStatus::Draft.can_transition(AuditStatus::Submitted));
        assert!(AuditStatus::Submitted.can_transition(AuditStatus::Approved));
        assert!(AuditStatus::Submitted.can_transition(AuditStatus::Rejected));

        assert!(!AuditStatus::Draft.can_transition(AuditStatus::Approved));
        assert!(!AuditStatus::Approved.can_transition(AuditStatus::Submitted));
        assert!(!AuditStatus::Rejected.can_transition(AuditStatus::Approved));
    }

    #[test]
    fn only_approved_is_frozen() {
        assert!(AuditStatus::Draft.is_editable());
        assert!(AuditStatus::Submitted.is_editable());
        assert!(AuditStatus::Rejected.is_editable());
        assert!(!AuditStatus::Approved.is_editable());
    }

    #[test]
    fn from_template_copies_structure() {
        let template = template_with_section();
        let audit = AuditDocument::from_template(&template);

        assert!(audit.id.starts_with("audit_"));
        assert_eq!(audit.status, AuditStatus::Draft);
        assert_eq!(audit.template_id, template.id);
        assert_eq!(audit.template_name, "Safety Check");
        assert_eq!(audit.columns, template.columns);
        assert_eq!(audit.checkpoint_count(), 1);
    }

    #[test]
    fn audit_is_insulated_from_template_edits() {
        let mut template = template_with_section();
        let audit = AuditDocument::from_template(&template);

        template.name = "Renamed".to_string();
        template.columns.clear();
        template.default_sections.clear();

        assert_eq!(audit.template_name, "Safety Check");
        assert!(audit.columns.iter().any(|c| c.id == "section"));
        assert_eq!(audit.checkpoint_count(), 1);
    }

    #[test]
    fn from_template_normalizes_legacy_default_sections() {
        let template = TemplateDocument::new("Safety Check").with_section(SectionGroup::legacy(
            "sec1",
            "Incoming",
            vec![CheckpointRecord::new("cp1", "Visual check")],
        ));
        let audit = AuditDocument::from_template(&template);
        assert!(!audit.sections[0].is_legacy());
        // The template itself keeps its stored shape.
        assert!(template.default_sections[0].is_legacy());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&AuditStatus::Submitted).unwrap();
        assert_eq!(json, "\"submitted\"");
    }

    #[test]
    fn stored_camel_case_layout_round_trips() {
        let audit = AuditDocument::from_template(&template_with_section())
            .with_created_by("auditor@plant")
            .with_info_value("serialNo", "SN123");
        let json = serde_json::to_value(&audit).unwrap();
        assert!(json.get("templateId").is_some());
        assert!(json.get("infoData").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["status"], "draft");

        let back: AuditDocument = serde_json::from_value(json).unwrap();
        assert_eq!(back, audit);
    }
}
